//! Item and shopping-list management under `/api/v1/items` and
//! `/api/v1/shoppinglist`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use shoplist_core::catalog::{
    CatalogService, ItemRequest, ShoppingListRequest, ShoppingListResponse,
    ShoppingListUpdateRequest,
};
use shoplist_core::domain::item::{ItemResponse, ItemView};

use crate::error::ApiError;
use crate::suggest::items_response;

#[derive(Clone)]
pub struct CatalogState {
    catalog: Arc<CatalogService>,
}

pub fn router(catalog: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/v1/items", get(list_items).post(create_items))
        .route("/api/v1/items/{code}", get(item_by_code))
        .route(
            "/api/v1/shoppinglist",
            get(missing_list_code).post(create_list).put(update_list),
        )
        .route("/api/v1/shoppinglist/{code}", get(list_by_code))
        .with_state(CatalogState { catalog })
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>, uri: &Uri) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiError::bad_request("BadRequest", rejection.body_text(), uri.path())
    })
}

pub async fn list_items(
    State(state): State<CatalogState>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let items = state
        .catalog
        .list_items()
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok(items_response(items))
}

pub async fn create_items(
    State(state): State<CatalogState>,
    uri: Uri,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let request = json_body(body, &uri)?;
    let items = state
        .catalog
        .create_items(request)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from_items(items))))
}

pub async fn item_by_code(
    State(state): State<CatalogState>,
    uri: Uri,
    Path(code): Path<String>,
) -> Result<Json<ItemView>, ApiError> {
    let item = state
        .catalog
        .item_by_code(&code)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok(Json(ItemView::from(item)))
}

async fn missing_list_code(uri: Uri) -> ApiError {
    ApiError::bad_request("BadRequest", "shopping list code is required".to_string(), uri.path())
}

pub async fn list_by_code(
    State(state): State<CatalogState>,
    uri: Uri,
    Path(code): Path<String>,
) -> Result<Json<ShoppingListResponse>, ApiError> {
    let list = state
        .catalog
        .shopping_list_by_code(&code)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok(Json(ShoppingListResponse::from(list)))
}

pub async fn create_list(
    State(state): State<CatalogState>,
    uri: Uri,
    body: Result<Json<ShoppingListRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShoppingListResponse>), ApiError> {
    let request = json_body(body, &uri)?;
    let list = state
        .catalog
        .create_shopping_list(request)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok((StatusCode::CREATED, Json(ShoppingListResponse::from(list))))
}

pub async fn update_list(
    State(state): State<CatalogState>,
    uri: Uri,
    body: Result<Json<ShoppingListUpdateRequest>, JsonRejection>,
) -> Result<Json<ShoppingListResponse>, ApiError> {
    let request = json_body(body, &uri)?;
    let list = state
        .catalog
        .update_shopping_list(request)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    Ok(Json(ShoppingListResponse::from(list)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use rust_decimal::Decimal;
    use shoplist_core::catalog::CatalogService;
    use shoplist_core::domain::item::{Item, ItemCode};
    use shoplist_db::repositories::ItemRepository;
    use shoplist_db::RepositoryCatalogStore;
    use tower::ServiceExt;

    use super::router;
    use crate::error::ErrorBody;

    async fn app() -> Router {
        let store = RepositoryCatalogStore::in_memory();
        for (code, name) in [("item124546", "Pasta"), ("item124547", "Tomato sauce")] {
            store
                .items()
                .save(Item::new(ItemCode::from(code), name, Decimal::new(189, 2)))
                .await
                .expect("seed item");
        }
        let mut retired = Item::new(ItemCode::from("item124548"), "Tortilla chips", Decimal::ONE);
        retired.active = false;
        store.items().save(retired).await.expect("seed item");

        router(Arc::new(CatalogService::new(Arc::new(store))))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    #[tokio::test]
    async fn item_listing_includes_inactive_items() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/v1/items", None).await;

        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body["items"]
            .as_array()
            .expect("items array")
            .iter()
            .filter_map(|item| item["itemCode"].as_str())
            .collect();
        assert_eq!(codes, vec!["item124546", "item124547", "item124548"]);
    }

    #[tokio::test]
    async fn created_items_get_generated_codes() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/items",
            Some(r#"{"items":[{"name":"Milk","price":1.29},{"name":"Bread","price":"2.10"}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let items = body["items"].as_array().expect("items array");
        assert_eq!(items.len(), 2);
        let code = items[0]["itemCode"].as_str().expect("code");
        assert!(code.starts_with("item"));

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/items/{code}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["itemName"], "Milk");
    }

    #[tokio::test]
    async fn empty_item_request_is_rejected() {
        let app = app().await;

        let (status, body) =
            send(&app, Method::POST, "/api/v1/items", Some(r#"{"items":[]}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ItemRequired");
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/v1/items/item404", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorBody = serde_json::from_value(body).expect("error body");
        assert_eq!(error.error, "ItemNotFound");
        assert_eq!(error.path, "/api/v1/items/item404");
    }

    #[tokio::test]
    async fn list_lifecycle_creates_reads_and_updates() {
        let app = app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/shoppinglist",
            Some(
                r#"{"name":"Pasta night","items":[
                    {"itemCode":"item124546","itemQuantity":1},
                    {"itemCode":"item124548","itemQuantity":3}]}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let code = created["code"].as_str().expect("list code").to_string();
        assert!(code.starts_with("shplst"));
        assert_eq!(created["items"].as_array().map(Vec::len), Some(1));

        let update = format!(
            r#"{{"code":"{code}","items":[{{"itemCode":"item124547","itemQuantity":2}}]}}"#
        );
        let (status, updated) =
            send(&app, Method::PUT, "/api/v1/shoppinglist", Some(&update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Pasta night");
        assert_eq!(updated["items"][0]["itemCode"], "item124547");
        assert_eq!(updated["items"][0]["itemQuantity"], 2);

        let (status, fetched) =
            send(&app, Method::GET, &format!("/api/v1/shoppinglist/{code}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn updating_an_unknown_list_is_not_found() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/shoppinglist",
            Some(r#"{"code":"shplst404","items":[{"itemCode":"item124546","itemQuantity":1}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ShoppingListNotFound");
    }

    #[tokio::test]
    async fn list_of_only_inactive_items_is_rejected() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/shoppinglist",
            Some(r#"{"name":"Game day","items":[{"itemCode":"item124548","itemQuantity":1}]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "NoMatchingItems");
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let app = app().await;

        let (status, body) =
            send(&app, Method::POST, "/api/v1/shoppinglist", Some(r#"{"items":"nope"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadRequest");
    }

    #[tokio::test]
    async fn list_lookup_without_code_is_a_bad_request() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/v1/shoppinglist", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadRequest");
    }
}
