//! Suggestion endpoints under `/api/v1/suggest`.
//!
//! Both routes answer 200 with `{"items": [...]}` when something matched and
//! 204 with an empty body when nothing did. Failures are rendered as
//! [`ErrorBody`](crate::error::ErrorBody) with a fresh correlation id.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use shoplist_core::domain::item::{Item, ItemResponse};
use shoplist_core::errors::RecommendationError;
use shoplist_core::recommendation::{RecommendationService, StrategyType, MAX_PAGE_SIZE};

use crate::error::ApiError;

#[derive(Clone)]
pub struct SuggestState {
    service: Arc<RecommendationService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsQuery {
    pub starts_with: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AddOnsQuery {
    pub shoplistid: String,
    pub engine: Option<String>,
    pub limit: Option<u32>,
}

pub fn router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/api/v1/suggest/items", get(suggest_items))
        .route("/api/v1/suggest/shoppinglist/addons", get(suggest_add_ons))
        .with_state(SuggestState { service })
}

pub async fn suggest_items(
    State(state): State<SuggestState>,
    uri: Uri,
    query: Result<Query<ItemsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("BadRequest", rejection.body_text(), uri.path())
    })?;

    let items = state
        .service
        .suggest_items_starting_with(query.starts_with.as_deref(), query.limit)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;

    Ok(items_response(items))
}

pub async fn suggest_add_ons(
    State(state): State<SuggestState>,
    uri: Uri,
    query: Result<Query<AddOnsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("BadRequest", rejection.body_text(), uri.path())
    })?;

    let strategy_type = match query.engine.as_deref() {
        None => StrategyType::default(),
        Some(raw) => StrategyType::from_str(raw).map_err(|error| {
            ApiError::bad_request("UnknownStrategy", error.to_string(), uri.path())
        })?,
    };
    let limit = match query.limit {
        Some(0) => {
            let error = RecommendationError::InvalidLimit;
            return Err(ApiError::from_application(error, uri.path()));
        }
        Some(limit) => limit.min(MAX_PAGE_SIZE),
        None => state.service.default_limit(),
    };

    let mut items = state
        .service
        .suggest_add_ons_for_shopping_list(&query.shoplistid, strategy_type)
        .await
        .map_err(|error| ApiError::from_application(error, uri.path()))?;
    items.truncate(limit as usize);

    Ok(items_response(items))
}

/// 200 with the items, or 204 when there are none.
pub(crate) fn items_response(items: Vec<Item>) -> Response {
    let response = ItemResponse::from_items(items);
    if response.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use rust_decimal::Decimal;
    use shoplist_core::domain::item::{Item, ItemCode};
    use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};
    use shoplist_core::config::AppConfig;
    use shoplist_core::recommendation::RecommendationService;
    use shoplist_db::repositories::{ItemRepository, ShoppingListRepository};
    use shoplist_db::RepositoryCatalogStore;
    use tower::ServiceExt;

    use super::router;
    use crate::error::ErrorBody;

    async fn app() -> Router {
        let store = RepositoryCatalogStore::in_memory();
        for (code, name) in [
            ("item124546", "Pasta"),
            ("item124547", "Tomato sauce"),
            ("item1245461", "Parmesan"),
            ("item1245462", "Basil"),
            ("item1245460", "Milk"),
            ("item1245468", "Milkshake"),
        ] {
            store
                .items()
                .save(Item::new(ItemCode::from(code), name, Decimal::new(150, 2)))
                .await
                .expect("seed item");
        }
        store
            .lists()
            .save(ShoppingList {
                code: ShoppingListCode::from("shplst1"),
                name: "Pasta night".to_string(),
                deleted: false,
                items: ["item124546", "item124547"]
                    .into_iter()
                    .map(|code| ShoppingListItem { item_code: ItemCode::from(code), quantity: 1 })
                    .collect(),
            })
            .await
            .expect("seed list");
        store
            .lists()
            .save(ShoppingList {
                code: ShoppingListCode::from("shplst2"),
                name: "Just milk".to_string(),
                deleted: false,
                items: vec![ShoppingListItem {
                    item_code: ItemCode::from("item1245468"),
                    quantity: 1,
                }],
            })
            .await
            .expect("seed list");

        let registry = AppConfig::default().strategy_registry().expect("builtin registry");
        let service = RecommendationService::new(Arc::new(store), Arc::new(registry));
        router(Arc::new(service))
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .await
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).expect("json body")
    }

    #[tokio::test]
    async fn items_by_prefix_return_camel_case_payload() {
        let (status, body) = get("/api/v1/suggest/items?startsWith=MIL&limit=10").await;

        assert_eq!(status, StatusCode::OK);
        let payload = json(&body);
        let names: Vec<&str> = payload["items"]
            .as_array()
            .expect("items array")
            .iter()
            .filter_map(|item| item["itemName"].as_str())
            .collect();
        assert_eq!(names, vec!["Milk", "Milkshake"]);
    }

    #[tokio::test]
    async fn items_without_match_return_no_content() {
        let (status, body) = get("/api/v1/suggest/items?startsWith=zzz").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn short_prefix_is_a_bad_request_with_error_body() {
        let (status, body) = get("/api/v1/suggest/items?startsWith=mi").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorBody = serde_json::from_slice(&body).expect("error body");
        assert_eq!(error.status, 400);
        assert_eq!(error.error, "InvalidPrefix");
        assert_eq!(error.path, "/api/v1/suggest/items");
        assert!(!error.correlation_id.is_empty());
        assert!(!error.messages.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_is_a_bad_request() {
        let (status, body) = get("/api/v1/suggest/items?startsWith=milk&limit=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "InvalidLimit");
    }

    #[tokio::test]
    async fn add_ons_follow_rule_order() {
        let (status, body) =
            get("/api/v1/suggest/shoppinglist/addons?shoplistid=shplst1&engine=BASIC").await;

        assert_eq!(status, StatusCode::OK);
        let payload = json(&body);
        let codes: Vec<&str> = payload["items"]
            .as_array()
            .expect("items array")
            .iter()
            .filter_map(|item| item["itemCode"].as_str())
            .collect();
        assert_eq!(codes, vec!["item1245461", "item1245462"]);
    }

    #[tokio::test]
    async fn add_ons_limit_truncates_result() {
        let (status, body) =
            get("/api/v1/suggest/shoppinglist/addons?shoplistid=shplst1&limit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["items"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn add_ons_without_rule_match_return_no_content() {
        let (status, _) = get("/api/v1/suggest/shoppinglist/addons?shoplistid=shplst2").await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unknown_list_is_not_found() {
        let (status, body) =
            get("/api/v1/suggest/shoppinglist/addons?shoplistid=NO_SUCH_CODE").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["error"], "ShoppingListNotFound");
    }

    #[tokio::test]
    async fn unregistered_engine_is_a_bad_request() {
        let (status, body) =
            get("/api/v1/suggest/shoppinglist/addons?shoplistid=shplst1&engine=rule_based").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "UnknownStrategy");
    }

    #[tokio::test]
    async fn unparseable_engine_is_a_bad_request() {
        let (status, body) =
            get("/api/v1/suggest/shoppinglist/addons?shoplistid=shplst1&engine=magic").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "UnknownStrategy");
    }

    #[tokio::test]
    async fn missing_list_code_is_a_bad_request() {
        let (status, body) = get("/api/v1/suggest/shoppinglist/addons").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "BadRequest");
    }
}
