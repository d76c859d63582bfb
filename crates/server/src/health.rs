use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use shoplist_core::recommendation::{RecommendationService, StrategyType};
use shoplist_db::DbPool;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
    service: Arc<RecommendationService>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogCheck {
    pub status: &'static str,
    pub items: Option<i64>,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EngineCheck {
    pub status: &'static str,
    pub strategies: Vec<StrategyType>,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog: CatalogCheck,
    pub engine: EngineCheck,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool, service: Arc<RecommendationService>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool, service })
}

/// 200 when the item table is readable and the default strategy is registered,
/// 503 otherwise.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.db_pool).await;
    let engine = engine_check(&state.service);
    let ready = catalog.status == "ready" && engine.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        catalog,
        engine,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_check(pool: &DbPool) -> CatalogCheck {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM item").fetch_one(pool).await {
        Ok(count) => CatalogCheck {
            status: "ready",
            items: Some(count),
            detail: "item table readable".to_string(),
        },
        Err(error) => CatalogCheck {
            status: "degraded",
            items: None,
            detail: format!("item table unreadable: {error}"),
        },
    }
}

fn engine_check(service: &RecommendationService) -> EngineCheck {
    let registry = service.registry();
    let strategies = registry.registered_types();
    let default = StrategyType::default();
    if registry.is_registered(default) {
        EngineCheck { status: "ready", strategies, detail: format!("{default} registered") }
    } else {
        EngineCheck { status: "degraded", strategies, detail: format!("{default} missing") }
    }
}
