use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;
use shoplist_core::config::AppConfig;
use shoplist_core::domain::item::{Item, ItemResponse};
use shoplist_core::errors::{ApplicationError, InterfaceError, RecommendationError};
use shoplist_core::recommendation::{RecommendationService, StrategyType, MAX_PAGE_SIZE};
use shoplist_db::{DbPool, RepositoryCatalogStore};

use crate::commands::{connect_catalog, prepare, CommandFailure, CommandResult};

const COMMAND: &str = "suggest";

pub fn items(starts_with: &str, limit: Option<u32>) -> CommandResult {
    let (config, runtime) = match prepare(COMMAND) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_catalog(&config).await?;
        let outcome = match build_service(&config, &pool) {
            Ok(service) => service
                .suggest_items_starting_with(Some(starts_with), limit)
                .await
                .map_err(recommendation_failure),
            Err(failure) => Err(failure),
        };
        pool.close().await;
        outcome
    });

    render(result)
}

pub fn add_ons(list_code: &str, engine: &str, limit: Option<u32>) -> CommandResult {
    let strategy_type = match StrategyType::from_str(engine) {
        Ok(strategy_type) => strategy_type,
        Err(error) => {
            return CommandResult::failure(COMMAND, "UnknownStrategy", error.to_string(), 7)
        }
    };
    let limit = match limit {
        Some(0) => {
            return render(Err(recommendation_failure(RecommendationError::InvalidLimit)));
        }
        Some(limit) => Some(limit.min(MAX_PAGE_SIZE)),
        None => None,
    };

    let (config, runtime) = match prepare(COMMAND) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_catalog(&config).await?;
        let outcome = match build_service(&config, &pool) {
            Ok(service) => service
                .suggest_add_ons_for_shopping_list(list_code, strategy_type)
                .await
                .map_err(recommendation_failure)
                .map(|mut items| {
                    items.truncate(limit.unwrap_or(service.default_limit()) as usize);
                    items
                }),
            Err(failure) => Err(failure),
        };
        pool.close().await;
        outcome
    });

    render(result)
}

fn build_service(
    config: &AppConfig,
    pool: &DbPool,
) -> Result<RecommendationService, CommandFailure> {
    let registry =
        config.strategy_registry().map_err(|error| ("registry", error.to_string(), 2u8))?;

    Ok(RecommendationService::new(
        Arc::new(RepositoryCatalogStore::sql(pool.clone())),
        Arc::new(registry),
    )
    .with_default_limit(config.recommendation.default_limit))
}

fn recommendation_failure(error: RecommendationError) -> CommandFailure {
    let interface = ApplicationError::from(error).into_interface("cli");
    let exit_code = match interface {
        InterfaceError::BadRequest { .. } => 7,
        InterfaceError::NotFound { .. } => 8,
        InterfaceError::Internal { .. } => 9,
    };
    (interface.kind(), interface.message().to_string(), exit_code)
}

fn render(result: Result<Vec<Item>, CommandFailure>) -> CommandResult {
    match result {
        Ok(items) => {
            let response = ItemResponse::from_items(items);
            let message = match response.items.len() {
                0 => "no suggestions".to_string(),
                1 => "1 suggestion".to_string(),
                count => format!("{count} suggestions"),
            };
            CommandResult::success_with_data(COMMAND, message, Some(json!(response)))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(COMMAND, error_class, message, exit_code)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use shoplist_core::errors::RecommendationError;
    use shoplist_core::recommendation::StoreError;

    use super::{recommendation_failure, render};

    #[test]
    fn recommendation_errors_map_to_exit_codes() {
        assert_eq!(recommendation_failure(RecommendationError::InvalidPrefix).2, 7);
        assert_eq!(
            recommendation_failure(RecommendationError::ShoppingListNotFound {
                code: "NO_SUCH_CODE".to_string()
            })
            .0,
            "ShoppingListNotFound"
        );
        let store = StoreError("no such table: item".to_string());
        assert_eq!(recommendation_failure(RecommendationError::Store(store)).2, 9);
    }

    #[test]
    fn empty_result_is_success_with_empty_items() {
        let result = render(Ok(Vec::new()));
        let payload: Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["message"], "no suggestions");
        assert_eq!(payload["data"]["items"].as_array().map(Vec::len), Some(0));
    }
}
