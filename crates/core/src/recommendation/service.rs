use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::prefix::{PrefixQuery, PrefixSearch, DEFAULT_LIMIT};
use super::registry::StrategyRegistry;
use super::store::CatalogStore;
use super::strategy::StrategyType;
use crate::domain::item::{Item, ItemCode};
use crate::errors::RecommendationError;

/// Entry point for both suggestion flows: name-prefix lookups and shopping-list add-ons.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn CatalogStore>,
    registry: Arc<StrategyRegistry>,
    prefix_search: PrefixSearch,
    default_limit: u32,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn CatalogStore>, registry: Arc<StrategyRegistry>) -> Self {
        Self {
            prefix_search: PrefixSearch::new(store.clone()),
            store,
            registry,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, default_limit: u32) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub async fn suggest_items_starting_with(
        &self,
        prefix: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Item>, RecommendationError> {
        info!(
            event_name = "recommendation.prefix.requested",
            prefix = prefix.unwrap_or("<missing>"),
            limit = limit.unwrap_or(self.default_limit),
            "suggesting items by name prefix"
        );

        let query = PrefixQuery::new(prefix, Some(limit.unwrap_or(self.default_limit)))?;
        let items = self.prefix_search.suggest(&query).await?;

        debug!(
            event_name = "recommendation.prefix.resolved",
            prefix = query.normalized(),
            matched = items.len(),
            "prefix lookup completed"
        );
        Ok(items)
    }

    pub async fn suggest_add_ons_for_shopping_list(
        &self,
        shopping_list_code: &str,
        strategy_type: StrategyType,
    ) -> Result<Vec<Item>, RecommendationError> {
        info!(
            event_name = "recommendation.addons.requested",
            shopping_list_code,
            strategy = %strategy_type,
            "suggesting add-ons for shopping list"
        );

        let shopping_list = self
            .store
            .find_shopping_list_by_code(shopping_list_code)
            .await?
            .ok_or_else(|| RecommendationError::ShoppingListNotFound {
                code: shopping_list_code.to_string(),
            })?;

        let current_items = shopping_list.item_codes();
        let suggested = self.registry.recommend(&current_items, strategy_type)?;
        if suggested.is_empty() {
            debug!(
                event_name = "recommendation.addons.no_match",
                shopping_list_code,
                strategy = %strategy_type,
                current_items = current_items.len(),
                "no rule matched the shopping list contents"
            );
            return Ok(Vec::new());
        }

        let resolved = self.store.find_active_items_by_codes(&suggested).await?;
        let items = order_by_suggestion(&suggested, resolved);

        debug!(
            event_name = "recommendation.addons.resolved",
            shopping_list_code,
            strategy = %strategy_type,
            suggested = suggested.len(),
            resolved = items.len(),
            "add-on suggestions resolved against catalog"
        );
        Ok(items)
    }
}

/// Reorders store results to follow `suggested`, dropping codes with no active record.
fn order_by_suggestion(suggested: &[ItemCode], resolved: Vec<Item>) -> Vec<Item> {
    let mut by_code: HashMap<ItemCode, Item> = resolved
        .into_iter()
        .filter(Item::is_suggestable)
        .map(|item| (item.code.clone(), item))
        .collect();

    suggested.iter().filter_map(|code| by_code.remove(code)).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::RecommendationService;
    use crate::config::AppConfig;
    use crate::domain::item::{Item, ItemCode};
    use crate::domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};
    use crate::errors::RecommendationError;
    use crate::recommendation::store::{CatalogStore, StoreError};
    use crate::recommendation::strategy::StrategyType;

    #[derive(Default)]
    struct FakeStore {
        items: Vec<Item>,
        lists: Vec<ShoppingList>,
        item_lookups: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CatalogStore for FakeStore {
        async fn find_shopping_list_by_code(
            &self,
            code: &str,
        ) -> Result<Option<ShoppingList>, StoreError> {
            if self.fail {
                return Err(StoreError("connection reset".to_string()));
            }
            Ok(self.lists.iter().find(|list| list.code.0 == code && !list.deleted).cloned())
        }

        async fn find_active_items_by_codes(
            &self,
            codes: &[ItemCode],
        ) -> Result<Vec<Item>, StoreError> {
            self.item_lookups.fetch_add(1, Ordering::SeqCst);
            // reverse catalog order so callers cannot rely on store ordering
            Ok(self
                .items
                .iter()
                .rev()
                .filter(|item| codes.contains(&item.code) && item.is_suggestable())
                .cloned()
                .collect())
        }

        async fn find_active_items_by_name_prefix(
            &self,
            normalized_prefix: &str,
            limit: u32,
        ) -> Result<Vec<Item>, StoreError> {
            if self.fail {
                return Err(StoreError("connection reset".to_string()));
            }
            Ok(self
                .items
                .iter()
                .filter(|item| item.is_suggestable())
                .filter(|item| item.name.to_lowercase().starts_with(normalized_prefix))
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    fn item(code: &str, name: &str) -> Item {
        Item::new(ItemCode::from(code), name, Decimal::new(199, 2))
    }

    fn list(code: &str, items: &[&str]) -> ShoppingList {
        ShoppingList {
            code: ShoppingListCode::from(code),
            name: format!("list {code}"),
            deleted: false,
            items: items
                .iter()
                .map(|item_code| ShoppingListItem {
                    item_code: ItemCode::from(*item_code),
                    quantity: 1,
                })
                .collect(),
        }
    }

    fn service(store: FakeStore) -> (RecommendationService, Arc<FakeStore>) {
        let store = Arc::new(store);
        let registry =
            Arc::new(AppConfig::default().strategy_registry().expect("builtin registry"));
        (RecommendationService::new(store.clone(), registry), store)
    }

    fn codes(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.code.as_str()).collect()
    }

    #[tokio::test]
    async fn add_ons_resolve_suggestions_in_rule_order() {
        let (service, _) = service(FakeStore {
            items: vec![item("item1245461", "Bread"), item("item1245462", "Butter")],
            lists: vec![list("shplst1", &["item124546", "item124547"])],
            ..FakeStore::default()
        });

        let items = service
            .suggest_add_ons_for_shopping_list("shplst1", StrategyType::Basic)
            .await
            .expect("suggestions");

        assert_eq!(codes(&items), vec!["item1245461", "item1245462"]);
    }

    #[tokio::test]
    async fn add_ons_drop_suggestions_without_active_record() {
        let mut inactive = item("item1245462", "Butter");
        inactive.active = false;
        let (service, _) = service(FakeStore {
            items: vec![item("item1245461", "Bread"), inactive],
            lists: vec![list("shplst1", &["item124546", "item124547"])],
            ..FakeStore::default()
        });

        let items = service
            .suggest_add_ons_for_shopping_list("shplst1", StrategyType::Basic)
            .await
            .expect("suggestions");

        assert_eq!(codes(&items), vec!["item1245461"]);
    }

    #[tokio::test]
    async fn unknown_shopping_list_fails_with_not_found() {
        let (service, _) = service(FakeStore::default());

        let result =
            service.suggest_add_ons_for_shopping_list("NO_SUCH_CODE", StrategyType::Basic).await;

        assert_eq!(
            result,
            Err(RecommendationError::ShoppingListNotFound { code: "NO_SUCH_CODE".to_string() })
        );
    }

    #[tokio::test]
    async fn unregistered_strategy_fails_instead_of_returning_empty() {
        let (service, _) = service(FakeStore {
            lists: vec![list("shplst1", &["item124546", "item124547"])],
            ..FakeStore::default()
        });

        let result =
            service.suggest_add_ons_for_shopping_list("shplst1", StrategyType::RuleBased).await;

        assert_eq!(result, Err(RecommendationError::UnknownStrategy(StrategyType::RuleBased)));
    }

    #[tokio::test]
    async fn no_rule_match_returns_empty_without_catalog_lookup() {
        let (service, store) = service(FakeStore {
            lists: vec![list("shplst1", &["item999999"])],
            ..FakeStore::default()
        });

        let items = service
            .suggest_add_ons_for_shopping_list("shplst1", StrategyType::Basic)
            .await
            .expect("empty result is not an error");

        assert!(items.is_empty());
        assert_eq!(store.item_lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prefix_suggestions_match_case_insensitively() {
        let mut deleted = item("item3", "Milk powder");
        deleted.deleted = true;
        let (service, _) = service(FakeStore {
            items: vec![
                item("item1", "Milk"),
                item("item2", "Milkshake"),
                deleted,
                item("item4", "Butter"),
            ],
            ..FakeStore::default()
        });

        let items =
            service.suggest_items_starting_with(Some("MIL"), Some(10)).await.expect("suggestions");

        assert_eq!(codes(&items), vec!["item1", "item2"]);
    }

    #[tokio::test]
    async fn prefix_suggestions_honor_default_limit() {
        let (service, _) = service(FakeStore {
            items: vec![item("item1", "Milk"), item("item2", "Milkshake"), item("item3", "Millet")],
            ..FakeStore::default()
        });
        let service = service.with_default_limit(2);

        let items = service.suggest_items_starting_with(Some("mil"), None).await.expect("ok");

        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn short_prefix_is_rejected_before_store_access() {
        let (service, _) = service(FakeStore { fail: true, ..FakeStore::default() });

        let result = service.suggest_items_starting_with(Some("mi"), Some(3)).await;

        assert_eq!(result, Err(RecommendationError::InvalidPrefix));
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let (service, _) = service(FakeStore { fail: true, ..FakeStore::default() });

        let result =
            service.suggest_add_ons_for_shopping_list("shplst1", StrategyType::Basic).await;

        assert!(matches!(result, Err(RecommendationError::Store(_))));
        assert_eq!(result.map_err(|error| error.kind()), Err("UnknownError"));
    }
}
