use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use shoplist_core::domain::item::{normalize_name, Item, ItemCode};
use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode};

use super::{
    retain_known_items, with_generated_code, ItemRepository, RepositoryError,
    ShoppingListRepository,
};

#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<String, Item>>,
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<Item>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.get(&code.0).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let items = self.items.read().await;
        let mut all: Vec<Item> = items.values().cloned().collect();
        all.sort_by(|left, right| left.code.cmp(&right.code));
        Ok(all)
    }

    async fn find_by_codes_in(&self, codes: &[ItemCode]) -> Result<Vec<Item>, RepositoryError> {
        let items = self.items.read().await;
        let mut found: Vec<Item> = codes
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|code| items.get(&code.0))
            .filter(|item| item.is_suggestable())
            .cloned()
            .collect();
        found.sort_by(|left, right| left.code.cmp(&right.code));
        Ok(found)
    }

    async fn find_by_prefix(
        &self,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<Item>, RepositoryError> {
        let items = self.items.read().await;
        let mut found: Vec<Item> = items
            .values()
            .filter(|item| item.is_suggestable())
            .filter(|item| normalize_name(&item.name).starts_with(normalized_prefix))
            .cloned()
            .collect();
        found.sort_by(|left, right| {
            normalize_name(&left.name)
                .cmp(&normalize_name(&right.name))
                .then_with(|| left.code.cmp(&right.code))
        });
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn save(&self, item: Item) -> Result<Item, RepositoryError> {
        let item = with_generated_code(item);
        let mut items = self.items.write().await;
        items.insert(item.code.0.clone(), item.clone());
        Ok(item)
    }

    async fn save_all(&self, items: Vec<Item>) -> Result<Vec<Item>, RepositoryError> {
        let items: Vec<Item> = items.into_iter().map(with_generated_code).collect();
        let mut stored = self.items.write().await;
        for item in &items {
            stored.insert(item.code.0.clone(), item.clone());
        }
        Ok(items)
    }
}

pub struct InMemoryShoppingListRepository {
    items: Arc<dyn ItemRepository>,
    lists: RwLock<HashMap<String, ShoppingList>>,
}

impl InMemoryShoppingListRepository {
    /// `items` is consulted on save to drop entries with no active catalog record.
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items, lists: RwLock::new(HashMap::new()) }
    }
}

#[async_trait::async_trait]
impl ShoppingListRepository for InMemoryShoppingListRepository {
    async fn find_by_code(
        &self,
        code: &ShoppingListCode,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let lists = self.lists.read().await;
        Ok(lists.get(&code.0).filter(|list| !list.deleted).cloned())
    }

    async fn save(&self, list: ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let known: HashSet<ItemCode> = self
            .items
            .find_by_codes_in(&list.item_codes())
            .await?
            .into_iter()
            .map(|item| item.code)
            .collect();
        let list = retain_known_items(list, &known)?;

        let mut lists = self.lists.write().await;
        lists.insert(list.code.0.clone(), list.clone());
        Ok(list)
    }
}
