use std::sync::Arc;

use async_trait::async_trait;

use shoplist_core::catalog::CatalogRecords;
use shoplist_core::domain::item::{Item, ItemCode};
use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode};
use shoplist_core::recommendation::{CatalogStore, StoreError};

use crate::repositories::{
    InMemoryItemRepository, InMemoryShoppingListRepository, ItemRepository, RepositoryError,
    ShoppingListRepository, SqlItemRepository, SqlShoppingListRepository,
};
use crate::DbPool;

impl From<RepositoryError> for StoreError {
    fn from(error: RepositoryError) -> Self {
        StoreError(error.to_string())
    }
}

/// Exposes the item and shopping-list repositories through the core's
/// `CatalogStore` seam.
#[derive(Clone)]
pub struct RepositoryCatalogStore {
    items: Arc<dyn ItemRepository>,
    lists: Arc<dyn ShoppingListRepository>,
}

impl RepositoryCatalogStore {
    pub fn new(items: Arc<dyn ItemRepository>, lists: Arc<dyn ShoppingListRepository>) -> Self {
        Self { items, lists }
    }

    pub fn sql(pool: DbPool) -> Self {
        Self::new(
            Arc::new(SqlItemRepository::new(pool.clone())),
            Arc::new(SqlShoppingListRepository::new(pool)),
        )
    }

    pub fn in_memory() -> Self {
        let items: Arc<dyn ItemRepository> = Arc::new(InMemoryItemRepository::default());
        let lists = Arc::new(InMemoryShoppingListRepository::new(items.clone()));
        Self::new(items, lists)
    }

    pub fn items(&self) -> &Arc<dyn ItemRepository> {
        &self.items
    }

    pub fn lists(&self) -> &Arc<dyn ShoppingListRepository> {
        &self.lists
    }
}

#[async_trait]
impl CatalogStore for RepositoryCatalogStore {
    async fn find_shopping_list_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ShoppingList>, StoreError> {
        Ok(self.lists.find_by_code(&ShoppingListCode::from(code)).await?)
    }

    async fn find_active_items_by_codes(
        &self,
        codes: &[ItemCode],
    ) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.find_by_codes_in(codes).await?)
    }

    async fn find_active_items_by_name_prefix(
        &self,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.find_by_prefix(normalized_prefix, limit).await?)
    }
}

#[async_trait]
impl CatalogRecords for RepositoryCatalogStore {
    async fn find_all_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.find_all().await?)
    }

    async fn find_item_by_code(&self, code: &ItemCode) -> Result<Option<Item>, StoreError> {
        Ok(self.items.find_by_code(code).await?)
    }

    async fn save_items(&self, items: Vec<Item>) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.save_all(items).await?)
    }

    async fn save_shopping_list(&self, list: ShoppingList) -> Result<ShoppingList, StoreError> {
        Ok(self.lists.save(list).await?)
    }
}
