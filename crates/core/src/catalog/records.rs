use async_trait::async_trait;

use crate::domain::item::{Item, ItemCode};
use crate::domain::shopping_list::ShoppingList;
use crate::recommendation::{CatalogStore, StoreError};

/// Read/write side of the catalog used by item and shopping-list management.
#[async_trait]
pub trait CatalogRecords: CatalogStore {
    /// Every item, including inactive and deleted ones, ordered by code.
    async fn find_all_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Item with the given code regardless of its status.
    async fn find_item_by_code(&self, code: &ItemCode) -> Result<Option<Item>, StoreError>;

    /// Persists all of `items` or none of them.
    async fn save_items(&self, items: Vec<Item>) -> Result<Vec<Item>, StoreError>;

    async fn save_shopping_list(&self, list: ShoppingList) -> Result<ShoppingList, StoreError>;
}
