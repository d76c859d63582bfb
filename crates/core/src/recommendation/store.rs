use async_trait::async_trait;
use thiserror::Error;

use crate::domain::item::{Item, ItemCode};
use crate::domain::shopping_list::ShoppingList;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("catalog store failure: {0}")]
pub struct StoreError(pub String);

/// Read side of the item and shopping-list store consumed by the engine.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Non-deleted shopping list with the given code.
    async fn find_shopping_list_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ShoppingList>, StoreError>;

    /// Active, non-deleted items among `codes`, in any order.
    async fn find_active_items_by_codes(&self, codes: &[ItemCode])
        -> Result<Vec<Item>, StoreError>;

    /// Active, non-deleted items whose lower-cased name starts with
    /// `normalized_prefix`, first page of size `limit`.
    async fn find_active_items_by_name_prefix(
        &self,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<Item>, StoreError>;
}
