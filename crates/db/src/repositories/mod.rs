use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use shoplist_core::domain::item::{Item, ItemCode};
use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode};

pub mod item;
pub mod memory;
pub mod shopping_list;

pub use item::SqlItemRepository;
pub use memory::{InMemoryItemRepository, InMemoryShoppingListRepository};
pub use shopping_list::SqlShoppingListRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("validation error: {0}")]
    Validation(String),
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<Item>, RepositoryError>;

    /// Every item, including inactive and deleted ones, ordered by code.
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError>;

    /// Active, non-deleted items among `codes`. Unknown codes are skipped.
    async fn find_by_codes_in(&self, codes: &[ItemCode]) -> Result<Vec<Item>, RepositoryError>;

    /// Active, non-deleted items whose normalized name starts with
    /// `normalized_prefix`, ordered by normalized name then code.
    async fn find_by_prefix(
        &self,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Upserts `item`, assigning a generated code when it has none.
    async fn save(&self, item: Item) -> Result<Item, RepositoryError>;

    /// Upserts every item as one unit.
    async fn save_all(&self, items: Vec<Item>) -> Result<Vec<Item>, RepositoryError>;
}

#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// Non-deleted list with its entries in insertion order.
    async fn find_by_code(
        &self,
        code: &ShoppingListCode,
    ) -> Result<Option<ShoppingList>, RepositoryError>;

    /// Upserts `list`, keeping only entries that reference active catalog items.
    async fn save(&self, list: ShoppingList) -> Result<ShoppingList, RepositoryError>;
}

pub(crate) fn with_generated_code(mut item: Item) -> Item {
    if item.code.as_str().trim().is_empty() {
        item.code = ItemCode::generate();
    }
    item
}

/// Drops entries whose item is not in `known` and rejects a list left empty.
pub(crate) fn retain_known_items(
    mut list: ShoppingList,
    known: &HashSet<ItemCode>,
) -> Result<ShoppingList, RepositoryError> {
    if list.code.0.trim().is_empty() {
        list.code = ShoppingListCode::generate();
    }

    list.items.retain(|entry| known.contains(&entry.item_code));
    if list.items.is_empty() {
        return Err(RepositoryError::Validation(format!(
            "shopping list `{}` has no items that exist in the catalog",
            list.code.0
        )));
    }

    Ok(list)
}
