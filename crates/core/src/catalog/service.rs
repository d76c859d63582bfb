use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::dto::{ItemRequest, ShopListEntry, ShoppingListRequest, ShoppingListUpdateRequest};
use super::records::CatalogRecords;
use crate::domain::item::{Item, ItemCode};
use crate::domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};
use crate::errors::CatalogError;

/// Item and shopping-list management on top of [`CatalogRecords`].
#[derive(Clone)]
pub struct CatalogService {
    records: Arc<dyn CatalogRecords>,
}

impl CatalogService {
    pub fn new(records: Arc<dyn CatalogRecords>) -> Self {
        Self { records }
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, CatalogError> {
        let items = self.records.find_all_items().await?;
        info!(event_name = "catalog.items.listed", count = items.len(), "listed catalog items");
        Ok(items)
    }

    pub async fn item_by_code(&self, code: &str) -> Result<Item, CatalogError> {
        let code = code.trim();
        self.records
            .find_item_by_code(&ItemCode::from(code))
            .await?
            .ok_or_else(|| CatalogError::ItemNotFound { code: code.to_string() })
    }

    /// Creates every requested item under a freshly generated code.
    pub async fn create_items(&self, request: ItemRequest) -> Result<Vec<Item>, CatalogError> {
        if request.items.is_empty() {
            return Err(CatalogError::ItemRequired);
        }

        let mut items = Vec::with_capacity(request.items.len());
        for (index, new_item) in request.items.into_iter().enumerate() {
            let name = new_item.name.trim();
            if name.is_empty() {
                return Err(CatalogError::InvalidItem(format!(
                    "item #{index}: name must not be blank"
                )));
            }
            if new_item.price < Decimal::ZERO {
                return Err(CatalogError::InvalidItem(format!(
                    "item #{index}: price must not be negative"
                )));
            }
            items.push(Item::new(ItemCode::generate(), name, new_item.price));
        }

        let saved = self.records.save_items(items).await?;
        info!(event_name = "catalog.items.created", count = saved.len(), "catalog items created");
        Ok(saved)
    }

    pub async fn shopping_list_by_code(&self, code: &str) -> Result<ShoppingList, CatalogError> {
        let code = code.trim();
        self.records
            .find_shopping_list_by_code(code)
            .await?
            .ok_or_else(|| CatalogError::ShoppingListNotFound { code: code.to_string() })
    }

    pub async fn create_shopping_list(
        &self,
        request: ShoppingListRequest,
    ) -> Result<ShoppingList, CatalogError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidShoppingList("name must not be blank".to_string()));
        }

        let items = self.resolve_entries(&request.items).await?;
        let list = ShoppingList {
            code: ShoppingListCode::generate(),
            name: name.to_string(),
            deleted: false,
            items,
        };

        let saved = self.records.save_shopping_list(list).await?;
        info!(
            event_name = "catalog.shopping_list.created",
            shopping_list_code = saved.code.as_str(),
            entries = saved.items.len(),
            "shopping list created"
        );
        Ok(saved)
    }

    /// Replaces the entries of an existing list. The list keeps its name.
    pub async fn update_shopping_list(
        &self,
        request: ShoppingListUpdateRequest,
    ) -> Result<ShoppingList, CatalogError> {
        let code = request.code.trim();
        if code.is_empty() {
            return Err(CatalogError::InvalidShoppingList("code must not be blank".to_string()));
        }

        let mut list = self.shopping_list_by_code(code).await?;
        list.items = self.resolve_entries(&request.items).await?;

        let saved = self.records.save_shopping_list(list).await?;
        info!(
            event_name = "catalog.shopping_list.updated",
            shopping_list_code = saved.code.as_str(),
            entries = saved.items.len(),
            "shopping list updated"
        );
        Ok(saved)
    }

    /// Validates entries, merges repeated codes by summing quantities and keeps
    /// only codes of active catalog items, in first-seen order.
    async fn resolve_entries(
        &self,
        entries: &[ShopListEntry],
    ) -> Result<Vec<ShoppingListItem>, CatalogError> {
        let mut merged: Vec<ShoppingListItem> = Vec::with_capacity(entries.len());
        let mut positions: HashMap<ItemCode, usize> = HashMap::new();
        for entry in entries.iter().map(ShoppingListItem::from) {
            if entry.item_code.as_str().is_empty() {
                return Err(CatalogError::InvalidShoppingList(
                    "item code must not be blank".to_string(),
                ));
            }
            if entry.quantity == 0 {
                return Err(CatalogError::InvalidShoppingList(format!(
                    "quantity for `{}` must be positive",
                    entry.item_code
                )));
            }
            match positions.get(&entry.item_code) {
                Some(&position) => {
                    let existing = &mut merged[position];
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => {
                    positions.insert(entry.item_code.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }

        let codes: Vec<ItemCode> = merged.iter().map(|entry| entry.item_code.clone()).collect();
        let active: HashSet<ItemCode> = self
            .records
            .find_active_items_by_codes(&codes)
            .await?
            .into_iter()
            .map(|item| item.code)
            .collect();

        let requested = merged.len();
        merged.retain(|entry| active.contains(&entry.item_code));
        if merged.is_empty() {
            return Err(CatalogError::NoMatchingItems);
        }
        if merged.len() < requested {
            warn!(
                event_name = "catalog.shopping_list.entries_dropped",
                requested,
                kept = merged.len(),
                "entries without an active catalog item were dropped"
            );
        }
        Ok(merged)
    }
}
