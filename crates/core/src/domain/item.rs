use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(pub String);

impl ItemCode {
    /// Catalog-assigned code for a freshly created item.
    pub fn generate() -> Self {
        Self(format!("item{}", super::next_code_stamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Case folding applied to item names and to name-prefix queries alike.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub code: ItemCode,
    pub name: String,
    pub price: Decimal,
    pub active: bool,
    pub deleted: bool,
    pub bought: bool,
}

impl Item {
    /// New catalog entry: active, not deleted, not bought.
    pub fn new(code: ItemCode, name: impl Into<String>, price: Decimal) -> Self {
        Self { code, name: name.into(), price, active: true, deleted: false, bought: false }
    }

    /// Only active, non-deleted items are visible to suggestion lookups.
    pub fn is_suggestable(&self) -> bool {
        self.active && !self.deleted
    }
}

/// Wire shape of an item returned to API callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item_name: String,
    pub item_price: Decimal,
    pub item_code: ItemCode,
    pub deleted: bool,
    pub active: bool,
    pub bought: bool,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            item_name: item.name,
            item_price: item.price,
            item_code: item.code,
            deleted: item.deleted,
            active: item.active,
            bought: item.bought,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub items: Vec<ItemView>,
}

impl ItemResponse {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items: items.into_iter().map(ItemView::from).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
