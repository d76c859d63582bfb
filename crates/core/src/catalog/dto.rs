use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemCode;
use crate::domain::shopping_list::{ShoppingList, ShoppingListItem};

/// Body of an item creation request. Codes are always assigned by the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub items: Vec<NewItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopListEntry {
    pub item_code: String,
    pub item_quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListRequest {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShopListEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListUpdateRequest {
    pub code: String,
    #[serde(default)]
    pub items: Vec<ShopListEntry>,
}

/// Wire shape of a stored shopping list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListResponse {
    pub name: String,
    pub code: String,
    pub deleted: bool,
    pub items: Vec<ShopListEntry>,
}

impl From<ShoppingList> for ShoppingListResponse {
    fn from(list: ShoppingList) -> Self {
        Self {
            name: list.name,
            code: list.code.0,
            deleted: list.deleted,
            items: list.items.into_iter().map(ShopListEntry::from).collect(),
        }
    }
}

impl From<ShoppingListItem> for ShopListEntry {
    fn from(entry: ShoppingListItem) -> Self {
        Self { item_code: entry.item_code.0, item_quantity: entry.quantity }
    }
}

impl From<&ShopListEntry> for ShoppingListItem {
    fn from(entry: &ShopListEntry) -> Self {
        Self {
            item_code: ItemCode(entry.item_code.trim().to_string()),
            quantity: entry.item_quantity,
        }
    }
}
