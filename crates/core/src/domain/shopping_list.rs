use serde::{Deserialize, Serialize};

use crate::domain::item::ItemCode;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingListCode(pub String);

impl ShoppingListCode {
    pub fn generate() -> Self {
        Self(format!("shplst{}", super::next_code_stamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShoppingListCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub item_code: ItemCode,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub code: ShoppingListCode,
    pub name: String,
    pub deleted: bool,
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Item codes in list order. Duplicate entries are kept; callers that need
    /// set semantics build an `ItemSet` from this.
    pub fn item_codes(&self) -> Vec<ItemCode> {
        self.items.iter().map(|entry| entry.item_code.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::item::ItemCode;

    use super::{ShoppingList, ShoppingListCode, ShoppingListItem};

    #[test]
    fn item_codes_follow_entry_order() {
        let list = ShoppingList {
            code: ShoppingListCode::from("shplst1"),
            name: "weekly".to_string(),
            deleted: false,
            items: vec![
                ShoppingListItem { item_code: ItemCode::from("item124547"), quantity: 1 },
                ShoppingListItem { item_code: ItemCode::from("item124546"), quantity: 3 },
            ],
        };

        assert_eq!(
            list.item_codes(),
            vec![ItemCode::from("item124547"), ItemCode::from("item124546")]
        );
    }

    #[test]
    fn generated_list_codes_carry_prefix() {
        assert!(ShoppingListCode::generate().0.starts_with("shplst"));
    }
}
