//! Item and shopping-list management
//!
//! Creates catalog items under generated codes and maintains shopping lists
//! whose entries always reference active items.

mod dto;
mod records;
mod service;

pub use dto::{
    ItemRequest, NewItem, ShopListEntry, ShoppingListRequest, ShoppingListResponse,
    ShoppingListUpdateRequest,
};
pub use records::CatalogRecords;
pub use service::CatalogService;
