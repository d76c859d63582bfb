use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

pub mod item;
pub mod shopping_list;

pub use item::{Item, ItemCode, ItemResponse, ItemView};
pub use shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};

static LAST_CODE_STAMP: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp for generated codes, bumped past the previous one so
/// codes issued within the same millisecond stay distinct.
pub(crate) fn next_code_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_CODE_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        .unwrap_or(now);
    now.max(previous + 1)
}
