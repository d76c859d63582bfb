use std::sync::Arc;

use super::store::CatalogStore;
use crate::domain::item::{normalize_name, Item};
use crate::errors::RecommendationError;

pub const MIN_PREFIX_LEN: usize = 3;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated, normalized name-prefix query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixQuery {
    normalized: String,
    limit: u32,
}

impl PrefixQuery {
    /// Trims and lower-cases `prefix`. The length check runs on the trimmed value.
    pub fn new(prefix: Option<&str>, limit: Option<u32>) -> Result<Self, RecommendationError> {
        let trimmed = prefix.map(str::trim).ok_or(RecommendationError::InvalidPrefix)?;
        if trimmed.chars().count() < MIN_PREFIX_LEN {
            return Err(RecommendationError::InvalidPrefix);
        }

        let limit = match limit {
            Some(0) => return Err(RecommendationError::InvalidLimit),
            Some(limit) => limit.min(MAX_PAGE_SIZE),
            None => DEFAULT_LIMIT,
        };

        Ok(Self { normalized: normalize_name(trimmed), limit })
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

#[derive(Clone)]
pub struct PrefixSearch {
    store: Arc<dyn CatalogStore>,
}

impl PrefixSearch {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn suggest(&self, query: &PrefixQuery) -> Result<Vec<Item>, RecommendationError> {
        let items =
            self.store.find_active_items_by_name_prefix(query.normalized(), query.limit()).await?;
        Ok(items.into_iter().filter(Item::is_suggestable).take(query.limit() as usize).collect())
    }
}
