//! Add-on recommendation engine
//!
//! Suggests catalog items for a shopping list through interchangeable
//! strategies selected by [`StrategyType`], and serves name-prefix lookups.
//! The rule table and the strategy registry are built once at startup and
//! shared read-only between requests.

mod prefix;
mod registry;
mod rules;
mod service;
mod store;
mod strategy;

pub use prefix::{PrefixQuery, PrefixSearch, DEFAULT_LIMIT, MAX_PAGE_SIZE, MIN_PREFIX_LEN};
pub use registry::{RegistryError, StrategyRegistry};
pub use rules::{ItemSet, RuleConfig, RuleTable, RuleTableError, SuggestionRule};
pub use service::RecommendationService;
pub use store::{CatalogStore, StoreError};
pub use strategy::{
    BasicRuleStrategy, ParseStrategyTypeError, RecommendationStrategy, StrategyType,
};
