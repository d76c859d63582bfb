pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendation;

pub use catalog::{CatalogRecords, CatalogService};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::item::{Item, ItemCode, ItemResponse, ItemView};
pub use domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};
pub use errors::{ApplicationError, CatalogError, InterfaceError, RecommendationError};
pub use recommendation::{
    CatalogStore, RecommendationService, RecommendationStrategy, RuleTable, StoreError,
    StrategyRegistry, StrategyType,
};
