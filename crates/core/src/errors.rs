use thiserror::Error;

use crate::recommendation::{StoreError, StrategyType, MIN_PREFIX_LEN};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("invalid prefix: at least {} characters are required", MIN_PREFIX_LEN)]
    InvalidPrefix,
    #[error("invalid limit: must be greater than zero")]
    InvalidLimit,
    #[error("no shopping list found for code `{code}`")]
    ShoppingListNotFound { code: String },
    #[error("no recommendation strategy registered for `{0}`")]
    UnknownStrategy(StrategyType),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecommendationError {
    /// Stable label reported to transport callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPrefix => "InvalidPrefix",
            Self::InvalidLimit => "InvalidLimit",
            Self::ShoppingListNotFound { .. } => "ShoppingListNotFound",
            Self::UnknownStrategy(_) => "UnknownStrategy",
            Self::Store(_) => "UnknownError",
        }
    }
}

/// Failures of the item and shopping-list management operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("at least one item is required in the request")]
    ItemRequired,
    #[error("invalid item: {0}")]
    InvalidItem(String),
    #[error("invalid shopping list: {0}")]
    InvalidShoppingList(String),
    #[error("no item found for code `{code}`")]
    ItemNotFound { code: String },
    #[error("no shopping list found for code `{code}`")]
    ShoppingListNotFound { code: String },
    #[error("none of the requested items is active in the catalog")]
    NoMatchingItems,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemRequired => "ItemRequired",
            Self::InvalidItem(_) => "InvalidItem",
            Self::InvalidShoppingList(_) => "InvalidShoppingList",
            Self::ItemNotFound { .. } => "ItemNotFound",
            Self::ShoppingListNotFound { .. } => "ShoppingListNotFound",
            Self::NoMatchingItems => "NoMatchingItems",
            Self::Store(_) => "UnknownError",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { kind: &'static str, message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { kind: &'static str, message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { kind: &'static str, message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested resource does not exist.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { kind, .. }
            | Self::NotFound { kind, .. }
            | Self::Internal { kind, .. } => kind,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Recommendation(error) => {
                let kind = error.kind();
                let message = error.to_string();
                match error {
                    RecommendationError::InvalidPrefix
                    | RecommendationError::InvalidLimit
                    | RecommendationError::UnknownStrategy(_) => {
                        Self::BadRequest { kind, message, correlation_id }
                    }
                    RecommendationError::ShoppingListNotFound { .. } => {
                        Self::NotFound { kind, message, correlation_id }
                    }
                    RecommendationError::Store(_) => {
                        Self::Internal { kind, message, correlation_id }
                    }
                }
            }
            ApplicationError::Catalog(error) => {
                let kind = error.kind();
                let message = error.to_string();
                match error {
                    CatalogError::ItemRequired
                    | CatalogError::InvalidItem(_)
                    | CatalogError::InvalidShoppingList(_)
                    | CatalogError::NoMatchingItems => {
                        Self::BadRequest { kind, message, correlation_id }
                    }
                    CatalogError::ItemNotFound { .. }
                    | CatalogError::ShoppingListNotFound { .. } => {
                        Self::NotFound { kind, message, correlation_id }
                    }
                    CatalogError::Store(_) => Self::Internal { kind, message, correlation_id },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, CatalogError, InterfaceError, RecommendationError};
    use crate::recommendation::{StoreError, StrategyType};

    #[test]
    fn invalid_prefix_maps_to_bad_request_interface_error() {
        let interface =
            ApplicationError::from(RecommendationError::InvalidPrefix).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                kind: "InvalidPrefix",
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn unknown_strategy_is_a_distinct_bad_request() {
        let interface = ApplicationError::from(RecommendationError::UnknownStrategy(
            StrategyType::ExternalModel,
        ))
        .into_interface("req-2");

        assert_eq!(interface.kind(), "UnknownStrategy");
        assert!(interface.message().contains("EXTERNAL_MODEL"));
    }

    #[test]
    fn missing_shopping_list_maps_to_not_found() {
        let interface = ApplicationError::from(RecommendationError::ShoppingListNotFound {
            code: "NO_SUCH_CODE".to_owned(),
        })
        .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::NotFound { .. }));
        assert!(interface.message().contains("NO_SUCH_CODE"));
        assert_eq!(interface.correlation_id(), "req-3");
    }

    #[test]
    fn store_failure_maps_to_internal_unknown_error() {
        let interface = ApplicationError::from(RecommendationError::from(StoreError(
            "database lock timeout".to_owned(),
        )))
        .into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { kind: "UnknownError", .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn catalog_validation_failures_are_bad_requests() {
        for error in [
            CatalogError::ItemRequired,
            CatalogError::InvalidItem("name must not be blank".to_owned()),
            CatalogError::NoMatchingItems,
        ] {
            let kind = error.kind();
            let interface = ApplicationError::from(error).into_interface("req-5");

            assert!(matches!(interface, InterfaceError::BadRequest { .. }), "{kind}");
            assert_eq!(interface.kind(), kind);
        }
    }

    #[test]
    fn catalog_lookups_map_to_not_found() {
        let interface = ApplicationError::from(CatalogError::ItemNotFound {
            code: "item404".to_owned(),
        })
        .into_interface("req-6");

        assert!(matches!(interface, InterfaceError::NotFound { kind: "ItemNotFound", .. }));
        assert!(interface.message().contains("item404"));
        assert_eq!(interface.user_message(), "The requested resource does not exist.");
    }
}
