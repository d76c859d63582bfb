use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::rules::RuleTableError;
use super::strategy::{RecommendationStrategy, StrategyType};
use crate::domain::item::ItemCode;
use crate::errors::RecommendationError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("recommendation strategy `{0}` is registered more than once")]
    DuplicateStrategy(StrategyType),
    #[error("rule table is invalid: {0}")]
    InvalidRules(#[from] RuleTableError),
}

/// Strategies indexed by type. Built once during bootstrap and shared read-only.
pub struct StrategyRegistry {
    strategies: HashMap<StrategyType, Arc<dyn RecommendationStrategy>>,
}

impl StrategyRegistry {
    pub fn new(strategies: Vec<Arc<dyn RecommendationStrategy>>) -> Result<Self, RegistryError> {
        let mut indexed = HashMap::with_capacity(strategies.len());
        for strategy in strategies {
            let strategy_type = strategy.strategy_type();
            if indexed.insert(strategy_type, strategy).is_some() {
                return Err(RegistryError::DuplicateStrategy(strategy_type));
            }
        }
        Ok(Self { strategies: indexed })
    }

    pub fn recommend(
        &self,
        current_items: &[ItemCode],
        strategy_type: StrategyType,
    ) -> Result<Vec<ItemCode>, RecommendationError> {
        let strategy = self
            .strategies
            .get(&strategy_type)
            .ok_or(RecommendationError::UnknownStrategy(strategy_type))?;
        Ok(strategy.suggest(current_items))
    }

    pub fn is_registered(&self, strategy_type: StrategyType) -> bool {
        self.strategies.contains_key(&strategy_type)
    }

    pub fn registered_types(&self) -> Vec<StrategyType> {
        let mut types: Vec<_> = self.strategies.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry").field("strategies", &self.registered_types()).finish()
    }
}
