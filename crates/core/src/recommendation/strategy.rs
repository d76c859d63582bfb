use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rules::{ItemSet, RuleTable};
use crate::domain::item::ItemCode;

/// Key used to select a suggestion algorithm at call time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    #[default]
    Basic,
    RuleBased,
    ExternalModel,
}

impl StrategyType {
    const ALL: [StrategyType; 3] =
        [StrategyType::Basic, StrategyType::RuleBased, StrategyType::ExternalModel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::RuleBased => "RULE_BASED",
            Self::ExternalModel => "EXTERNAL_MODEL",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported recommendation engine `{0}` (expected BASIC|RULE_BASED|EXTERNAL_MODEL)")]
pub struct ParseStrategyTypeError(pub String);

impl FromStr for StrategyType {
    type Err = ParseStrategyTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|strategy_type| strategy_type.as_str() == normalized)
            .ok_or_else(|| ParseStrategyTypeError(value.to_string()))
    }
}

/// One interchangeable suggestion algorithm.
///
/// `current_items` is list-derived and may contain duplicates; implementations
/// treat it as a set. Returned codes must be distinct and must not repeat any
/// input code.
pub trait RecommendationStrategy: Send + Sync {
    fn strategy_type(&self) -> StrategyType;

    fn suggest(&self, current_items: &[ItemCode]) -> Vec<ItemCode>;
}

/// Rule-table lookup, registered under [`StrategyType::Basic`].
#[derive(Clone, Debug)]
pub struct BasicRuleStrategy {
    rules: Arc<RuleTable>,
}

impl BasicRuleStrategy {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }
}

impl RecommendationStrategy for BasicRuleStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Basic
    }

    fn suggest(&self, current_items: &[ItemCode]) -> Vec<ItemCode> {
        let current: ItemSet = current_items.iter().collect();
        self.rules.lookup(&current)
    }
}
