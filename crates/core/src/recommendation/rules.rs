//! Static rule table backing the basic strategy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::item::ItemCode;

/// Unordered set of item codes, used both for list contents and rule preconditions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemSet(HashSet<ItemCode>);

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &ItemCode) -> bool {
        self.0.contains(code)
    }

    pub fn is_superset(&self, other: &ItemSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemCode> {
        self.0.iter()
    }
}

impl FromIterator<ItemCode> for ItemSet {
    fn from_iter<I: IntoIterator<Item = ItemCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a ItemCode> for ItemSet {
    fn from_iter<I: IntoIterator<Item = &'a ItemCode>>(iter: I) -> Self {
        Self(iter.into_iter().cloned().collect())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("rule precondition must name at least one item")]
    EmptyPrecondition,
    #[error("rule must suggest at least one item")]
    EmptySuggestions,
    #[error("rule references a blank item code")]
    BlankCode,
    #[error("rule #{index} is invalid: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: Box<RuleTableError>,
    },
}

/// Rule declaration as it appears in configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub precondition: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionRule {
    precondition: ItemSet,
    suggestions: Vec<ItemCode>,
}

impl SuggestionRule {
    pub fn new(
        precondition: impl IntoIterator<Item = ItemCode>,
        suggestions: Vec<ItemCode>,
    ) -> Result<Self, RuleTableError> {
        let precondition: ItemSet = precondition.into_iter().collect();
        if precondition.is_empty() {
            return Err(RuleTableError::EmptyPrecondition);
        }
        if suggestions.is_empty() {
            return Err(RuleTableError::EmptySuggestions);
        }
        let blank = |code: &ItemCode| code.as_str().trim().is_empty();
        if precondition.iter().any(blank) || suggestions.iter().any(blank) {
            return Err(RuleTableError::BlankCode);
        }
        Ok(Self { precondition, suggestions })
    }

    pub fn precondition(&self) -> &ItemSet {
        &self.precondition
    }

    pub fn suggestions(&self) -> &[ItemCode] {
        &self.suggestions
    }

    /// A rule fires when every precondition item is already present.
    pub fn matches(&self, current: &ItemSet) -> bool {
        current.is_superset(&self.precondition)
    }
}

#[derive(Debug, Clone, Copy)]
struct RuleSeed {
    precondition: &'static [&'static str],
    suggestions: &'static [&'static str],
}

const BUILTIN_RULES: &[RuleSeed] = &[
    RuleSeed {
        precondition: &["item124546", "item124547"],
        suggestions: &["item1245461", "item1245462"],
    },
    RuleSeed { precondition: &["item124545", "item1245460"], suggestions: &["item1245463"] },
    RuleSeed { precondition: &["item124548"], suggestions: &["item1245464", "item1245465"] },
    RuleSeed {
        precondition: &["item1245460", "item124549", "item124546"],
        suggestions: &["item1245466", "item1245467"],
    },
];

/// Ordered, read-only list of suggestion rules.
///
/// Rules are scanned in insertion order and the first rule whose precondition
/// is satisfied wins; suggestions are never merged across rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<SuggestionRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<SuggestionRule>) -> Self {
        Self { rules }
    }

    /// The reference table shipped with the service.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|seed| SuggestionRule {
                precondition: seed.precondition.iter().copied().map(ItemCode::from).collect(),
                suggestions: seed.suggestions.iter().copied().map(ItemCode::from).collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, RuleTableError> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                SuggestionRule::new(
                    rule.precondition.iter().map(|code| ItemCode(code.trim().to_string())),
                    rule.suggestions.iter().map(|code| ItemCode(code.trim().to_string())).collect(),
                )
                .map_err(|source| RuleTableError::InvalidRule { index, source: Box::new(source) })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Suggestions of the first matching rule, minus anything already present.
    pub fn lookup(&self, current: &ItemSet) -> Vec<ItemCode> {
        let Some(rule) = self.rules.iter().find(|rule| rule.matches(current)) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        rule.suggestions
            .iter()
            .filter(|code| !current.contains(code))
            .filter(|code| seen.insert(*code))
            .cloned()
            .collect()
    }

    pub fn rules(&self) -> &[SuggestionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
