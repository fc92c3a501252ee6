//! Deterministic category rules mapping transaction descriptions to a
//! category label.
//!
//! Rules are an ordered list of `(keyword, category)` pairs evaluated top to
//! bottom: the first keyword found (case-insensitive substring) in the
//! description wins. No match falls back to "Uncategorized".

use serde::{Deserialize, Serialize};
use spendscope_core::ConfigError;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// One keyword→category rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
        }
    }
}

/// Ordered rule table. Keywords are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(|r| {
                let keyword = r.keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(ConfigError::EmptyKeyword(r.category));
                }
                Ok(CategoryRule::new(keyword, r.category.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// The first rule whose keyword occurs in `description`
    pub fn matching_rule(&self, description: &str) -> Option<&CategoryRule> {
        let desc = description.to_lowercase();
        self.rules.iter().find(|r| desc.contains(&r.keyword))
    }

    pub fn categorize(&self, description: &str) -> &str {
        self.matching_rule(description)
            .map(|r| r.category.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Built-in merchant map, then generic food words, then income words.
pub fn default_rules() -> Vec<CategoryRule> {
    const TABLE: &[(&str, &str)] = &[
        // Known merchants
        ("swiggy", "Food"),
        ("zomato", "Food"),
        ("dominos", "Food"),
        ("uber", "Transport"),
        ("ola", "Transport"),
        ("amazon", "Shopping"),
        ("flipkart", "Shopping"),
        ("netflix", "Entertainment"),
        ("spotify", "Entertainment"),
        ("pharm", "Personal"),
        ("clinic", "Personal"),
        // Eateries without a known brand
        ("hotel", "Food"),
        ("restaurant", "Food"),
        ("cafe", "Food"),
        ("dhaba", "Food"),
        ("snack", "Food"),
        ("tea", "Food"),
        ("coffee", "Food"),
        ("bakery", "Food"),
        ("juice", "Food"),
        ("dine", "Food"),
        // Money coming in
        ("salary", "Income"),
        ("cashback", "Income"),
        ("refund", "Income"),
    ];

    TABLE
        .iter()
        .map(|(keyword, category)| CategoryRule::new(*keyword, *category))
        .collect()
}
