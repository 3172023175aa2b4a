//! Keyword category rules for the weekly spending report.
//!
//! Rules come from the caller (usually the config file). The first rule with
//! a keyword contained in the description wins; everything else is
//! uncategorized.

use serde::{Deserialize, Serialize};

pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, upper_desc: &str) -> bool {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .any(|k| upper_desc.contains(&k.to_uppercase()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category names in rule order, without duplicates.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.name) {
                names.push(rule.name.clone());
            }
        }
        names
    }

    /// Best-effort category for a description. Never fails.
    pub fn categorize(&self, description: Option<&str>) -> &str {
        let Some(desc) = description else {
            return UNCATEGORIZED;
        };
        let desc = desc.to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&desc))
            .map_or(UNCATEGORIZED, |rule| rule.name.as_str())
    }
}
