//! Validation rulebook
//!
//! Structural limits plus the list of named rules the validator enforces.
//! The default rulebook ships with the crate; a replacement can be loaded
//! from a JSON file.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DslError, Result};

const BUILTIN_RULEBOOK: &str = include_str!("../config/rulebook.json");

/// How a rule violation is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Rejects the document
    #[default]
    Error,
    /// Reported but does not reject
    Warning,
}

/// Rules the built-in validator knows how to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    MaxDepth,
    MaxChildren,
    KnownComponent,
    NonEmptyContainer,
    TextContent,
    ChartData,
    ColorFormat,
    PositiveDimensions,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxDepth => "max-depth",
            Self::MaxChildren => "max-children",
            Self::KnownComponent => "known-component",
            Self::NonEmptyContainer => "non-empty-container",
            Self::TextContent => "text-content",
            Self::ChartData => "chart-data",
            Self::ColorFormat => "color-format",
            Self::PositiveDimensions => "positive-dimensions",
        }
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "max-depth" => Ok(Self::MaxDepth),
            "max-children" => Ok(Self::MaxChildren),
            "known-component" => Ok(Self::KnownComponent),
            "non-empty-container" => Ok(Self::NonEmptyContainer),
            "text-content" => Ok(Self::TextContent),
            "chart-data" => Ok(Self::ChartData),
            "color-format" => Ok(Self::ColorFormat),
            "positive-dimensions" => Ok(Self::PositiveDimensions),
            other => Err(format!("Unknown rule '{}'", other)),
        }
    }
}

/// A named rule entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Structural limits and rule list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rulebook {
    pub max_depth: usize,
    pub max_children_per_container: usize,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl Rulebook {
    /// The rulebook bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_RULEBOOK)
    }

    /// Parse and sanity-check a rulebook
    pub fn from_json(json: &str) -> Result<Self> {
        let rulebook: Rulebook =
            serde_json::from_str(json).map_err(|e| DslError::parse("rulebook", e))?;
        if rulebook.max_depth == 0 {
            return Err(DslError::InvalidRulebook("maxDepth must be at least 1".into()));
        }
        if rulebook.max_children_per_container == 0 {
            return Err(DslError::InvalidRulebook(
                "maxChildrenPerContainer must be at least 1".into(),
            ));
        }
        Ok(rulebook)
    }

    /// Load a rulebook from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let rulebook = Self::from_json(&contents)?;
        log::info!(
            "Loaded rulebook from {:?} ({} rules)",
            path.as_ref(),
            rulebook.rules.len()
        );
        Ok(rulebook)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_rulebook_loads() {
        let rulebook = Rulebook::builtin().unwrap();
        assert_eq!(rulebook.max_children_per_container, 10);
        assert!(rulebook.max_depth >= 3);
        for rule in &rulebook.rules {
            assert!(rule.id.parse::<RuleId>().is_ok(), "unknown rule {}", rule.id);
        }
    }

    #[test]
    fn test_zero_limits_rejected() {
        let result = Rulebook::from_json(r#"{"maxDepth": 0, "maxChildrenPerContainer": 4}"#);
        assert!(matches!(result, Err(DslError::InvalidRulebook(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"maxDepth": 3, "maxChildrenPerContainer": 2, "rules": [{{"id": "max-depth"}}]}}"#
        )
        .unwrap();
        let rulebook = Rulebook::from_path(file.path()).unwrap();
        assert_eq!(rulebook.max_depth, 3);
        assert_eq!(rulebook.rules[0].severity, Severity::Error);

        assert!(Rulebook::from_path("/nonexistent/rulebook.json").is_err());
    }
}
