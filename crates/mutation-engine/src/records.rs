//! Provenance records
//!
//! Every applied mutation is described by a [`MutationRecord`]; every
//! persisted mutant is a [`GeneratedRecord`] carrying its seed, its result
//! and the ordered list of mutations between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use widget_dsl::{ContentHash, WidgetDocument};

use crate::controlled::GenerationMode;

/// One applied local mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    /// 1-based position within the mutant's mutation list
    pub step: usize,
    pub operation: String,
    pub category: String,
    pub description: String,
    /// Display-only locator of the mutated field
    pub target_path: String,
    pub before: Value,
    pub after: Value,
    /// `path: before → after`
    pub change_summary: String,
}

/// What a mutation handler reports after editing the document in place
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub description: String,
    pub target_path: String,
    pub before: Value,
    pub after: Value,
}

impl Change {
    /// Create a change description
    pub fn new(
        description: impl Into<String>,
        target_path: impl Into<String>,
        before: impl Into<Value>,
        after: impl Into<Value>,
    ) -> Self {
        Self {
            description: description.into(),
            target_path: target_path.into(),
            before: before.into(),
            after: after.into(),
        }
    }

    /// Human-readable diff line
    pub fn summary(&self) -> String {
        format!("{}: {} → {}", self.target_path, self.before, self.after)
    }

    /// Attach step numbering and operation identity
    pub fn into_record(self, step: usize, operation: &str, category: &str) -> MutationRecord {
        let change_summary = self.summary();
        MutationRecord {
            step,
            operation: operation.to_string(),
            category: category.to_string(),
            description: self.description,
            target_path: self.target_path,
            before: self.before,
            after: self.after,
            change_summary,
        }
    }
}

/// Variation axes applied to a controlled mutant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlledTag {
    pub theme: Option<String>,
    pub size: Option<String>,
    pub mode: GenerationMode,
}

/// A persisted mutant with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecord {
    /// Sequential within the run, starting at 1
    pub id: u64,
    pub run_id: String,
    pub seed_hash: ContentHash,
    #[serde(rename = "seedDSL")]
    pub seed_dsl: WidgetDocument,
    pub mutations: Vec<MutationRecord>,
    #[serde(rename = "resultDSL")]
    pub result_dsl: WidgetDocument,
    pub hash: ContentHash,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled: Option<ControlledTag>,
    /// Set when `resultDSL` is a validator repair; `mutations` then describe
    /// the mutant before the repair
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub repaired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_summary_format() {
        let change = Change::new(
            "Changed background color",
            "widget.backgroundColor",
            "#fff",
            "#111",
        );
        assert_eq!(
            change.summary(),
            r##"widget.backgroundColor: "#fff" → "#111""##
        );

        let record = change.into_record(2, "changeWidgetBackground", "colors");
        assert_eq!(record.step, 2);
        assert_eq!(record.after, json!("#111"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["targetPath"], json!("widget.backgroundColor"));
        assert!(value["changeSummary"].as_str().unwrap().contains('→'));
    }

    #[test]
    fn test_controlled_tag_serializes_null_axes() {
        let tag = ControlledTag {
            theme: Some("dark".into()),
            size: None,
            mode: GenerationMode::Controlled,
        };
        assert_eq!(
            serde_json::to_value(&tag).unwrap(),
            json!({"theme": "dark", "size": null, "mode": "controlled"})
        );
    }
}
