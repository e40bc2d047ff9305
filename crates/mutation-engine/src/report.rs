//! End-of-run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use widget_dsl::{ComponentKind, Rulebook};

use crate::palette::Palette;
use crate::random::MutationOp;
use crate::stats::RunStats;

/// Size of the mutation value catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogInfo {
    pub components: usize,
    pub mutations: usize,
    pub colors: usize,
    pub icons: usize,
}

impl CatalogInfo {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            components: ComponentKind::ALL.len(),
            mutations: MutationOp::ALL.len(),
            colors: palette.color_count(),
            icons: palette.icon_count(),
        }
    }
}

/// Structural limits the run was validated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulebookInfo {
    pub max_depth: usize,
    pub max_children_per_container: usize,
    pub rule_count: usize,
}

impl From<&Rulebook> for RulebookInfo {
    fn from(rulebook: &Rulebook) -> Self {
        Self {
            max_depth: rulebook.max_depth,
            max_children_per_container: rulebook.max_children_per_container,
            rule_count: rulebook.rule_count(),
        }
    }
}

/// Variation axes of a controlled run; `null` entries mean "no variation"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAxes {
    pub themes: Vec<Option<String>>,
    pub sizes: Vec<Option<String>>,
}

/// One report per run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    /// `random` for uncontrolled runs, otherwise the controlled mode
    pub mode: String,
    pub target_count: u64,
    pub reached_target: bool,
    pub elapsed_seconds: f64,
    pub generated_at: DateTime<Utc>,
    pub stats: RunStats,
    pub catalog: CatalogInfo,
    pub rulebook: RulebookInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationAxes>,
}
