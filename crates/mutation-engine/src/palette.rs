//! Mutation value catalog
//!
//! The palette holds every value pool the mutators draw from, the category
//! weights of the random mutator, and the theme and size presets of the
//! controlled mutator. It is pure data: loaded once, validated, and shared
//! read-only for the rest of the run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::random::MutationCategory;

const BUILTIN_PALETTE: &str = include_str!("../config/palette.json");

/// Color pools by usage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPools {
    /// Widget-level backgrounds
    pub backgrounds: Vec<String>,
    pub container_backgrounds: Vec<String>,
    pub text: Vec<String>,
    /// Icon and badge colors
    pub accents: Vec<String>,
    pub chart: Vec<String>,
}

/// Alignment keywords for the two container axes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentPools {
    pub main: Vec<String>,
    pub cross: Vec<String>,
}

/// Icon names in two families, plus keyword lists per icon category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconPools {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    /// Category name to name fragments that place an icon in it
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

/// Value range and series length for one chart data magnitude
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBucket {
    pub min: u32,
    pub max: u32,
    pub min_points: usize,
    pub max_points: usize,
}

/// Chart-specific pools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPools {
    /// Magnitude buckets ("small", "medium")
    pub data: BTreeMap<String, DataBucket>,
    /// Named label sets
    pub labels: BTreeMap<String, Vec<String>>,
    pub orientations: Vec<String>,
    /// Component name to its variant names
    #[serde(default)]
    pub variants: BTreeMap<String, Vec<String>>,
}

/// Colors for the three depth/importance roles of a theme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleColors {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

/// Widget-level defaults of a theme
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeWidget {
    pub background_color: String,
    pub border_radius: u32,
}

/// A named color theme
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreset {
    pub widget: ThemeWidget,
    /// Container backgrounds by depth
    pub backgrounds: RoleColors,
    /// Text colors by importance
    pub text: RoleColors,
    pub accents: Vec<String>,
    /// Optional weight pool applied to text
    #[serde(default)]
    pub font_weights: Vec<u32>,
}

/// Font size pools keyed by text role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSizePools {
    pub title: Vec<u32>,
    pub subtitle: Vec<u32>,
    pub base: Vec<u32>,
}

/// Icon size pools keyed by current icon size bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconSizePools {
    pub small: Vec<u32>,
    pub medium: Vec<u32>,
    pub large: Vec<u32>,
}

/// A named size variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeVariant {
    pub gaps: Vec<u32>,
    pub paddings: Vec<u32>,
    pub font_sizes: FontSizePools,
    pub icon_sizes: IconSizePools,
    pub border_radius_multiplier: f64,
}

/// The full mutation value catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub category_weights: BTreeMap<MutationCategory, f64>,
    pub colors: ColorPools,
    pub font_sizes: Vec<u32>,
    pub font_weights: Vec<u32>,
    pub icon_sizes: Vec<u32>,
    pub component_sizes: Vec<u32>,
    pub gaps: Vec<u32>,
    pub paddings: Vec<u32>,
    pub border_radii: Vec<u32>,
    pub flex_values: Vec<u32>,
    pub aspect_ratios: Vec<f64>,
    pub widget_widths: Vec<u32>,
    pub widget_heights: Vec<u32>,
    pub alignments: AlignmentPools,
    pub icons: IconPools,
    /// Phrase bank by category
    pub text_content: BTreeMap<String, Vec<String>>,
    pub chart: ChartPools,
    #[serde(default)]
    pub themes: BTreeMap<String, ThemePreset>,
    #[serde(default)]
    pub size_variants: BTreeMap<String, SizeVariant>,
}

impl Palette {
    /// The palette bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PALETTE)
    }

    /// Parse and validate a palette from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let palette: Palette = serde_json::from_str(json)
            .map_err(|e| EngineError::config(format!("Failed to parse palette: {}", e)))?;
        palette.check()?;
        Ok(palette)
    }

    /// Load a palette from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("Failed to read palette {:?}: {}", path, e))
        })?;
        let palette = Self::from_json(&contents)?;
        log::info!(
            "Loaded palette from {:?} ({} themes, {} size variants)",
            path,
            palette.themes.len(),
            palette.size_variants.len()
        );
        Ok(palette)
    }

    /// Look up a theme by name
    pub fn theme(&self, name: &str) -> Result<&ThemePreset> {
        self.themes.get(name).ok_or_else(|| EngineError::UnknownPreset {
            kind: "theme",
            name: name.to_string(),
        })
    }

    /// Look up a size variant by name
    pub fn size_variant(&self, name: &str) -> Result<&SizeVariant> {
        self.size_variants
            .get(name)
            .ok_or_else(|| EngineError::UnknownPreset {
                kind: "size",
                name: name.to_string(),
            })
    }

    /// Number of distinct colors across all color pools and themes
    pub fn color_count(&self) -> usize {
        let mut colors: BTreeSet<&str> = BTreeSet::new();
        for pool in [
            &self.colors.backgrounds,
            &self.colors.container_backgrounds,
            &self.colors.text,
            &self.colors.accents,
            &self.colors.chart,
        ] {
            colors.extend(pool.iter().map(String::as_str));
        }
        for theme in self.themes.values() {
            colors.extend(theme.accents.iter().map(String::as_str));
        }
        colors.len()
    }

    /// Number of icon names across both families
    pub fn icon_count(&self) -> usize {
        self.icons.primary.len() + self.icons.secondary.len()
    }

    fn check(&self) -> Result<()> {
        let total_weight: f64 = self.category_weights.values().sum();
        if self.category_weights.values().any(|w| !(*w >= 0.0)) || !(total_weight > 0.0) {
            return Err(EngineError::config(
                "category weights must be non-negative with a positive sum",
            ));
        }

        let pools: [(&str, usize); 20] = [
            ("colors.backgrounds", self.colors.backgrounds.len()),
            ("colors.containerBackgrounds", self.colors.container_backgrounds.len()),
            ("colors.text", self.colors.text.len()),
            ("colors.accents", self.colors.accents.len()),
            ("colors.chart", self.colors.chart.len()),
            ("fontSizes", self.font_sizes.len()),
            ("fontWeights", self.font_weights.len()),
            ("iconSizes", self.icon_sizes.len()),
            ("componentSizes", self.component_sizes.len()),
            ("gaps", self.gaps.len()),
            ("paddings", self.paddings.len()),
            ("borderRadii", self.border_radii.len()),
            ("flexValues", self.flex_values.len()),
            ("aspectRatios", self.aspect_ratios.len()),
            ("widgetWidths", self.widget_widths.len()),
            ("widgetHeights", self.widget_heights.len()),
            ("alignments.main", self.alignments.main.len()),
            ("alignments.cross", self.alignments.cross.len()),
            ("icons.primary", self.icons.primary.len()),
            ("icons.secondary", self.icons.secondary.len()),
        ];
        if let Some((name, _)) = pools.iter().find(|(_, len)| *len == 0) {
            return Err(EngineError::config(format!("palette pool '{}' is empty", name)));
        }
        if self.text_content.values().all(Vec::is_empty) {
            return Err(EngineError::config("palette textContent has no phrases"));
        }
        if self.chart.data.is_empty() || self.chart.labels.is_empty() {
            return Err(EngineError::config(
                "palette chart pools need data buckets and label sets",
            ));
        }
        for (name, bucket) in &self.chart.data {
            if bucket.min > bucket.max
                || bucket.min_points == 0
                || bucket.min_points > bucket.max_points
            {
                return Err(EngineError::config(format!(
                    "chart data bucket '{}' has an empty range",
                    name
                )));
            }
        }
        for (name, theme) in &self.themes {
            if theme.accents.is_empty() {
                return Err(EngineError::config(format!("theme '{}' has no accents", name)));
            }
        }
        for (name, variant) in &self.size_variants {
            let empty = variant.gaps.is_empty()
                || variant.paddings.is_empty()
                || variant.font_sizes.title.is_empty()
                || variant.font_sizes.subtitle.is_empty()
                || variant.font_sizes.base.is_empty()
                || variant.icon_sizes.small.is_empty()
                || variant.icon_sizes.medium.is_empty()
                || variant.icon_sizes.large.is_empty();
            if empty || !(variant.border_radius_multiplier > 0.0) {
                return Err(EngineError::config(format!(
                    "size variant '{}' has an empty pool or non-positive multiplier",
                    name
                )));
            }
        }
        Ok(())
    }
}
