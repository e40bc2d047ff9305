//! Controlled mutator
//!
//! Whole-tree transformations driven by named presets. A theme recolors the
//! tree by role (container depth, text importance, icon category); a size
//! variant rescales spacing, type and icons by role. Roles are derived from
//! each node's current values, so re-applying a theme yields the same colors.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use widget_dsl::tree::{self, NodePath};
use widget_dsl::{ComponentKind, Leaf, Node, WidgetDocument};

use crate::constants::roles;
use crate::error::{EngineError, Result};
use crate::palette::{Palette, SizeVariant, ThemePreset};
use crate::records::{Change, MutationRecord};
use crate::sampling::pick;

/// How controlled generation composes with the random mutator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Theme and size only
    #[default]
    Controlled,
    /// Presets followed by a random mutation pass
    Random,
    /// Same composition as `Random`
    Hybrid,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Controlled => "controlled",
            GenerationMode::Random => "random",
            GenerationMode::Hybrid => "hybrid",
        }
    }

    /// Whether a random mutation pass follows the presets
    pub fn chains_random_pass(&self) -> bool {
        !matches!(self, GenerationMode::Controlled)
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "controlled" => Ok(GenerationMode::Controlled),
            "random" => Ok(GenerationMode::Random),
            "hybrid" => Ok(GenerationMode::Hybrid),
            other => Err(format!(
                "unknown mode '{}' (expected controlled, random or hybrid)",
                other
            )),
        }
    }
}

/// Presets to apply to one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlledOptions {
    pub theme: Option<String>,
    pub size: Option<String>,
    pub mode: GenerationMode,
}

/// Result of applying presets
#[derive(Debug, Clone)]
pub struct ControlledOutcome {
    pub document: WidgetDocument,
    pub mutations: Vec<MutationRecord>,
    /// The caller should chain a random pass, numbering after `mutations`
    pub requires_random_pass: bool,
}

/// Importance of a text leaf for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextRole {
    Primary,
    Secondary,
    Tertiary,
}

impl TextRole {
    fn of(font_size: Option<f64>, font_weight: Option<u32>) -> Self {
        let size = font_size.unwrap_or(0.0);
        let weight = font_weight.unwrap_or(0);
        if size >= roles::PRIMARY_FONT_SIZE || weight >= roles::PRIMARY_FONT_WEIGHT {
            TextRole::Primary
        } else if size >= roles::SECONDARY_FONT_SIZE || weight >= roles::SECONDARY_FONT_WEIGHT {
            TextRole::Secondary
        } else {
            TextRole::Tertiary
        }
    }
}

/// Icon grouping used to decide between accent and neutral colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconCategory {
    Status,
    Weather,
    Navigation,
    Data,
    Decorative,
    Generic,
}

impl IconCategory {
    /// Categories in matching priority order
    const MATCH_ORDER: [IconCategory; 5] = [
        IconCategory::Status,
        IconCategory::Weather,
        IconCategory::Navigation,
        IconCategory::Data,
        IconCategory::Decorative,
    ];

    fn key(&self) -> &'static str {
        match self {
            IconCategory::Status => "status",
            IconCategory::Weather => "weather",
            IconCategory::Navigation => "navigation",
            IconCategory::Data => "data",
            IconCategory::Decorative => "decorative",
            IconCategory::Generic => "generic",
        }
    }

    /// Categorize an icon name by the palette's keyword lists
    pub fn classify(name: &str, palette: &Palette) -> Self {
        let name = name.to_ascii_lowercase();
        Self::MATCH_ORDER
            .into_iter()
            .find(|category| {
                palette
                    .icons
                    .categories
                    .get(category.key())
                    .map_or(false, |keywords| keywords.iter().any(|k| name.contains(k.as_str())))
            })
            .unwrap_or(IconCategory::Generic)
    }

    fn takes_accent(&self) -> bool {
        matches!(self, IconCategory::Decorative | IconCategory::Generic)
    }
}

/// Stable index into a pool for a given name
fn stable_index(name: &str, len: usize) -> usize {
    let hash = name
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    hash % len.max(1)
}

/// Applies theme and size presets
pub struct ControlledMutator {
    palette: Arc<Palette>,
}

impl ControlledMutator {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    /// Apply the requested presets to a copy of `document`
    pub fn apply(
        &self,
        document: &WidgetDocument,
        options: &ControlledOptions,
        rng: &mut StdRng,
    ) -> Result<ControlledOutcome> {
        // Resolve presets before touching anything
        let theme = options.theme.as_deref().map(|n| self.palette.theme(n)).transpose()?;
        let size = options
            .size
            .as_deref()
            .map(|n| self.palette.size_variant(n))
            .transpose()?;

        let mut document = document.clone();
        let mut mutations = Vec::new();

        if let (Some(name), Some(theme)) = (options.theme.as_deref(), theme) {
            let changed = self.apply_theme(&mut document, theme, rng);
            let step = mutations.len() + 1;
            mutations.push(
                Change::new(
                    format!("Applied {} theme ({} fields)", name, changed),
                    "widget",
                    Value::Null,
                    name,
                )
                .into_record(step, "applyTheme", "theme"),
            );
        }
        if let (Some(name), Some(size)) = (options.size.as_deref(), size) {
            let changed = apply_size(&mut document, size, rng);
            let step = mutations.len() + 1;
            mutations.push(
                Change::new(
                    format!("Applied {} size variant ({} fields)", name, changed),
                    "widget",
                    Value::Null,
                    name,
                )
                .into_record(step, "applySize", "size"),
            );
        }

        Ok(ControlledOutcome {
            document,
            mutations,
            requires_random_pass: options.mode.chains_random_pass(),
        })
    }

    /// Recolor the whole tree; returns the number of fields written
    fn apply_theme(&self, document: &mut WidgetDocument, theme: &ThemePreset, rng: &mut StdRng) -> usize {
        let mut changed = 2;
        document.widget.background_color = Some(theme.widget.background_color.clone());
        document.widget.border_radius = Some(theme.widget.border_radius);

        for path in all_paths(document.root()) {
            let Some(node) = tree::node_at_mut(document.root_mut(), &path) else {
                continue;
            };
            match node {
                Node::Container(container) => {
                    let color = match path.depth() {
                        0 => &theme.backgrounds.primary,
                        1 => &theme.backgrounds.secondary,
                        _ => &theme.backgrounds.tertiary,
                    };
                    container.background_color = Some(color.clone());
                    changed += 1;
                }
                Node::Leaf(leaf) => changed += self.theme_leaf(leaf, theme, rng),
            }
        }
        changed
    }

    fn theme_leaf(&self, leaf: &mut Leaf, theme: &ThemePreset, rng: &mut StdRng) -> usize {
        let Some(kind) = leaf.kind() else {
            return 0;
        };
        match kind {
            ComponentKind::Text => {
                let size = leaf.font_size();
                let role = TextRole::of(size, leaf.font_weight());
                // Only weights that keep the role, so the color stays put
                let weights: Vec<u32> = theme
                    .font_weights
                    .iter()
                    .copied()
                    .filter(|w| TextRole::of(size, Some(*w)) == role)
                    .collect();
                let mut changed = 1;
                if let Some(weight) = weights.choose(rng) {
                    leaf.set_prop("fontWeight", json!(weight));
                    changed += 1;
                }
                let color = match role {
                    TextRole::Primary => &theme.text.primary,
                    TextRole::Secondary => &theme.text.secondary,
                    TextRole::Tertiary => &theme.text.tertiary,
                };
                leaf.set_prop("color", json!(color));
                changed
            }
            ComponentKind::Icon => {
                let name = leaf.icon_name().unwrap_or_default().to_string();
                let color = if IconCategory::classify(&name, &self.palette).takes_accent() {
                    &theme.accents[stable_index(&name, theme.accents.len())]
                } else {
                    &theme.text.secondary
                };
                leaf.set_prop("color", json!(color));
                1
            }
            chart if chart.is_chart() => {
                let accents = &theme.accents;
                match leaf.props.get("colors").and_then(Value::as_array).map(Vec::len) {
                    Some(len) => {
                        let colors: Vec<Value> =
                            (0..len).map(|i| json!(accents[i % accents.len()])).collect();
                        leaf.set_prop("colors", Value::Array(colors));
                    }
                    None => {
                        leaf.set_prop("color", json!(accents[0]));
                    }
                }
                1
            }
            _ => 0,
        }
    }
}

/// Rescale spacing, type and icons; returns the number of fields written
fn apply_size(document: &mut WidgetDocument, size: &SizeVariant, rng: &mut StdRng) -> usize {
    let mut changed = 0;
    if let Some(radius) = document.widget.border_radius {
        document.widget.border_radius =
            Some((radius as f64 * size.border_radius_multiplier).round() as u32);
        changed += 1;
    }

    for path in all_paths(document.root()) {
        let Some(node) = tree::node_at_mut(document.root_mut(), &path) else {
            continue;
        };
        match node {
            Node::Container(container) => {
                container.gap = pick(&size.gaps, rng).copied();
                container.padding = pick(&size.paddings, rng).copied();
                changed += 2;
            }
            Node::Leaf(leaf) => match leaf.kind() {
                Some(ComponentKind::Text) => {
                    let current = leaf.font_size().unwrap_or(0.0);
                    let pool = if current >= roles::TITLE_FONT_SIZE {
                        &size.font_sizes.title
                    } else if current >= roles::SUBTITLE_FONT_SIZE {
                        &size.font_sizes.subtitle
                    } else {
                        &size.font_sizes.base
                    };
                    if let Some(next) = pick(pool, rng) {
                        leaf.set_prop("fontSize", json!(next));
                        changed += 1;
                    }
                }
                Some(ComponentKind::Icon) => {
                    let current = leaf.icon_size().unwrap_or(roles::SMALL_ICON);
                    let pool = if current < roles::SMALL_ICON {
                        &size.icon_sizes.small
                    } else if current < roles::MEDIUM_ICON {
                        &size.icon_sizes.medium
                    } else {
                        &size.icon_sizes.large
                    };
                    if let Some(next) = pick(pool, rng) {
                        leaf.set_prop("size", json!(next));
                        changed += 1;
                    }
                }
                _ => {}
            },
        }
    }
    changed
}

fn all_paths(root: &Node) -> Vec<NodePath> {
    tree::collect(root, |_, _| true)
}
