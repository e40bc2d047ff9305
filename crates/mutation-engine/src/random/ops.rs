//! Mutation catalog
//!
//! Operations are a closed enum grouped by category. Each operation maps to
//! exactly one handler through [`MutationOp::handler`], so adding an
//! operation without wiring it up fails to compile.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use widget_dsl::WidgetDocument;

use super::{chart, colors, content, layout, sizes, structure, style, MutationContext};
use crate::records::Change;

/// Weighted bucket of related operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationCategory {
    Colors,
    Sizes,
    Layout,
    Content,
    Chart,
    Structure,
    Style,
}

impl MutationCategory {
    pub const ALL: [MutationCategory; 7] = [
        MutationCategory::Colors,
        MutationCategory::Sizes,
        MutationCategory::Layout,
        MutationCategory::Content,
        MutationCategory::Chart,
        MutationCategory::Structure,
        MutationCategory::Style,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MutationCategory::Colors => "colors",
            MutationCategory::Sizes => "sizes",
            MutationCategory::Layout => "layout",
            MutationCategory::Content => "content",
            MutationCategory::Chart => "chart",
            MutationCategory::Structure => "structure",
            MutationCategory::Style => "style",
        }
    }

    /// Operations drawn uniformly once this category is selected
    pub fn operations(&self) -> &'static [MutationOp] {
        use MutationOp::*;
        match self {
            MutationCategory::Colors => &[
                ChangeWidgetBackground,
                ChangeContainerBackground,
                ChangeTextColor,
                ChangeIconColor,
            ],
            MutationCategory::Sizes => &[
                ChangeFontSize,
                ChangeIconSize,
                ChangeComponentSize,
                ChangeBorderRadius,
            ],
            MutationCategory::Layout => &[
                ChangeGap,
                ChangePadding,
                ChangeFlex,
                ChangeDirection,
                ChangeAlignment,
            ],
            MutationCategory::Content => &[ChangeTextContent, ChangeIconName],
            MutationCategory::Chart => &[
                MutateChartData,
                MutateChartLabels,
                MutateChartColors,
                MutateChartOrientation,
                MutateChartVariant,
            ],
            MutationCategory::Structure => &[
                AddNode,
                RemoveNode,
                SwapChildren,
                DuplicateNode,
                NestNode,
                FlattenContainer,
                ChangeComponentType,
            ],
            MutationCategory::Style => &[
                ChangeFontWeight,
                ChangeWidgetProperties,
                ChangeWidgetPadding,
            ],
        }
    }
}

impl fmt::Display for MutationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler signature: edit the document in place and describe the edit, or
/// return `None` when no suitable target exists
pub type OpHandler = fn(&mut WidgetDocument, &MutationContext<'_>, &mut StdRng) -> Option<Change>;

/// A concrete local mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOp {
    ChangeWidgetBackground,
    ChangeContainerBackground,
    ChangeTextColor,
    ChangeIconColor,
    ChangeFontSize,
    ChangeIconSize,
    ChangeComponentSize,
    ChangeBorderRadius,
    ChangeGap,
    ChangePadding,
    ChangeFlex,
    ChangeDirection,
    ChangeAlignment,
    ChangeTextContent,
    ChangeIconName,
    MutateChartData,
    MutateChartLabels,
    MutateChartColors,
    MutateChartOrientation,
    MutateChartVariant,
    AddNode,
    RemoveNode,
    SwapChildren,
    DuplicateNode,
    NestNode,
    FlattenContainer,
    ChangeComponentType,
    ChangeFontWeight,
    ChangeWidgetProperties,
    ChangeWidgetPadding,
}

impl MutationOp {
    pub const ALL: [MutationOp; 30] = [
        MutationOp::ChangeWidgetBackground,
        MutationOp::ChangeContainerBackground,
        MutationOp::ChangeTextColor,
        MutationOp::ChangeIconColor,
        MutationOp::ChangeFontSize,
        MutationOp::ChangeIconSize,
        MutationOp::ChangeComponentSize,
        MutationOp::ChangeBorderRadius,
        MutationOp::ChangeGap,
        MutationOp::ChangePadding,
        MutationOp::ChangeFlex,
        MutationOp::ChangeDirection,
        MutationOp::ChangeAlignment,
        MutationOp::ChangeTextContent,
        MutationOp::ChangeIconName,
        MutationOp::MutateChartData,
        MutationOp::MutateChartLabels,
        MutationOp::MutateChartColors,
        MutationOp::MutateChartOrientation,
        MutationOp::MutateChartVariant,
        MutationOp::AddNode,
        MutationOp::RemoveNode,
        MutationOp::SwapChildren,
        MutationOp::DuplicateNode,
        MutationOp::NestNode,
        MutationOp::FlattenContainer,
        MutationOp::ChangeComponentType,
        MutationOp::ChangeFontWeight,
        MutationOp::ChangeWidgetProperties,
        MutationOp::ChangeWidgetPadding,
    ];

    /// Operation name as recorded in provenance
    pub fn name(&self) -> &'static str {
        match self {
            MutationOp::ChangeWidgetBackground => "changeWidgetBackground",
            MutationOp::ChangeContainerBackground => "changeContainerBackground",
            MutationOp::ChangeTextColor => "changeTextColor",
            MutationOp::ChangeIconColor => "changeIconColor",
            MutationOp::ChangeFontSize => "changeFontSize",
            MutationOp::ChangeIconSize => "changeIconSize",
            MutationOp::ChangeComponentSize => "changeComponentSize",
            MutationOp::ChangeBorderRadius => "changeBorderRadius",
            MutationOp::ChangeGap => "changeGap",
            MutationOp::ChangePadding => "changePadding",
            MutationOp::ChangeFlex => "changeFlex",
            MutationOp::ChangeDirection => "changeDirection",
            MutationOp::ChangeAlignment => "changeAlignment",
            MutationOp::ChangeTextContent => "changeTextContent",
            MutationOp::ChangeIconName => "changeIconName",
            MutationOp::MutateChartData => "mutateChartData",
            MutationOp::MutateChartLabels => "mutateChartLabels",
            MutationOp::MutateChartColors => "mutateChartColors",
            MutationOp::MutateChartOrientation => "mutateChartOrientation",
            MutationOp::MutateChartVariant => "mutateChartVariant",
            MutationOp::AddNode => "addNode",
            MutationOp::RemoveNode => "removeNode",
            MutationOp::SwapChildren => "swapChildren",
            MutationOp::DuplicateNode => "duplicateNode",
            MutationOp::NestNode => "nestNode",
            MutationOp::FlattenContainer => "flattenContainer",
            MutationOp::ChangeComponentType => "changeComponentType",
            MutationOp::ChangeFontWeight => "changeFontWeight",
            MutationOp::ChangeWidgetProperties => "changeWidgetProperties",
            MutationOp::ChangeWidgetPadding => "changeWidgetPadding",
        }
    }

    pub fn category(&self) -> MutationCategory {
        MutationCategory::ALL
            .into_iter()
            .find(|c| c.operations().contains(self))
            .unwrap_or(MutationCategory::Style)
    }

    /// Chart operations only apply when the tree already holds a chart
    pub fn requires_chart(&self) -> bool {
        self.category() == MutationCategory::Chart
    }

    /// Dispatch table
    pub fn handler(&self) -> OpHandler {
        match self {
            MutationOp::ChangeWidgetBackground => colors::change_widget_background,
            MutationOp::ChangeContainerBackground => colors::change_container_background,
            MutationOp::ChangeTextColor => colors::change_text_color,
            MutationOp::ChangeIconColor => colors::change_icon_color,
            MutationOp::ChangeFontSize => sizes::change_font_size,
            MutationOp::ChangeIconSize => sizes::change_icon_size,
            MutationOp::ChangeComponentSize => sizes::change_component_size,
            MutationOp::ChangeBorderRadius => sizes::change_border_radius,
            MutationOp::ChangeGap => layout::change_gap,
            MutationOp::ChangePadding => layout::change_padding,
            MutationOp::ChangeFlex => layout::change_flex,
            MutationOp::ChangeDirection => layout::change_direction,
            MutationOp::ChangeAlignment => layout::change_alignment,
            MutationOp::ChangeTextContent => content::change_text_content,
            MutationOp::ChangeIconName => content::change_icon_name,
            MutationOp::MutateChartData => chart::mutate_chart_data,
            MutationOp::MutateChartLabels => chart::mutate_chart_labels,
            MutationOp::MutateChartColors => chart::mutate_chart_colors,
            MutationOp::MutateChartOrientation => chart::mutate_chart_orientation,
            MutationOp::MutateChartVariant => chart::mutate_chart_variant,
            MutationOp::AddNode => structure::add_node,
            MutationOp::RemoveNode => structure::remove_node,
            MutationOp::SwapChildren => structure::swap_children,
            MutationOp::DuplicateNode => structure::duplicate_node,
            MutationOp::NestNode => structure::nest_node,
            MutationOp::FlattenContainer => structure::flatten_container,
            MutationOp::ChangeComponentType => structure::change_component_type,
            MutationOp::ChangeFontWeight => style::change_font_weight,
            MutationOp::ChangeWidgetProperties => style::change_widget_properties,
            MutationOp::ChangeWidgetPadding => style::change_widget_padding,
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MutationOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown mutation operation '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_operation_belongs_to_one_category() {
        let mut seen = HashSet::new();
        for category in MutationCategory::ALL {
            for op in category.operations() {
                assert!(seen.insert(*op), "{} listed twice", op);
                assert_eq!(op.category(), category);
            }
        }
        assert_eq!(seen.len(), MutationOp::ALL.len());
    }

    #[test]
    fn test_names_round_trip() {
        for op in MutationOp::ALL {
            assert_eq!(op.name().parse::<MutationOp>().unwrap(), op);
        }
        assert!("explode".parse::<MutationOp>().is_err());
    }

    #[test]
    fn test_only_chart_ops_require_chart() {
        assert!(MutationOp::MutateChartData.requires_chart());
        assert!(MutationOp::MutateChartVariant.requires_chart());
        assert!(!MutationOp::AddNode.requires_chart());
        assert!(!MutationOp::ChangeIconName.requires_chart());
    }
}
