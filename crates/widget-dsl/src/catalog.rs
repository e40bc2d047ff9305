//! Component catalog
//!
//! The fixed set of leaf component names a widget may use. Chart components
//! are tracked separately because several mutations only apply to them.

use std::fmt;
use std::str::FromStr;

/// A known leaf component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Text,
    Icon,
    Image,
    Button,
    Badge,
    Avatar,
    Divider,
    Checkbox,
    Switch,
    Slider,
    Input,
    Spacer,
    BarChart,
    LineChart,
    PieChart,
    RadarChart,
    StackedBarChart,
    Sparkline,
    ProgressBar,
    ProgressRing,
}

impl ComponentKind {
    /// Every catalog member, basic components first
    pub const ALL: [ComponentKind; 20] = [
        ComponentKind::Text,
        ComponentKind::Icon,
        ComponentKind::Image,
        ComponentKind::Button,
        ComponentKind::Badge,
        ComponentKind::Avatar,
        ComponentKind::Divider,
        ComponentKind::Checkbox,
        ComponentKind::Switch,
        ComponentKind::Slider,
        ComponentKind::Input,
        ComponentKind::Spacer,
        ComponentKind::BarChart,
        ComponentKind::LineChart,
        ComponentKind::PieChart,
        ComponentKind::RadarChart,
        ComponentKind::StackedBarChart,
        ComponentKind::Sparkline,
        ComponentKind::ProgressBar,
        ComponentKind::ProgressRing,
    ];

    /// Chart-type components
    pub const CHARTS: [ComponentKind; 8] = [
        ComponentKind::BarChart,
        ComponentKind::LineChart,
        ComponentKind::PieChart,
        ComponentKind::RadarChart,
        ComponentKind::StackedBarChart,
        ComponentKind::Sparkline,
        ComponentKind::ProgressBar,
        ComponentKind::ProgressRing,
    ];

    /// The name used in the DSL `component` field
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Icon => "Icon",
            Self::Image => "Image",
            Self::Button => "Button",
            Self::Badge => "Badge",
            Self::Avatar => "Avatar",
            Self::Divider => "Divider",
            Self::Checkbox => "Checkbox",
            Self::Switch => "Switch",
            Self::Slider => "Slider",
            Self::Input => "Input",
            Self::Spacer => "Spacer",
            Self::BarChart => "BarChart",
            Self::LineChart => "LineChart",
            Self::PieChart => "PieChart",
            Self::RadarChart => "RadarChart",
            Self::StackedBarChart => "StackedBarChart",
            Self::Sparkline => "Sparkline",
            Self::ProgressBar => "ProgressBar",
            Self::ProgressRing => "ProgressRing",
        }
    }

    /// Look up a catalog member by its DSL name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether this is one of the chart components
    pub fn is_chart(&self) -> bool {
        Self::CHARTS.contains(self)
    }

    /// Progress charts carry a single `value` instead of a `data` series
    pub fn is_progress(&self) -> bool {
        matches!(self, Self::ProgressBar | Self::ProgressRing)
    }

    /// Charts that render one label per data point
    pub fn has_labels(&self) -> bool {
        matches!(
            self,
            Self::BarChart | Self::LineChart | Self::PieChart | Self::RadarChart | Self::StackedBarChart
        )
    }

    /// Charts that carry a `colors` array rather than a single `color`
    pub fn has_color_series(&self) -> bool {
        matches!(
            self,
            Self::BarChart | Self::PieChart | Self::RadarChart | Self::StackedBarChart
        )
    }

    /// Charts that can be laid out horizontally or vertically
    pub fn has_orientation(&self) -> bool {
        matches!(self, Self::BarChart | Self::StackedBarChart)
    }

    /// Leaves whose visible text lives in `content`
    pub fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Button | Self::Badge)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown component '{}'", s))
    }
}
