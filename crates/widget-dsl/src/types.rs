//! Core types for widget documents
//!
//! A widget is a tree of layout containers and component leaves. Only the
//! fields the mutation engine reads or writes are modeled explicitly; any
//! other field is carried through untouched in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::ComponentKind;
use crate::error::{DslError, Result};

/// A complete widget document, the unit that is mutated and persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDocument {
    pub widget: Widget,
}

impl WidgetDocument {
    /// Wrap a root node with no widget-level styling
    pub fn new(root: Node) -> Self {
        Self {
            widget: Widget {
                background_color: None,
                border_radius: None,
                padding: None,
                aspect_ratio: None,
                width: None,
                height: None,
                root,
                extra: Map::new(),
            },
        }
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DslError::parse("widget document", e))
    }

    /// The root node of the tree
    pub fn root(&self) -> &Node {
        &self.widget.root
    }

    /// The root node of the tree (mutable)
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.widget.root
    }
}

/// Widget-level properties plus the single root node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    pub root: Node,
    /// Fields not modeled by the engine
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A width or height: whole pixels, a fractional number, or a keyword such
/// as `"auto"` or `"100%"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Number(f64),
    Keyword(String),
}

impl Dimension {
    /// Whole-pixel value, if this is one
    pub fn pixels(&self) -> Option<u32> {
        match self {
            Dimension::Pixels(px) => Some(*px),
            _ => None,
        }
    }

    /// Keywords count as positive; numbers must be above zero
    pub fn is_positive(&self) -> bool {
        match self {
            Dimension::Pixels(px) => *px > 0,
            Dimension::Number(n) => *n > 0.0,
            Dimension::Keyword(k) => !k.trim().is_empty(),
        }
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Dimension::Pixels(px)
    }
}

impl From<Dimension> for Value {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Pixels(px) => Value::from(px),
            Dimension::Number(n) => Value::from(n),
            Dimension::Keyword(k) => Value::from(k),
        }
    }
}

/// Main-axis direction of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Row,
    Col,
}

impl Direction {
    /// The other direction
    pub fn flipped(self) -> Self {
        match self {
            Direction::Row => Direction::Col,
            Direction::Col => Direction::Row,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Row => "row",
            Direction::Col => "col",
        }
    }
}

/// A node in the widget tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Layout node holding an ordered list of children
    Container(Container),
    /// Component node
    Leaf(Leaf),
}

impl Node {
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Node::Container(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Node::Container(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Container(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Container(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Whether this node is a leaf of the given component
    pub fn is_component(&self, kind: ComponentKind) -> bool {
        self.as_leaf().map_or(false, |l| l.kind() == Some(kind))
    }

    /// Whether this node is a chart leaf
    pub fn is_chart(&self) -> bool {
        self.as_leaf()
            .and_then(|l| l.kind())
            .map_or(false, |k| k.is_chart())
    }

    /// Flex factor, for either variant
    pub fn flex(&self) -> Option<u32> {
        match self {
            Node::Container(c) => c.flex,
            Node::Leaf(l) => l.flex,
        }
    }

    pub fn set_flex(&mut self, flex: Option<u32>) {
        match self {
            Node::Container(c) => c.flex = flex,
            Node::Leaf(l) => l.flex = flex,
        }
    }

    /// Short human-readable label used in provenance summaries
    pub fn label(&self) -> String {
        match self {
            Node::Container(c) => format!(
                "container({}, {} children)",
                c.direction.unwrap_or(Direction::Col).as_str(),
                c.children.len()
            ),
            Node::Leaf(l) => l.component.clone(),
        }
    }
}

/// Layout node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_cross: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    /// Children in visual order
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container {
    /// Create an empty container laid out in the given direction
    pub fn new(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            gap: None,
            padding: None,
            align_main: None,
            align_cross: None,
            background_color: None,
            flex: None,
            children: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// Component node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub component: String,
    /// Component-specific properties; the shape depends on `component`
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Leaf {
    /// Create a leaf for a catalog component with the given props
    pub fn new(kind: ComponentKind, props: Map<String, Value>) -> Self {
        Self {
            component: kind.name().to_string(),
            props,
            content: None,
            flex: None,
            width: None,
            height: None,
            extra: Map::new(),
        }
    }

    /// Builder-style content setter
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Catalog member for this leaf, if the name is known
    pub fn kind(&self) -> Option<ComponentKind> {
        ComponentKind::from_name(&self.component)
    }

    /// Numeric prop, accepting numbers and numeric strings
    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        match self.props.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String prop
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// `fontSize` prop
    pub fn font_size(&self) -> Option<f64> {
        self.prop_f64("fontSize")
    }

    /// `fontWeight` prop, with CSS keywords mapped to their numeric weight
    pub fn font_weight(&self) -> Option<u32> {
        match self.props.get("fontWeight")? {
            Value::Number(n) => n.as_f64().map(|w| w.round() as u32),
            Value::String(s) => match s.trim() {
                "normal" => Some(400),
                "medium" => Some(500),
                "semibold" => Some(600),
                "bold" => Some(700),
                other => other.parse().ok(),
            },
            _ => None,
        }
    }

    /// Icon `size` prop
    pub fn icon_size(&self) -> Option<f64> {
        self.prop_f64("size")
    }

    /// Icon `name` prop
    pub fn icon_name(&self) -> Option<&str> {
        self.prop_str("name")
    }

    /// Set a prop, returning the previous value (or null)
    pub fn set_prop(&mut self, key: &str, value: Value) -> Value {
        self.props
            .insert(key.to_string(), value)
            .unwrap_or(Value::Null)
    }
}
