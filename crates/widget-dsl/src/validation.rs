//! Structural validation of widget documents
//!
//! The mutation engine only depends on the [`Validator`] trait. The
//! [`RulebookValidator`] is the built-in implementation, checking the rules
//! named in a [`Rulebook`]; other validators (for example one that compiles
//! the DSL) can be plugged in instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::ComponentKind;
use crate::rulebook::{RuleId, Rulebook, Severity};
use crate::tree::{traverse_with_limit, tree_depth, NodePath};
use crate::types::{Node, WidgetDocument};

static COLOR_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("color literal pattern is valid")
});

/// Outcome of validating one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub can_compile: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// A repaired document, when the validator is able to fix problems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<WidgetDocument>,
}

impl ValidationReport {
    pub fn accepted() -> Self {
        Self {
            can_compile: true,
            ..Default::default()
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            can_compile: false,
            errors: vec![error.into()],
            ..Default::default()
        }
    }
}

/// Error raised by a validator that could not run at all
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Validator failed: {0}")]
    Failed(String),
}

/// Anything that can judge whether a document compiles
pub trait Validator: Send + Sync {
    fn validate(&self, document: &WidgetDocument) -> Result<ValidationReport, ValidatorError>;
}

impl<F> Validator for F
where
    F: Fn(&WidgetDocument) -> Result<ValidationReport, ValidatorError> + Send + Sync,
{
    fn validate(&self, document: &WidgetDocument) -> Result<ValidationReport, ValidatorError> {
        self(document)
    }
}

/// A single rule violation with its location
#[derive(Debug, Clone, PartialEq)]
pub enum RuleViolation {
    TooDeep { depth: usize, max: usize },
    TooManyChildren { path: String, count: usize, max: usize },
    UnknownComponent { path: String, component: String },
    EmptyContainer { path: String },
    MissingTextContent { path: String },
    BadChartData { path: String, reason: String },
    BadColor { field: String, value: String },
    NonPositive { field: String },
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooDeep { depth, max } => {
                write!(f, "Tree depth {} exceeds maxDepth {}", depth, max)
            }
            Self::TooManyChildren { path, count, max } => {
                write!(f, "Container at {} has {} children (max {})", path, count, max)
            }
            Self::UnknownComponent { path, component } => {
                write!(f, "Unknown component '{}' at {}", component, path)
            }
            Self::EmptyContainer { path } => write!(f, "Container at {} has no children", path),
            Self::MissingTextContent { path } => {
                write!(f, "Text at {} has no content", path)
            }
            Self::BadChartData { path, reason } => {
                write!(f, "Chart at {} has invalid data: {}", path, reason)
            }
            Self::BadColor { field, value } => {
                write!(f, "Invalid color '{}' at {}", value, field)
            }
            Self::NonPositive { field } => write!(f, "{} must be positive", field),
        }
    }
}

/// Validator driven by a [`Rulebook`]
pub struct RulebookValidator {
    rulebook: Rulebook,
    checks: Vec<(RuleId, Severity)>,
}

impl RulebookValidator {
    /// Build a validator; rule ids without a check are logged and skipped.
    ///
    /// The depth and fan-out limits are always enforced as errors, even when
    /// the rulebook does not list their rules.
    pub fn new(rulebook: Rulebook) -> Self {
        let mut checks = Vec::new();
        for rule in &rulebook.rules {
            match rule.id.parse::<RuleId>() {
                Ok(id) => checks.push((id, rule.severity)),
                Err(_) => log::warn!("Ignoring unknown rule '{}' in rulebook", rule.id),
            }
        }
        for id in [RuleId::MaxDepth, RuleId::MaxChildren] {
            match checks.iter_mut().find(|(rule, _)| *rule == id) {
                Some((_, severity)) => *severity = Severity::Error,
                None => {
                    log::debug!("Rulebook omits '{}', enforcing it anyway", id.as_str());
                    checks.push((id, Severity::Error));
                }
            }
        }
        Self { rulebook, checks }
    }

    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    /// Run every enabled check and report all violations found
    pub fn check(&self, document: &WidgetDocument) -> ValidationReport {
        let mut report = ValidationReport::accepted();
        for &(rule, severity) in &self.checks {
            let violations = self.run_rule(rule, document);
            let target = match severity {
                Severity::Error => &mut report.errors,
                Severity::Warning => &mut report.warnings,
            };
            target.extend(violations.iter().map(|v| format!("[{}] {}", rule.as_str(), v)));
        }
        report.can_compile = report.errors.is_empty();
        report
    }

    fn run_rule(&self, rule: RuleId, document: &WidgetDocument) -> Vec<RuleViolation> {
        let mut violations = Vec::new();
        let root = document.root();
        match rule {
            RuleId::MaxDepth => {
                let depth = tree_depth(root);
                if depth > self.rulebook.max_depth {
                    violations.push(RuleViolation::TooDeep {
                        depth,
                        max: self.rulebook.max_depth,
                    });
                }
            }
            RuleId::ColorFormat => {
                if let Some(color) = &document.widget.background_color {
                    check_color("widget.backgroundColor", color, &mut violations);
                }
                walk_all(root, &mut |node, path| check_node_colors(node, path, &mut violations));
            }
            RuleId::PositiveDimensions => {
                if let Some(ratio) = document.widget.aspect_ratio {
                    if !(ratio > 0.0) {
                        violations.push(RuleViolation::NonPositive {
                            field: "widget.aspectRatio".into(),
                        });
                    }
                }
                for (field, value) in [
                    ("widget.width", &document.widget.width),
                    ("widget.height", &document.widget.height),
                ] {
                    if value.as_ref().map_or(false, |d| !d.is_positive()) {
                        violations.push(RuleViolation::NonPositive { field: field.into() });
                    }
                }
                walk_all(root, &mut |node, path| {
                    check_node_dimensions(node, path, &mut violations)
                });
            }
            _ => {
                let max_children = self.rulebook.max_children_per_container;
                walk_all(root, &mut |node, path| match (rule, node) {
                    (RuleId::MaxChildren, Node::Container(c)) => {
                        if c.children.len() > max_children {
                            violations.push(RuleViolation::TooManyChildren {
                                path: path.to_string(),
                                count: c.children.len(),
                                max: max_children,
                            });
                        }
                    }
                    (RuleId::NonEmptyContainer, Node::Container(c)) => {
                        if c.children.is_empty() {
                            violations.push(RuleViolation::EmptyContainer {
                                path: path.to_string(),
                            });
                        }
                    }
                    (RuleId::KnownComponent, Node::Leaf(leaf)) => {
                        if leaf.kind().is_none() {
                            violations.push(RuleViolation::UnknownComponent {
                                path: path.to_string(),
                                component: leaf.component.clone(),
                            });
                        }
                    }
                    (RuleId::TextContent, Node::Leaf(leaf)) => {
                        let empty = leaf.content.as_deref().map_or(true, |c| c.trim().is_empty());
                        if leaf.kind() == Some(ComponentKind::Text) && empty {
                            violations.push(RuleViolation::MissingTextContent {
                                path: path.to_string(),
                            });
                        }
                    }
                    (RuleId::ChartData, Node::Leaf(leaf)) => {
                        if let Some(kind) = leaf.kind().filter(|k| k.is_chart()) {
                            if let Err(reason) = check_chart_props(kind, &leaf.props) {
                                violations.push(RuleViolation::BadChartData {
                                    path: path.to_string(),
                                    reason,
                                });
                            }
                        }
                    }
                    _ => {}
                });
            }
        }
        violations
    }
}

impl Validator for RulebookValidator {
    fn validate(&self, document: &WidgetDocument) -> Result<ValidationReport, ValidatorError> {
        Ok(self.check(document))
    }
}

fn walk_all<'a, F>(root: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node, &NodePath),
{
    traverse_with_limit(root, usize::MAX, visit);
}

fn check_color(field: &str, value: &str, violations: &mut Vec<RuleViolation>) {
    if value != "transparent" && !COLOR_LITERAL.is_match(value) {
        violations.push(RuleViolation::BadColor {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn check_node_colors(node: &Node, path: &NodePath, violations: &mut Vec<RuleViolation>) {
    match node {
        Node::Container(c) => {
            if let Some(color) = &c.background_color {
                check_color(&path.field("backgroundColor"), color, violations);
            }
        }
        Node::Leaf(leaf) => {
            if let Some(color) = leaf.prop_str("color") {
                check_color(&path.field("props.color"), color, violations);
            }
            if let Some(Value::Array(colors)) = leaf.props.get("colors") {
                for (i, color) in colors.iter().enumerate() {
                    let field = path.field(&format!("props.colors[{}]", i));
                    match color.as_str() {
                        Some(c) => check_color(&field, c, violations),
                        None => violations.push(RuleViolation::BadColor {
                            field,
                            value: color.to_string(),
                        }),
                    }
                }
            }
        }
    }
}

fn check_node_dimensions(node: &Node, path: &NodePath, violations: &mut Vec<RuleViolation>) {
    let Node::Leaf(leaf) = node else {
        return;
    };
    for (name, value) in [("width", &leaf.width), ("height", &leaf.height)] {
        if value.as_ref().map_or(false, |d| !d.is_positive()) {
            violations.push(RuleViolation::NonPositive { field: path.field(name) });
        }
    }
    for key in ["fontSize", "size"] {
        if leaf.props.contains_key(key) && !leaf.prop_f64(key).map_or(false, |v| v > 0.0) {
            violations.push(RuleViolation::NonPositive {
                field: path.field(&format!("props.{}", key)),
            });
        }
    }
}

fn check_chart_props(
    kind: ComponentKind,
    props: &serde_json::Map<String, Value>,
) -> Result<(), String> {
    if kind.is_progress() {
        let value = props
            .get("value")
            .and_then(Value::as_f64)
            .ok_or_else(|| "missing numeric 'value'".to_string())?;
        if !(0.0..=100.0).contains(&value) {
            return Err(format!("value {} outside 0..=100", value));
        }
        return Ok(());
    }

    let data = props
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| "missing 'data' array".to_string())?;
    if data.is_empty() {
        return Err("empty 'data' array".into());
    }
    let numeric = |v: &Value| v.is_number();
    let valid = data.iter().all(|point| match point {
        Value::Array(series) => !series.is_empty() && series.iter().all(numeric),
        other => numeric(other),
    });
    if !valid {
        return Err("non-numeric data point".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Container, Direction, Leaf};
    use serde_json::{json, Map};

    fn validator() -> RulebookValidator {
        RulebookValidator::new(Rulebook::builtin().unwrap())
    }

    fn text(content: &str) -> Node {
        let mut props = Map::new();
        props.insert("fontSize".into(), json!(14));
        props.insert("color".into(), json!("#333333"));
        Node::Leaf(Leaf::new(ComponentKind::Text, props).with_content(content))
    }

    fn doc_with(children: Vec<Node>) -> WidgetDocument {
        let mut root = Container::new(Direction::Col);
        root.children = children;
        WidgetDocument::new(Node::Container(root))
    }

    #[test]
    fn test_valid_document_passes() {
        let report = validator().check(&doc_with(vec![text("Hello")]));
        assert!(report.can_compile, "errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_too_many_children() {
        let children = (0..11).map(|i| text(&format!("item {}", i))).collect();
        let report = validator().check(&doc_with(children));
        assert!(!report.can_compile);
        assert!(report.errors[0].contains("max-children"));
    }

    #[test]
    fn test_too_deep() {
        let mut node = text("deep");
        for _ in 0..10 {
            node = Node::Container(Container::new(Direction::Row).with_child(node));
        }
        let report = validator().check(&WidgetDocument::new(node));
        assert!(!report.can_compile);
        assert!(report.errors.iter().any(|e| e.contains("maxDepth")));
    }

    #[test]
    fn test_unknown_component_and_empty_container() {
        let mut leaf = Leaf::new(ComponentKind::Text, Map::new()).with_content("x");
        leaf.component = "Carousel".into();
        let empty = Node::Container(Container::new(Direction::Row));
        let report = validator().check(&doc_with(vec![Node::Leaf(leaf), empty]));
        assert!(!report.can_compile);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_chart_data_rules() {
        let mut bar = Map::new();
        bar.insert("data".into(), json!([1, "two", 3]));
        let mut ring = Map::new();
        ring.insert("value".into(), json!(140));
        let report = validator().check(&doc_with(vec![
            Node::Leaf(Leaf::new(ComponentKind::BarChart, bar)),
            Node::Leaf(Leaf::new(ComponentKind::ProgressRing, ring)),
        ]));
        assert_eq!(report.errors.len(), 2);

        let mut stacked = Map::new();
        stacked.insert("data".into(), json!([[1, 2], [3, 4]]));
        let report = validator().check(&doc_with(vec![Node::Leaf(Leaf::new(
            ComponentKind::StackedBarChart,
            stacked,
        ))]));
        assert!(report.can_compile, "errors: {:?}", report.errors);
    }

    #[test]
    fn test_bad_color_is_a_warning() {
        let mut doc = doc_with(vec![text("Hello")]);
        doc.widget.background_color = Some("blue-ish".into());
        let report = validator().check(&doc);
        assert!(report.can_compile);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("widget.backgroundColor"));
    }

    #[test]
    fn test_unknown_rules_are_ignored() {
        let rulebook = Rulebook::from_json(
            r#"{"maxDepth": 4, "maxChildrenPerContainer": 4,
                "rules": [{"id": "no-such-rule"}, {"id": "non-empty-container"}]}"#,
        )
        .unwrap();
        let validator = RulebookValidator::new(rulebook);
        let report = validator.check(&doc_with(vec![]));
        assert!(!report.can_compile);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_structural_limits_enforced_without_rules() {
        let rulebook = Rulebook::from_json(
            r#"{"maxDepth": 3, "maxChildrenPerContainer": 2,
                "rules": [{"id": "max-depth", "severity": "warning"}]}"#,
        )
        .unwrap();
        let validator = RulebookValidator::new(rulebook);

        let mut node = text("deep");
        for _ in 0..5 {
            node = Node::Container(Container::new(Direction::Row).with_child(node));
        }
        let report = validator.check(&WidgetDocument::new(node));
        assert!(!report.can_compile);
        assert!(report.errors.iter().any(|e| e.contains("maxDepth")));

        let wide = doc_with(vec![text("a"), text("b"), text("c")]);
        let report = validator.check(&wide);
        assert!(!report.can_compile);
        assert!(report.errors.iter().any(|e| e.contains("max-children")));
    }

    #[test]
    fn test_color_literals() {
        let mut violations = Vec::new();
        for color in ["#fff", "#0f172a", "#0f172a80", "transparent"] {
            check_color("c", color, &mut violations);
        }
        assert!(violations.is_empty());
        check_color("c", "#12345", &mut violations);
        check_color("c", "red", &mut violations);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_closure_validator() {
        let reject_all = |_: &WidgetDocument| -> Result<ValidationReport, ValidatorError> {
            Ok(ValidationReport::rejected("nope"))
        };
        let report = reject_all.validate(&doc_with(vec![text("x")])).unwrap();
        assert!(!report.can_compile);
    }
}
