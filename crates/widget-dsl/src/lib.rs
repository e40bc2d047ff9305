//! Widget DSL
//!
//! The declarative tree format widgets are described in, and the pieces
//! every consumer of that format needs:
//!
//! - `types`: `WidgetDocument`, `Node` (container or leaf) and friends
//! - `catalog`: the fixed set of leaf components, including charts
//! - `tree`: traversal, node collection and random target selection
//! - `hash`: canonical JSON and content hashing
//! - `rulebook` / `validation`: structural limits and the `Validator` seam
//!
//! # Example
//!
//! ```
//! use widget_dsl::{content_hash, Rulebook, RulebookValidator, Validator, WidgetDocument};
//!
//! let doc = WidgetDocument::from_json(
//!     r#"{"widget": {"root": {"type": "container", "children": [
//!         {"type": "leaf", "component": "Text", "content": "Hi"}
//!     ]}}}"#,
//! ).unwrap();
//! let validator = RulebookValidator::new(Rulebook::builtin().unwrap());
//! assert!(validator.validate(&doc).unwrap().can_compile);
//! let _digest = content_hash(&doc).unwrap();
//! ```

pub mod catalog;
pub mod error;
pub mod hash;
pub mod rulebook;
pub mod tree;
pub mod types;
pub mod validation;

pub use catalog::ComponentKind;
pub use error::{DslError, Result};
pub use hash::{canonical_json, content_hash, ContentHash};
pub use rulebook::{RuleDefinition, RuleId, Rulebook, Severity};
pub use tree::NodePath;
pub use types::{Container, Dimension, Direction, Leaf, Node, Widget, WidgetDocument};
pub use validation::{
    RuleViolation, RulebookValidator, ValidationReport, Validator, ValidatorError,
};
