//! Canonical serialization and content hashing
//!
//! Documents are hashed over their canonical JSON form: the document is
//! converted to a `serde_json::Value` first, whose maps are BTreeMap-backed,
//! so object keys always serialize in sorted order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Hex digest of a canonical serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical JSON text for any serializable value
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&value)?)
}

/// BLAKE3 digest of the canonical JSON form
pub fn content_hash<T: Serialize>(value: &T) -> Result<ContentHash> {
    let canonical = canonical_json(value)?;
    Ok(ContentHash(
        blake3::hash(canonical.as_bytes()).to_hex().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WidgetDocument;

    #[test]
    fn test_key_order_does_not_change_hash() {
        let a = WidgetDocument::from_json(
            r##"{"widget": {"backgroundColor": "#fff", "padding": 8,
                "root": {"type": "container", "gap": 4, "direction": "row", "children": []}}}"##,
        )
        .unwrap();
        let b = WidgetDocument::from_json(
            r##"{"widget": {"root": {"children": [], "direction": "row", "type": "container", "gap": 4},
                "padding": 8, "backgroundColor": "#fff"}}"##,
        )
        .unwrap();
        assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_any_change_changes_hash() {
        let mut doc = WidgetDocument::from_json(
            r##"{"widget": {"root": {"type": "container", "children": []}}}"##,
        )
        .unwrap();
        let before = content_hash(&doc).unwrap();
        doc.widget.padding = Some(12);
        let after = content_hash(&doc).unwrap();
        assert_ne!(before, after);
        assert_eq!(after.as_str().len(), 64);
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = serde_json::json!({"b": 1, "a": {"d": 2, "c": 3}});
        assert_eq!(canonical_json(&value).unwrap(), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }
}
