//! Exact-content deduplication

use std::collections::HashSet;

use widget_dsl::{content_hash, ContentHash, WidgetDocument};

use crate::error::Result;

/// Set of content hashes seen during a run
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<ContentHash>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content hash of a document's canonical serialization
    pub fn hash(document: &WidgetDocument) -> Result<ContentHash> {
        Ok(content_hash(document)?)
    }

    pub fn is_duplicate(&self, hash: &ContentHash) -> bool {
        self.seen.contains(hash)
    }

    /// Record a hash; returns `false` if it was already present
    pub fn insert(&mut self, hash: ContentHash) -> bool {
        self.seen.insert(hash)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
