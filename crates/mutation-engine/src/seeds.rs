//! Seed pool loading
//!
//! Seeds are individual JSON documents in a directory. A file that cannot be
//! read, parsed, or validated is skipped with a warning. If nothing loads,
//! the pool falls back to a single built-in seed so generation can proceed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Map;
use widget_dsl::{
    content_hash, ComponentKind, Container, ContentHash, Direction, Leaf, Node, Validator,
    WidgetDocument,
};

/// A validated seed document
#[derive(Debug, Clone)]
pub struct Seed {
    pub document: WidgetDocument,
    pub hash: ContentHash,
    /// File the seed came from; `None` for the built-in fallback
    pub source: Option<PathBuf>,
}

/// Validated, de-duplicated seeds
#[derive(Debug, Clone)]
pub struct SeedPool {
    seeds: Vec<Seed>,
}

impl SeedPool {
    /// Load every `*.json` file in `dir`, in file name order
    pub fn load_dir(dir: impl AsRef<Path>, validator: &dyn Validator) -> Self {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().map_or(false, |e| e == "json"))
                .collect(),
            Err(e) => {
                log::warn!("Cannot read seed directory {:?}: {}", dir, e);
                Vec::new()
            }
        };
        files.sort();

        let documents = files.into_iter().filter_map(|path| {
            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| WidgetDocument::from_json(&json).map_err(|e| e.to_string()));
            match parsed {
                Ok(document) => Some((document, Some(path))),
                Err(e) => {
                    log::warn!("Skipping seed {:?}: {}", path, e);
                    None
                }
            }
        });
        Self::build(documents, validator)
    }

    /// Build a pool from in-memory documents
    pub fn from_documents(
        documents: impl IntoIterator<Item = WidgetDocument>,
        validator: &dyn Validator,
    ) -> Self {
        Self::build(documents.into_iter().map(|d| (d, None)), validator)
    }

    fn build(
        documents: impl Iterator<Item = (WidgetDocument, Option<PathBuf>)>,
        validator: &dyn Validator,
    ) -> Self {
        let mut seeds = Vec::new();
        let mut seen = HashSet::new();

        for (document, source) in documents {
            let label = source
                .as_ref()
                .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string());
            match validator.validate(&document) {
                Ok(report) if report.can_compile => {}
                Ok(report) => {
                    log::warn!("Skipping seed {}: {}", label, report.errors.join("; "));
                    continue;
                }
                Err(e) => {
                    log::warn!("Skipping seed {}: {}", label, e);
                    continue;
                }
            }
            let hash = match content_hash(&document) {
                Ok(hash) => hash,
                Err(e) => {
                    log::warn!("Skipping seed {}: {}", label, e);
                    continue;
                }
            };
            if !seen.insert(hash.clone()) {
                log::warn!("Skipping seed {}: identical to an earlier seed", label);
                continue;
            }
            seeds.push(Seed {
                document,
                hash,
                source,
            });
        }

        if seeds.is_empty() {
            log::warn!("No seeds loaded, using the built-in default seed");
            let document = default_seed();
            if let Ok(hash) = content_hash(&document) {
                seeds.push(Seed {
                    document,
                    hash,
                    source: None,
                });
            }
        }
        log::info!("Seed pool ready with {} seed(s)", seeds.len());
        Self { seeds }
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn get(&self, index: usize) -> Option<&Seed> {
        self.seeds.get(index)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

/// Minimal seed: a white widget with one column holding a text label
pub fn default_seed() -> WidgetDocument {
    let mut props = Map::new();
    props.insert("fontSize".into(), 16.into());
    props.insert("color".into(), "#333333".into());
    let text = Leaf::new(ComponentKind::Text, props).with_content("Sample Widget");

    let mut root = Container::new(Direction::Col);
    root.gap = Some(8);
    let mut document = WidgetDocument::new(Node::Container(root.with_child(Node::Leaf(text))));
    document.widget.background_color = Some("#ffffff".into());
    document
}
