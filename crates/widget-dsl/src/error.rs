//! Error types for the widget DSL

use thiserror::Error;

/// Result type alias using DslError
pub type Result<T> = std::result::Result<T, DslError>;

/// Errors raised while loading, serializing or hashing DSL documents
#[derive(Debug, Error)]
pub enum DslError {
    /// Document or rulebook JSON could not be parsed
    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rulebook limits are unusable
    #[error("Invalid rulebook: {0}")]
    InvalidRulebook(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DslError {
    /// Create a parse error tagged with what was being parsed
    pub fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            what: what.into(),
            source,
        }
    }
}
