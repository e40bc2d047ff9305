//! Error types for the mutation engine

use thiserror::Error;
use widget_dsl::DslError;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort engine setup or a generation run
///
/// Rejected or duplicate mutants are not errors; they are counted in the
/// run statistics instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Palette or rulebook could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// A theme or size variant name that the palette does not define
    #[error("Unknown {kind} preset '{name}'")]
    UnknownPreset { kind: &'static str, name: String },

    /// Generation was asked for zero documents
    #[error("Target count must be a positive integer")]
    EmptyTarget,

    /// Error from the DSL layer (hashing, parsing)
    #[error("DSL error: {0}")]
    Dsl(#[from] DslError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
