//! Mutation Engine
//!
//! Turns a small pool of hand-written widget documents into large volumes of
//! valid, distinct variants with full provenance.
//!
//! # Architecture
//!
//! - `palette`: the value catalog every mutation draws from
//! - `random`: weighted local mutations (colors, sizes, layout, content,
//!   charts, structure, style)
//! - `controlled`: whole-tree theme and size presets
//! - `dedup`: exact-content deduplication
//! - `seeds`: seed pool loading with a built-in fallback
//! - `engine`: the validate → dedupe → persist loop and run statistics
//! - `store`: batch files and the run report
//!
//! # Example
//!
//! ```
//! use mutation_engine::{EngineConfig, MemorySink, MutationEngine, Palette, SeedPool};
//! use widget_dsl::{Rulebook, RulebookValidator};
//!
//! let rulebook = Rulebook::builtin().unwrap();
//! let validator = RulebookValidator::new(rulebook.clone());
//! let seeds = SeedPool::from_documents(vec![mutation_engine::default_seed()], &validator);
//! let mut engine = MutationEngine::new(
//!     Palette::builtin().unwrap(),
//!     &rulebook,
//!     Box::new(validator),
//!     seeds,
//!     MemorySink::new(),
//!     EngineConfig { rng_seed: Some(7), ..EngineConfig::default() },
//! )
//! .unwrap();
//! let summary = engine.generate(5).unwrap();
//! assert!(summary.reached_target);
//! assert_eq!(engine.sink().records.len(), 5);
//! ```

pub mod config;
pub mod constants;
pub mod controlled;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod palette;
pub mod random;
pub mod records;
pub mod report;
pub mod sampling;
pub mod seeds;
pub mod stats;
pub mod store;

pub use config::EngineConfig;
pub use controlled::{
    ControlledMutator, ControlledOptions, ControlledOutcome, GenerationMode, IconCategory,
};
pub use dedup::Deduplicator;
pub use engine::{MutationEngine, RunSummary, VariationPlan, VaryAxis};
pub use error::{EngineError, Result};
pub use palette::{Palette, SizeVariant, ThemePreset};
pub use random::{MutationCategory, MutationContext, MutationOp, MutationOutcome, RandomMutator};
pub use records::{Change, ControlledTag, GeneratedRecord, MutationRecord};
pub use report::{CatalogInfo, RulebookInfo, RunReport, VariationAxes};
pub use seeds::{default_seed, Seed, SeedPool};
pub use stats::RunStats;
pub use store::{BatchFileStore, MemorySink, RecordSink};
