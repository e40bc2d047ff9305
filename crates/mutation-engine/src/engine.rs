//! Generation orchestrator
//!
//! [`MutationEngine`] owns everything one run needs: the seed pool, the
//! mutators, the validator, the dedup set, counters and the record sink.
//! Every candidate goes through the same path: validate, dedupe, persist.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;
use widget_dsl::{Rulebook, Validator, WidgetDocument};

use crate::config::EngineConfig;
use crate::controlled::{ControlledMutator, ControlledOptions, GenerationMode};
use crate::dedup::Deduplicator;
use crate::error::{EngineError, Result};
use crate::palette::Palette;
use crate::random::RandomMutator;
use crate::records::{ControlledTag, GeneratedRecord, MutationRecord};
use crate::report::{CatalogInfo, RulebookInfo, RunReport, VariationAxes};
use crate::seeds::{Seed, SeedPool};
use crate::stats::RunStats;
use crate::store::RecordSink;

/// Which preset axes a controlled run varies over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaryAxis {
    Themes,
    Sizes,
    All,
}

impl FromStr for VaryAxis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "themes" => Ok(VaryAxis::Themes),
            "sizes" => Ok(VaryAxis::Sizes),
            "all" => Ok(VaryAxis::All),
            other => Err(format!(
                "unknown variation '{}' (expected themes, sizes or all)",
                other
            )),
        }
    }
}

impl fmt::Display for VaryAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VaryAxis::Themes => "themes",
            VaryAxis::Sizes => "sizes",
            VaryAxis::All => "all",
        })
    }
}

/// Cross product of presets applied to every seed in a controlled run.
///
/// A `None` entry means "leave this axis alone"; an empty list is treated
/// the same as `[None]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPlan {
    pub themes: Vec<Option<String>>,
    pub sizes: Vec<Option<String>>,
    pub mode: GenerationMode,
}

impl VariationPlan {
    pub fn new(themes: Vec<Option<String>>, sizes: Vec<Option<String>>, mode: GenerationMode) -> Self {
        Self { themes, sizes, mode }
    }

    /// Every preset the palette defines along the chosen axes
    pub fn for_axis(axis: VaryAxis, palette: &Palette, mode: GenerationMode) -> Self {
        let themes: Vec<Option<String>> = palette.themes.keys().cloned().map(Some).collect();
        let sizes: Vec<Option<String>> = palette.size_variants.keys().cloned().map(Some).collect();
        match axis {
            VaryAxis::Themes => Self::new(themes, vec![None], mode),
            VaryAxis::Sizes => Self::new(vec![None], sizes, mode),
            VaryAxis::All => Self::new(themes, sizes, mode),
        }
    }

    fn axis(values: &[Option<String>]) -> Vec<Option<String>> {
        if values.is_empty() {
            vec![None]
        } else {
            values.to_vec()
        }
    }

    /// Attempts made per seed
    pub fn combinations(&self) -> usize {
        Self::axis(&self.themes).len() * Self::axis(&self.sizes).len()
    }

    fn axes(&self) -> VariationAxes {
        VariationAxes {
            themes: Self::axis(&self.themes),
            sizes: Self::axis(&self.sizes),
        }
    }
}

/// Outcome of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// `random` for uncontrolled runs, otherwise the controlled mode
    pub mode: String,
    pub target_count: u64,
    pub attempts: u64,
    pub persisted: u64,
    /// False when an uncontrolled run stopped at its attempt ceiling
    pub reached_target: bool,
    pub elapsed_seconds: f64,
    pub variation: Option<VariationAxes>,
}

/// What happened to one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Persisted,
    Invalid,
    Duplicate,
}

/// The generation engine
pub struct MutationEngine<S: RecordSink> {
    palette: Arc<Palette>,
    rulebook: RulebookInfo,
    validator: Box<dyn Validator>,
    random: RandomMutator,
    controlled: ControlledMutator,
    seeds: SeedPool,
    dedup: Deduplicator,
    stats: RunStats,
    sink: S,
    config: EngineConfig,
    rng: StdRng,
    run_id: String,
    next_id: u64,
    started: Instant,
    last_run: Option<RunSummary>,
}

impl<S: RecordSink> MutationEngine<S> {
    /// Create an engine. Every seed hash is registered as already seen, so a
    /// mutant identical to a seed is never persisted.
    pub fn new(
        palette: Palette,
        rulebook: &Rulebook,
        validator: Box<dyn Validator>,
        seeds: SeedPool,
        sink: S,
        config: EngineConfig,
    ) -> Result<Self> {
        let palette = Arc::new(palette);
        let random = RandomMutator::new(Arc::clone(&palette), rulebook)?;
        let controlled = ControlledMutator::new(Arc::clone(&palette));

        let mut dedup = Deduplicator::new();
        for seed in seeds.seeds() {
            dedup.insert(seed.hash.clone());
        }

        let (mut rng, seeded) = match config.rng_seed {
            Some(seed) => (StdRng::seed_from_u64(seed), true),
            None => (StdRng::from_entropy(), false),
        };
        let run_id = new_run_id(seeded.then_some(&mut rng));
        log::info!(
            "Mutation engine ready: run {}, {} seed(s), {} themes, {} size variants",
            run_id,
            seeds.len(),
            palette.themes.len(),
            palette.size_variants.len()
        );

        Ok(Self {
            palette,
            rulebook: RulebookInfo::from(rulebook),
            validator,
            random,
            controlled,
            seeds,
            dedup,
            stats: RunStats::default(),
            sink,
            config,
            rng,
            run_id,
            next_id: 0,
            started: Instant::now(),
            last_run: None,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn seeds(&self) -> &SeedPool {
        &self.seeds
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Generate `target` unique, valid mutants with the random mutator.
    ///
    /// Stops early, with `reached_target = false`, once the configured
    /// attempt ceiling is spent.
    pub fn generate(&mut self, target: u64) -> Result<RunSummary> {
        if target == 0 {
            return Err(EngineError::EmptyTarget);
        }
        let ceiling = self.config.attempt_ceiling(target);
        let started = Instant::now();
        let mut attempts = 0;
        let mut persisted = 0;

        log::info!("Generating {} random mutants (run {})", target, self.run_id);
        while persisted < target {
            if ceiling.map_or(false, |max| attempts >= max) {
                log::warn!(
                    "Attempt ceiling reached after {} attempts with {}/{} documents",
                    attempts,
                    persisted,
                    target
                );
                break;
            }
            let Some(seed) = self.pick_seed() else {
                break;
            };
            attempts += 1;

            let outcome = self.random.mutate(&seed.document, &mut self.rng);
            if self.consider(&seed, outcome.document, outcome.mutations, None)? == Attempt::Persisted {
                persisted += 1;
                self.log_progress(persisted, target, started);
            }
        }

        let summary = RunSummary {
            mode: "random".to_string(),
            target_count: target,
            attempts,
            persisted,
            reached_target: persisted == target,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            variation: None,
        };
        self.finish(summary)
    }

    /// Apply every theme × size combination of `plan` to `target` seeds,
    /// taken round-robin from the pool
    pub fn generate_controlled(&mut self, target: u64, plan: &VariationPlan) -> Result<RunSummary> {
        if target == 0 {
            return Err(EngineError::EmptyTarget);
        }
        let axes = plan.axes();
        for theme in axes.themes.iter().flatten() {
            self.palette.theme(theme)?;
        }
        for size in axes.sizes.iter().flatten() {
            self.palette.size_variant(size)?;
        }

        let started = Instant::now();
        let mut attempts = 0;
        let mut persisted = 0;
        log::info!(
            "Generating controlled variants: {} seeds x {} combinations, mode {} (run {})",
            target,
            plan.combinations(),
            plan.mode,
            self.run_id
        );

        for index in 0..target {
            let Some(seed) = self.seed_at(index) else {
                break;
            };
            for theme in &axes.themes {
                for size in &axes.sizes {
                    attempts += 1;
                    let options = ControlledOptions {
                        theme: theme.clone(),
                        size: size.clone(),
                        mode: plan.mode,
                    };
                    let outcome = self.controlled.apply(&seed.document, &options, &mut self.rng)?;
                    let (document, mutations) = if outcome.requires_random_pass {
                        let pass = self.random.mutate_from_step(
                            &outcome.document,
                            outcome.mutations.len(),
                            &mut self.rng,
                        );
                        let mut mutations = outcome.mutations;
                        mutations.extend(pass.mutations);
                        (pass.document, mutations)
                    } else {
                        (outcome.document, outcome.mutations)
                    };

                    let tag = ControlledTag {
                        theme: theme.clone(),
                        size: size.clone(),
                        mode: plan.mode,
                    };
                    if self.consider(&seed, document, mutations, Some(tag))? == Attempt::Persisted {
                        persisted += 1;
                        self.log_progress(persisted, target * plan.combinations() as u64, started);
                    }
                }
            }
        }

        let summary = RunSummary {
            mode: plan.mode.to_string(),
            target_count: target,
            attempts,
            persisted,
            reached_target: true,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            variation: Some(axes),
        };
        self.finish(summary)
    }

    /// Build the run report and hand it to the sink
    pub fn report(&mut self) -> Result<RunReport> {
        let last = self.last_run.as_ref();
        let report = RunReport {
            run_id: self.run_id.clone(),
            mode: last.map_or_else(|| "random".to_string(), |r| r.mode.clone()),
            target_count: last.map_or(0, |r| r.target_count),
            reached_target: last.map_or(true, |r| r.reached_target),
            elapsed_seconds: self.started.elapsed().as_secs_f64(),
            generated_at: Utc::now(),
            stats: self.stats.clone(),
            catalog: CatalogInfo::from_palette(&self.palette),
            rulebook: self.rulebook.clone(),
            variation: last.and_then(|r| r.variation.clone()),
        };
        self.sink.write_report(&report)?;
        Ok(report)
    }

    fn pick_seed(&mut self) -> Option<Seed> {
        let index = self.rng.gen_range(0..self.seeds.len().max(1));
        self.seed_at(index as u64)
    }

    fn seed_at(&self, index: u64) -> Option<Seed> {
        let len = self.seeds.len() as u64;
        if len == 0 {
            return None;
        }
        self.seeds.get((index % len) as usize).cloned()
    }

    /// Validate, dedupe and persist one candidate
    fn consider(
        &mut self,
        seed: &Seed,
        document: WidgetDocument,
        mutations: Vec<MutationRecord>,
        controlled: Option<ControlledTag>,
    ) -> Result<Attempt> {
        self.stats.record_attempt();

        let (document, repaired) = match self.validator.validate(&document) {
            Ok(report) if report.can_compile => match report.fixed {
                Some(fixed) if fixed != document => {
                    if !self.accepts_repair(&fixed) {
                        self.stats.record_invalid();
                        return Ok(Attempt::Invalid);
                    }
                    (fixed, true)
                }
                _ => (document, false),
            },
            Ok(report) => {
                log::debug!("Rejected mutant: {}", report.errors.join("; "));
                self.stats.record_invalid();
                return Ok(Attempt::Invalid);
            }
            Err(e) => {
                log::debug!("Validator error, counting as invalid: {}", e);
                self.stats.record_invalid();
                return Ok(Attempt::Invalid);
            }
        };

        let hash = Deduplicator::hash(&document)?;
        if !self.dedup.insert(hash.clone()) {
            log::debug!("Duplicate mutant {}", hash);
            self.stats.record_duplicate();
            return Ok(Attempt::Duplicate);
        }

        self.next_id += 1;
        let record = GeneratedRecord {
            id: self.next_id,
            run_id: self.run_id.clone(),
            seed_hash: seed.hash.clone(),
            seed_dsl: seed.document.clone(),
            mutations,
            result_dsl: document,
            hash,
            generated_at: Utc::now(),
            controlled,
            repaired,
        };
        self.sink.append(&record)?;
        self.stats.record_valid(&record.mutations);
        Ok(Attempt::Persisted)
    }

    /// A repaired document gets one more validation pass; its own repair,
    /// if any, is not followed
    fn accepts_repair(&self, fixed: &WidgetDocument) -> bool {
        match self.validator.validate(fixed) {
            Ok(report) if report.can_compile => true,
            Ok(report) => {
                log::debug!("Rejected repaired mutant: {}", report.errors.join("; "));
                false
            }
            Err(e) => {
                log::debug!("Validator error on repaired mutant: {}", e);
                false
            }
        }
    }

    fn log_progress(&self, persisted: u64, target: u64, started: Instant) {
        let interval = self.config.progress_interval.max(1);
        if persisted % interval != 0 {
            return;
        }
        let elapsed = started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            persisted as f64 / elapsed
        } else {
            0.0
        };
        log::info!(
            "Progress: {}/{} valid ({} attempted, {:.1}s elapsed, {:.1} items/s)",
            persisted,
            target,
            self.stats.attempted,
            elapsed,
            rate
        );
    }

    fn finish(&mut self, summary: RunSummary) -> Result<RunSummary> {
        log::info!(
            "Run {} finished: {} persisted from {} attempts ({} invalid, {} duplicates) in {:.1}s",
            self.run_id,
            summary.persisted,
            summary.attempts,
            self.stats.invalid,
            self.stats.duplicates,
            summary.elapsed_seconds
        );
        self.last_run = Some(summary.clone());
        Ok(summary)
    }
}

/// Timestamp plus a short suffix, e.g. `20260101_120000_a1b2c3`.
///
/// A seeded RNG fixes the suffix, so reruns with the same seed differ only
/// in the wall-clock timestamp.
fn new_run_id(rng: Option<&mut StdRng>) -> String {
    let suffix = match rng {
        Some(rng) => format!("{:06x}", rng.gen::<u32>() & 0x00ff_ffff),
        None => Uuid::new_v4().simple().to_string()[..6].to_string(),
    };
    format!("{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::test_support::{doc, RICH_SEED, SIMPLE_SEED};
    use crate::seeds::default_seed;
    use crate::store::{BatchFileStore, MemorySink};
    use std::collections::HashSet;
    use tempfile::TempDir;
    use widget_dsl::tree::{max_fanout, tree_depth};
    use widget_dsl::{RulebookValidator, ValidationReport, ValidatorError};

    fn accept_all() -> Box<dyn Validator> {
        Box::new(|_: &WidgetDocument| -> std::result::Result<ValidationReport, ValidatorError> {
            Ok(ValidationReport::accepted())
        })
    }

    fn config(seed: u64) -> EngineConfig {
        EngineConfig {
            rng_seed: Some(seed),
            ..EngineConfig::default()
        }
    }

    fn engine_with(
        seeds: Vec<WidgetDocument>,
        validator: Box<dyn Validator>,
        config: EngineConfig,
    ) -> MutationEngine<MemorySink> {
        engine_with_palette(Palette::builtin().unwrap(), seeds, validator, config)
    }

    fn engine_with_palette(
        palette: Palette,
        seeds: Vec<WidgetDocument>,
        validator: Box<dyn Validator>,
        config: EngineConfig,
    ) -> MutationEngine<MemorySink> {
        let rulebook = Rulebook::builtin().unwrap();
        let pool = SeedPool::from_documents(seeds, &RulebookValidator::new(rulebook.clone()));
        MutationEngine::new(
            palette,
            &rulebook,
            validator,
            pool,
            MemorySink::new(),
            config,
        )
        .unwrap()
    }

    fn rulebook_validator() -> Box<dyn Validator> {
        Box::new(RulebookValidator::new(Rulebook::builtin().unwrap()))
    }

    /// Value at a display path such as `root.children[0].props.color` or
    /// `widget.backgroundColor`; absent fields read as null
    fn value_at(document: &WidgetDocument, path: &str) -> serde_json::Value {
        let mut pointer = String::from("/widget");
        for segment in path.split('.').filter(|s| *s != "widget") {
            match segment.strip_suffix(']').and_then(|s| s.split_once('[')) {
                Some((name, index)) => pointer.push_str(&format!("/{}/{}", name, index)),
                None => pointer.push_str(&format!("/{}", segment)),
            }
        }
        serde_json::to_value(document)
            .unwrap()
            .pointer(&pointer)
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn test_single_mutant_from_minimal_seed() {
        // Structural edits shift node paths, so only field edits are drawn here
        let mut palette = Palette::builtin().unwrap();
        palette
            .category_weights
            .insert(crate::random::MutationCategory::Structure, 0.0);

        for seed in 1..=5 {
            let mut engine =
                engine_with_palette(palette.clone(), vec![doc(SIMPLE_SEED)], accept_all(), config(seed));
            let summary = engine.generate(1).unwrap();
            assert!(summary.reached_target);

            let records = &engine.sink().records;
            assert_eq!(records.len(), 1);
            let record = &records[0];
            assert_eq!(record.id, 1);
            assert_eq!(record.seed_dsl, default_seed());
            assert_ne!(record.result_dsl, record.seed_dsl);
            assert_ne!(record.hash, record.seed_hash);
            assert!((1..=6).contains(&record.mutations.len()));
            assert!(record.controlled.is_none());
            assert!(!record.repaired);

            // Each recorded field starts from the seed's value, chains through
            // later edits of the same field and ends at the result's value
            let mutations = &record.mutations;
            for (i, mutation) in mutations.iter().enumerate() {
                let path = mutation.target_path.as_str();
                assert_ne!(mutation.before, mutation.after, "{}", mutation.change_summary);
                match mutations[..i].iter().rev().find(|m| m.target_path == path) {
                    Some(previous) => assert_eq!(mutation.before, previous.after, "{}", path),
                    None => assert_eq!(value_at(&record.seed_dsl, path), mutation.before, "{}", path),
                }
                if !mutations[i + 1..].iter().any(|m| m.target_path == path) {
                    assert_eq!(value_at(&record.result_dsl, path), mutation.after, "{}", path);
                }
            }
        }
    }

    #[test]
    fn test_controlled_cross_product() {
        let mut engine = engine_with(
            vec![doc(SIMPLE_SEED), doc(RICH_SEED)],
            accept_all(),
            config(2),
        );
        let plan = VariationPlan::new(
            vec![Some("dark".into()), Some("light".into())],
            vec![None],
            GenerationMode::Controlled,
        );
        let summary = engine.generate_controlled(2, &plan).unwrap();
        assert_eq!(summary.attempts, 4);
        assert_eq!(engine.stats().attempted, 4);

        let records = &engine.sink().records;
        assert_eq!(records.len(), 4);
        for record in records {
            let tag = record.controlled.as_ref().unwrap();
            assert!(tag.theme.is_some());
            assert_eq!(tag.size, None);
            assert_eq!(tag.mode, GenerationMode::Controlled);
            assert!(record.mutations.iter().all(|m| m.category == "theme"));
        }
        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(value["controlled"]["size"], serde_json::Value::Null);
    }

    #[test]
    fn test_hybrid_numbers_random_steps_after_presets() {
        let mut engine = engine_with(vec![doc(RICH_SEED)], accept_all(), config(3));
        let plan = VariationPlan::new(
            vec![Some("forest".into())],
            vec![Some("regular".into())],
            GenerationMode::Hybrid,
        );
        engine.generate_controlled(5, &plan).unwrap();
        for record in &engine.sink().records {
            let steps: Vec<usize> = record.mutations.iter().map(|m| m.step).collect();
            let expected: Vec<usize> = (1..=record.mutations.len()).collect();
            assert_eq!(steps, expected);
            assert_eq!(record.mutations[0].operation, "applyTheme");
            assert_eq!(record.mutations[1].operation, "applySize");
        }
    }

    #[test]
    fn test_generated_records_are_unique_and_valid() {
        let mut engine = engine_with(
            vec![doc(SIMPLE_SEED), doc(RICH_SEED)],
            rulebook_validator(),
            config(4),
        );
        let summary = engine.generate(60).unwrap();
        assert!(summary.reached_target);

        let rulebook = Rulebook::builtin().unwrap();
        let checker = RulebookValidator::new(rulebook.clone());
        let records = &engine.sink().records;
        let mut hashes = HashSet::new();
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i as u64 + 1);
            assert!(hashes.insert(record.hash.clone()));
            assert_eq!(Deduplicator::hash(&record.result_dsl).unwrap(), record.hash);
            assert!(checker.check(&record.result_dsl).can_compile);
            assert!(tree_depth(record.result_dsl.root()) <= rulebook.max_depth);
            assert!(
                max_fanout(record.result_dsl.root()) <= rulebook.max_children_per_container
            );
        }
        assert_eq!(records.len(), 60);
        let stats = engine.stats();
        assert_eq!(stats.attempted, stats.valid + stats.invalid + stats.duplicates);
        let categorized: u64 = stats.by_category.values().sum();
        let recorded: usize = records.iter().map(|r| r.mutations.len()).sum();
        assert_eq!(categorized, recorded as u64);
    }

    #[test]
    fn test_attempt_ceiling_stops_hopeless_run() {
        let reject_all: Box<dyn Validator> = Box::new(
            |_: &WidgetDocument| -> std::result::Result<ValidationReport, ValidatorError> {
                Ok(ValidationReport::rejected("nope"))
            },
        );
        let mut engine = engine_with(
            vec![doc(SIMPLE_SEED)],
            reject_all,
            EngineConfig {
                max_attempts_per_item: 3,
                ..config(5)
            },
        );
        let summary = engine.generate(2).unwrap();
        assert!(!summary.reached_target);
        assert_eq!(summary.attempts, 6);
        assert_eq!(engine.stats().invalid, 6);
        assert!(engine.sink().records.is_empty());

        let report = engine.report().unwrap();
        assert!(!report.reached_target);
        assert!(engine.sink().report.is_some());
    }

    #[test]
    fn test_validator_error_counts_as_invalid() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let flaky: Box<dyn Validator> = Box::new(
            move |_: &WidgetDocument| -> std::result::Result<ValidationReport, ValidatorError> {
                if calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) % 2 == 0 {
                    Err(ValidatorError::Failed("compiler crashed".into()))
                } else {
                    Ok(ValidationReport::accepted())
                }
            },
        );
        let mut engine = engine_with(vec![doc(RICH_SEED)], flaky, config(6));
        engine.generate(3).unwrap();
        assert_eq!(engine.sink().records.len(), 3);
        assert!(engine.stats().invalid >= 3);
    }

    #[test]
    fn test_fixed_document_is_persisted() {
        let fixed = doc(
            r##"{"widget": {"backgroundColor": "#000000", "root": {"type": "leaf", "component": "Text", "content": "fixed"}}}"##,
        );
        let repaired = fixed.clone();
        let fixer: Box<dyn Validator> = Box::new(
            move |document: &WidgetDocument| -> std::result::Result<ValidationReport, ValidatorError> {
                if *document == repaired {
                    return Ok(ValidationReport::accepted());
                }
                Ok(ValidationReport {
                    fixed: Some(repaired.clone()),
                    ..ValidationReport::accepted()
                })
            },
        );
        let mut engine = engine_with(vec![doc(SIMPLE_SEED)], fixer, config(7));
        engine.generate(1).unwrap();
        let record = &engine.sink().records[0];
        assert_eq!(record.result_dsl, fixed);
        assert!(record.repaired);
        assert!(!record.mutations.is_empty());
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["repaired"], true);
    }

    #[test]
    fn test_repair_failing_validation_is_rejected() {
        // Too many children for the built-in rulebook
        let children = (0..12)
            .map(|i| format!(r#"{{"type": "leaf", "component": "Text", "content": "item {}"}}"#, i))
            .collect::<Vec<_>>()
            .join(",");
        let broken = doc(&format!(
            r#"{{"widget": {{"root": {{"type": "container", "direction": "col", "children": [{}]}}}}}}"#,
            children
        ));
        let checker = RulebookValidator::new(Rulebook::builtin().unwrap());
        assert!(!checker.check(&broken).can_compile);

        let fixer: Box<dyn Validator> = Box::new(
            move |document: &WidgetDocument| -> std::result::Result<ValidationReport, ValidatorError> {
                let report = checker.check(document);
                if !report.can_compile {
                    return Ok(report);
                }
                Ok(ValidationReport {
                    fixed: Some(broken.clone()),
                    ..report
                })
            },
        );
        let mut engine = engine_with(
            vec![doc(SIMPLE_SEED)],
            fixer,
            EngineConfig {
                max_attempts_per_item: 2,
                ..config(8)
            },
        );
        let summary = engine.generate(1).unwrap();
        assert!(!summary.reached_target);
        assert!(engine.sink().records.is_empty());
        assert_eq!(engine.stats().invalid, 2);
    }

    #[test]
    fn test_invalid_requests() {
        let mut engine = engine_with(vec![doc(SIMPLE_SEED)], accept_all(), config(8));
        assert!(matches!(engine.generate(0), Err(EngineError::EmptyTarget)));

        let plan = VariationPlan::new(vec![Some("neon".into())], vec![None], GenerationMode::Controlled);
        assert!(matches!(
            engine.generate_controlled(1, &plan),
            Err(EngineError::UnknownPreset { .. })
        ));
        assert_eq!(engine.stats().attempted, 0);
    }

    #[test]
    fn test_same_rng_seed_reproduces_run() {
        let hashes = |seed: u64| {
            let mut engine = engine_with(vec![doc(RICH_SEED)], rulebook_validator(), config(seed));
            engine.generate(10).unwrap();
            engine
                .into_sink()
                .records
                .into_iter()
                .map(|r| r.hash)
                .collect::<Vec<_>>()
        };
        assert_eq!(hashes(99), hashes(99));
    }

    #[test]
    fn test_variation_plan_axes() {
        let palette = Palette::builtin().unwrap();
        let plan = VariationPlan::for_axis(VaryAxis::All, &palette, GenerationMode::Controlled);
        assert_eq!(
            plan.combinations(),
            palette.themes.len() * palette.size_variants.len()
        );
        let plan = VariationPlan::for_axis(VaryAxis::Sizes, &palette, GenerationMode::Random);
        assert_eq!(plan.themes, vec![None]);
        assert_eq!(plan.combinations(), palette.size_variants.len());
        assert_eq!(VariationPlan::new(vec![], vec![], GenerationMode::Controlled).combinations(), 1);
        assert_eq!("themes".parse::<VaryAxis>().unwrap(), VaryAxis::Themes);
        assert!("colors".parse::<VaryAxis>().is_err());
    }

    #[test]
    fn test_batch_files_and_report_on_disk() {
        let dir = TempDir::new().unwrap();
        let rulebook = Rulebook::builtin().unwrap();
        let validator = RulebookValidator::new(rulebook.clone());
        let pool = SeedPool::from_documents(vec![doc(RICH_SEED)], &validator);
        let mut engine = MutationEngine::new(
            Palette::builtin().unwrap(),
            &rulebook,
            Box::new(validator),
            pool,
            BatchFileStore::new(dir.path()),
            config(10),
        )
        .unwrap();
        engine.generate(3).unwrap();
        let report = engine.report().unwrap();
        assert_eq!(report.stats.valid, 3);
        assert_eq!(report.target_count, 3);
        assert_eq!(report.mode, "random");

        let run_id = engine.run_id().to_string();
        let store = engine.sink();
        let batch: Vec<serde_json::Value> = serde_json::from_str(
            &std::fs::read_to_string(store.batch_path(&run_id, 1)).unwrap(),
        )
        .unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[2]["runId"], run_id.as_str());

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(store.report_path(&run_id)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["stats"]["valid"], 3);
        assert_eq!(saved["reachedTarget"], true);
    }

    #[test]
    fn test_run_id_format() {
        let mut rng = StdRng::seed_from_u64(1);
        for id in [new_run_id(None), new_run_id(Some(&mut rng))] {
            let parts: Vec<&str> = id.split('_').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0].len(), 8);
            assert_eq!(parts[1].len(), 6);
            assert_eq!(parts[2].len(), 6);
        }
    }

    #[test]
    fn test_run_id_suffix_follows_rng_seed() {
        let suffix = |seed: u64| {
            let engine = engine_with(vec![doc(SIMPLE_SEED)], accept_all(), config(seed));
            engine.run_id().rsplit('_').next().unwrap().to_string()
        };
        assert_eq!(suffix(21), suffix(21));
        assert_ne!(suffix(21), suffix(22));
    }
}
