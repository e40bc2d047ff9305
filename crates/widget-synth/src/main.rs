//! widget-synth
//!
//! Command-line front end for the mutation engine. Loads the seed pool,
//! generates the requested number of documents into batch files, then
//! writes the run report next to them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mutation_engine::constants::run::MAX_ATTEMPTS_PER_ITEM;
use mutation_engine::{
    BatchFileStore, EngineConfig, EngineError, GenerationMode, MutationEngine, Palette,
    RunSummary, SeedPool, VariationPlan, VaryAxis,
};
use widget_dsl::{Rulebook, RulebookValidator};

#[derive(Parser, Debug)]
#[command(name = "widget-synth")]
#[command(about = "Generate synthetic widget DSL documents from a seed pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Documents to generate (seeds to vary in controlled runs)
    #[arg(default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Vary seeds over theme and size presets instead of mutating randomly
    #[arg(long, value_name = "themes|sizes|all")]
    vary: Option<VaryAxis>,

    /// Controlled mode used with --vary
    #[arg(long, default_value = "controlled", value_name = "controlled|random|hybrid")]
    mode: GenerationMode,

    /// Directory of seed documents
    #[arg(short, long, default_value = "seeds")]
    seeds: PathBuf,

    /// Output directory for batch files and the report
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// Palette file overriding the built-in catalog
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Rulebook file overriding the built-in rules
    #[arg(long)]
    rulebook: Option<PathBuf>,

    /// Attempts allowed per requested document in random runs (0 = unbounded)
    #[arg(long, default_value_t = MAX_ATTEMPTS_PER_ITEM)]
    max_attempts_per_item: u64,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    rng_seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("widget-synth: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<RunSummary, EngineError> {
    let palette = match &cli.palette {
        Some(path) => Palette::from_path(path)?,
        None => Palette::builtin()?,
    };
    let rulebook = match &cli.rulebook {
        Some(path) => Rulebook::from_path(path),
        None => Rulebook::builtin(),
    }
    .map_err(|e| EngineError::config(e.to_string()))?;

    let validator = RulebookValidator::new(rulebook.clone());
    let seeds = SeedPool::load_dir(&cli.seeds, &validator);

    let config = EngineConfig {
        output_dir: cli.out,
        max_attempts_per_item: cli.max_attempts_per_item,
        rng_seed: cli.rng_seed,
        ..EngineConfig::default()
    };
    let store = BatchFileStore::with_batch_size(&config.output_dir, config.batch_size);
    log::info!("Writing output to {:?}", store.dir());

    let plan = cli
        .vary
        .map(|axis| VariationPlan::for_axis(axis, &palette, cli.mode));
    if plan.is_none() && cli.mode != GenerationMode::Controlled {
        log::warn!("--mode {} has no effect without --vary", cli.mode);
    }

    let mut engine = MutationEngine::new(
        palette,
        &rulebook,
        Box::new(validator),
        seeds,
        store,
        config,
    )?;
    let summary = match &plan {
        Some(plan) => engine.generate_controlled(cli.count, plan)?,
        None => engine.generate(cli.count)?,
    };
    engine.report()?;
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} run: {} persisted from {} attempts in {:.1}s",
        summary.mode, summary.persisted, summary.attempts, summary.elapsed_seconds
    );
    if !summary.reached_target {
        println!(
            "Stopped at the attempt ceiling before reaching {} documents",
            summary.target_count
        );
    }
}
