//! Headless Fight Runner
//!
//! Loads a scenario, fights it many times and prints loss statistics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish::battle::{Army, TracingObserver};
use skirmish::core::{Side, SimError, SimulationConfig};
use skirmish::roster::Scenario;
use skirmish::simulation::{run_battles, run_parallel, BatchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Unit-by-unit battles, any army
    Scalar,
    /// Columnar engine, splash armies only
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Fight Runner - Monte Carlo army battles
#[derive(Parser, Debug)]
#[command(name = "fight_runner")]
#[command(about = "Run repeated battles between two armies and report losses")]
struct Args {
    /// Scenario TOML file (built-in skirmish when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of battles to fight
    #[arg(long, default_value_t = 10_000)]
    trials: usize,

    /// Random seed, overriding the scenario's
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Engine::Scalar)]
    engine: Engine,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Fight a single logged battle instead of a batch
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(if e.is_configuration() { 2 } else { 1 });
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::skirmish(),
    };
    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    let (mut attacker, mut defender) = scenario.build()?;
    let config = &scenario.simulation;

    if args.verbose {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let report = attacker.attack(&mut defender, &mut TracingObserver, &mut rng);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    tracing::info!(
        "Fighting {} battles with the {:?} engine (seed {})",
        args.trials,
        args.engine,
        config.seed
    );
    let outcome = match args.engine {
        Engine::Scalar => run_battles(&attacker, &defender, args.trials, config)?,
        Engine::Batch => run_parallel(&attacker, &defender, args.trials, config)?,
    };

    match args.format {
        Format::Json => println!("{}", outcome.to_json()),
        Format::Text => print_text(&attacker, &defender, &outcome, config),
    }
    Ok(())
}

fn print_text(attacker: &Army, defender: &Army, outcome: &BatchOutcome, config: &SimulationConfig) {
    println!("Fight Result");
    println!("============");
    println!("{}", outcome.summary());
    println!("Seed: {}", config.seed);

    for (side, army) in [(Side::Attacker, attacker), (Side::Defender, defender)] {
        println!();
        println!("{} losses:", army.name());
        for (i, battalion) in army.battalions().iter().enumerate() {
            let dist = outcome.loss_distribution(side, i);
            println!(
                "  {:<16} {:>7.2} +/- {:<6.2} of {}",
                battalion.name(),
                dist.mean,
                dist.std_dev,
                battalion.n()
            );
            for (lost, freq) in dist.significant(0.005) {
                println!("      {:>5}: {:>5.1}%", lost, freq * 100.0);
            }
        }
    }
}
