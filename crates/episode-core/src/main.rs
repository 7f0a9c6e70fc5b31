//! Marooned episode generator CLI.
//!
//! Generates one deterministic episode and optionally writes the step
//! sequence as JSONL for the presentation layer.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use episode_core::{generate_episode, EpisodeConfig, EpisodeRng, StepLogger};

/// Command line arguments for the generator.
#[derive(Parser, Debug)]
#[command(name = "marooned")]
#[command(about = "Deterministic social-deduction episode generator")]
struct Args {
    /// Random seed for reproducibility (default: wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of turns to generate (overrides the tuning file)
    #[arg(long)]
    turns: Option<u32>,

    /// Path to a tuning.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the step sequence as JSONL to this path
    #[arg(long)]
    steps_out: Option<PathBuf>,

    /// Print final agent and ledger snapshots as JSON
    #[arg(long)]
    summary: bool,
}

/// Dev diagnostics via RUST_LOG, stderr, compact. Defaults to warn.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EpisodeConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => EpisodeConfig::default(),
    };
    if let Some(turns) = args.turns {
        config.simulation.turns = turns;
    }

    // An explicit seed replays an exact episode; otherwise take one
    // from the wall clock and report it so the run stays replayable.
    let seed = args.seed.unwrap_or_else(|| {
        let mut entropy = EpisodeRng::from_entropy();
        entropy.draw(0, i32::MAX) as u64
    });

    println!("Marooned Episode Generator");
    println!("==========================");
    println!("Seed: {}", seed);
    println!("Turns: {}", config.simulation.turns);
    println!("Agents: {}", config.agents.names.join(", "));
    println!();

    let episode = generate_episode(seed, &config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("Generated {} steps", episode.steps().len());

    if let Some(path) = &args.steps_out {
        let mut logger = StepLogger::new(path).unwrap_or_else(|e| {
            eprintln!("Error: could not open {}: {}", path.display(), e);
            process::exit(1);
        });
        if let Err(e) = logger.log_batch(episode.steps()).and_then(|_| logger.flush()) {
            eprintln!("Error: could not write steps: {}", e);
            process::exit(1);
        }
        println!("Wrote {} steps to {}", logger.step_count(), path.display());
    }

    if args.summary {
        let agents = episode.agent_snapshots();
        let ledger = episode.ledger_snapshot();
        match (
            serde_json::to_string_pretty(&agents),
            serde_json::to_string_pretty(&ledger),
        ) {
            (Ok(a), Ok(l)) => {
                println!("\nAgents:\n{}", a);
                println!("\nLedger:\n{}", l);
            }
            _ => eprintln!("Error: could not serialize summary"),
        }
    }
}
