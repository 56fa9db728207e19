//! Headless Skirmish Runner
//!
//! Plays seeded random legal actions on a battle map and prints the result
//! as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use grid_tactics::core::{EngineConfig, FactionId};
use grid_tactics::map::{skirmish_map, Map, MapSnapshot};
use grid_tactics::rules::{load_scenario_json, SKIRMISH_RULES};
use grid_tactics::turn::run_match;
use serde::Serialize;

/// Headless Skirmish Runner - seeded random play for testing rule sets
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Play a seeded random skirmish and print the outcome as JSON")]
struct Args {
    /// Rule set JSON (built-in skirmish rules when omitted)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Map snapshot JSON to start from (built-in battlefield when omitted)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Engine constants TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of faction turns to play
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// What to print once the match ends
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Winner, turn count and funds
    Summary,
    /// Final map state as a save/sync snapshot
    Snapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    seed: u64,
    turns_played: u32,
    final_turn: u32,
    actions: usize,
    winner: Option<String>,
    units_remaining: usize,
    funds: Vec<(String, i32)>,
    skipped_records: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("skirmish failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> grid_tactics::Result<String> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    let rules = match &args.rules {
        Some(path) => std::fs::read_to_string(path)?,
        None => SKIRMISH_RULES.to_string(),
    };
    let loaded = load_scenario_json(&rules, &config)?;
    let scenario = Arc::new(loaded.scenario);

    let mut map = match &args.snapshot {
        Some(path) => {
            let snapshot = MapSnapshot::from_json(&std::fs::read_to_string(path)?)?;
            Map::from_snapshot(Arc::clone(&scenario), config, &snapshot)?
        }
        None => skirmish_map(Arc::clone(&scenario), config)?,
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, turns = args.turns, "Starting skirmish");
    let report = run_match(&mut map, seed, args.turns)?;

    let snapshot = map.snapshot()?;
    if args.format == OutputFormat::Snapshot {
        return if args.pretty {
            snapshot.to_json_pretty()
        } else {
            snapshot.to_json()
        };
    }

    let faction_name = |id: FactionId| map.faction(id).map(|f| f.name.clone());
    let summary = Summary {
        seed,
        turns_played: report.turns_played,
        final_turn: report.final_turn,
        actions: report.actions.len(),
        winner: report.winner.and_then(faction_name),
        units_remaining: map.unit_count(),
        funds: map.factions().iter().map(|f| (f.name.clone(), f.funds())).collect(),
        skipped_records: loaded.skipped.iter().map(|e| e.to_string()).collect(),
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    Ok(json)
}
