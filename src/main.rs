//! Panic System - scenario runner
//!
//! Plays a scripted list of attacks through the panic pipeline and prints
//! what each unit did. Useful for tuning a settings file.

use std::path::PathBuf;

use clap::Parser;
use panic_system::core::config::PanicConfig;
use panic_system::core::error::Result;
use panic_system::panic::{AttackResolution, Encounter, SavingThrowContext};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "panic-system", about = "Run a panic scenario against a settings file")]
struct Args {
    /// Scenario JSON: rounds of saving-throw contexts
    scenario: PathBuf,

    /// Settings TOML (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for the rolls
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Print the modifier trace for every check
    #[arg(short, long)]
    debug: bool,

    /// Emit one JSON resolution per line instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    name: String,
    rounds: Vec<Vec<SavingThrowContext>>,
}

/// One `--json` output line; the trace is only filled with `--debug`
#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    resolution: &'a AttackResolution,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<String>,
}

fn json_line(resolution: &AttackResolution, trace: Vec<String>) -> Result<String> {
    Ok(serde_json::to_string(&JsonLine { resolution, trace })?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("panic_system=info")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PanicConfig::load(path)?,
        None => PanicConfig::default(),
    };
    config.debug |= args.debug;

    let scenario: Scenario = serde_json::from_str(&std::fs::read_to_string(&args.scenario)?)?;
    tracing::info!(
        "Running scenario '{}' ({} rounds, seed {})",
        scenario.name,
        scenario.rounds.len(),
        args.seed
    );

    let mut encounter = Encounter::new(config, ChaCha8Rng::seed_from_u64(args.seed))?;
    if encounter.report().is_enabled() {
        tracing::info!("Modifier trace enabled");
    }

    for (round, attacks) in scenario.rounds.iter().enumerate() {
        if !args.json {
            println!("=== Round {} ===", round + 1);
        }

        for ctx in attacks {
            let result = encounter.resolve_attack(ctx);
            let trace = encounter.take_report_lines();
            if args.json {
                println!("{}", json_line(&result, trace)?);
            } else {
                print_resolution(&result);
                for line in trace {
                    println!("    {}", line);
                }
            }
        }

        let recovered = encounter.end_round();
        if !args.json && !recovered.is_empty() {
            println!("  {} unit(s) calmed down", recovered.len());
        }
    }

    if !args.json {
        println!("=== Final status ===");
        for unit in encounter.units().iter() {
            println!("  {:?}: {}", unit.id.0, unit.panic_status);
        }
    }

    encounter.end_encounter();
    Ok(())
}

fn print_resolution(result: &AttackResolution) {
    let throw = result
        .saving_throw
        .map(|t| format!("{:.2}", t))
        .unwrap_or_else(|| "n/a".to_string());

    println!(
        "  {:?}: throw {} -> {:?} (roll {:?}), now {}",
        result.unit.0, throw, result.panic.outcome, result.panic.roll, result.status_after
    );

    if let Some(ejection) = &result.ejection {
        println!("    ejection: {:?} (roll {:?})", ejection.outcome, ejection.roll);
    }

    for request in &result.narration {
        println!("    > {}", request.text());
    }
}
