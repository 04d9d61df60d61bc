//! goap-sim - headless GOAP agent simulation.
//!
//! Loads a scenario (world layout, agent tunables, designer table), runs the agent for a fixed
//! number of ticks and prints a summary:
//! - `goap-sim` - run the built-in patrol scenario
//! - `goap-sim --scenario arena.yaml --ticks 2000` - run a custom scenario
//! - `goap-sim --trace trace.json` - also dump every decision event

mod scenario;
mod sim;
mod strategies;
mod world;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::scenario::Scenario;
use crate::sim::Simulation;

#[derive(Parser)]
#[command(name = "goap-sim")]
#[command(about = "Run a GOAP agent through a scenario", version)]
struct Cli {
    /// Scenario YAML file (defaults to the built-in patrol scenario)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of fixed steps to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per step
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Seed for per-agent random streams
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write the decision trace as JSON
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let scenario = match &cli.scenario {
        Some(path) => Scenario::from_path(path)?,
        None => Scenario::builtin()?,
    };
    tracing::info!(
        scenario = %cli.scenario.as_ref().map_or("builtin".into(), |p| p.display().to_string()),
        actions = scenario.table.actions.len(),
        goals = scenario.table.goals.len(),
        ticks = cli.ticks,
        "starting simulation"
    );

    let mut sim = Simulation::new(&scenario, cli.dt, cli.seed)?;
    let summary = sim.run(cli.ticks);

    if let Some(path) = &cli.trace {
        let log = sim.trace().cloned().unwrap_or_default();
        let json = serde_json::to_string_pretty(&log)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write trace to {}", path.display()))?;
        tracing::info!(path = %path.display(), events = log.events.len(), "trace written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("GOAP simulation: {} ticks", summary.ticks);
    println!();
    println!("  plan calls:      {}", summary.plan_calls);
    println!("  plans started:   {}", summary.plans_started);
    println!("  replan requests: {}", summary.replan_requests);
    println!("  attacks:         {}", summary.attacks);
    println!("  health:          {:.1}", summary.health);
    println!("  stamina:         {:.1}", summary.stamina);
    println!(
        "  position:        ({:.2}, {:.2})",
        summary.position[0], summary.position[1]
    );
    println!(
        "  player:          ({:.2}, {:.2})",
        summary.player_position[0], summary.player_position[1]
    );
    println!(
        "  current goal:    {}",
        summary.current_goal.as_deref().unwrap_or("-")
    );
    println!(
        "  current action:  {}",
        summary.current_action.as_deref().unwrap_or("-")
    );
    println!();
    println!("Actions started:");
    for (name, count) in &summary.actions_started {
        println!("  {name:<22} {count}");
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
