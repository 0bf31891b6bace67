//! Arbiter CLI - goal arbitration driver.
//!
//! - `arbiter run` - rank and arbitrate goals once per tick
//! - `arbiter describe` - print every goal's terms at one instant
//! - `arbiter manage` - step the recursive manager from the root goal
//! - `arbiter builtin` - print the built-in scenario

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use arbiter_cli::scenario::BUILTIN;
use arbiter_cli::{Scenario, Scheduler};
use arbiter_core::{DiagnosticKind, VecSink};
use arbiter_select::{ArbitrationMode, Arbitrator, GoalManager};

#[derive(Parser)]
#[command(name = "arbiter")]
#[command(about = "Goal arbitration engine driver", version)]
struct Cli {
    /// Scenario file (YAML); the built-in explore/survive tree when omitted
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank and arbitrate goals once per tick
    Run {
        /// Number of ticks (overrides the scenario)
        #[arg(long)]
        ticks: Option<u32>,

        /// Time step (overrides the scenario)
        #[arg(long)]
        dt: Option<f64>,

        /// Arbitration mode: max, softmax, nash, lyapunov
        #[arg(short, long)]
        mode: Option<ArbitrationMode>,

        /// Comma-separated goal names offered to the arbitrator
        #[arg(long, value_delimiter = ',')]
        candidates: Vec<String>,
    },

    /// Print every goal's terms at one instant
    Describe {
        /// Evaluation time
        #[arg(long = "at", default_value_t = 0.0)]
        t: f64,
    },

    /// Step the recursive manager from the scenario's root goal
    Manage {
        #[arg(long)]
        ticks: Option<u32>,

        #[arg(long)]
        dt: Option<f64>,

        #[arg(short, long)]
        mode: Option<ArbitrationMode>,
    },

    /// Print the built-in scenario as YAML
    Builtin,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Some(Commands::Run {
            ticks,
            dt,
            mode,
            candidates,
        }) => {
            let mut scenario = load_scenario(cli.scenario.as_deref())?;
            apply_overrides(&mut scenario, ticks, dt, mode)?;
            if !candidates.is_empty() {
                scenario.candidates = candidates;
            }
            run_scheduler(&scenario)
        }
        Some(Commands::Describe { t }) => {
            let scenario = load_scenario(cli.scenario.as_deref())?;
            describe_goals(&scenario, t)
        }
        Some(Commands::Manage { ticks, dt, mode }) => {
            let mut scenario = load_scenario(cli.scenario.as_deref())?;
            apply_overrides(&mut scenario, ticks, dt, mode)?;
            run_manager(&scenario)
        }
        Some(Commands::Builtin) => {
            println!("{}", BUILTIN.trim());
            Ok(())
        }
        None => {
            println!("Arbiter - goal arbitration engine");
            println!();
            println!("Usage: arbiter [--scenario <FILE>] <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run       Rank and arbitrate goals once per tick");
            println!("  describe  Print every goal's terms at one instant");
            println!("  manage    Step the recursive manager from the root goal");
            println!("  builtin   Print the built-in scenario");
            println!();
            println!("Run 'arbiter --help' for more information.");
            Ok(())
        }
    }
}

fn load_scenario(path: Option<&std::path::Path>) -> Result<Scenario> {
    match path {
        Some(path) => {
            tracing::info!(scenario = %path.display(), "Loading scenario");
            Scenario::load(path)
        }
        None => Scenario::builtin(),
    }
}

fn apply_overrides(
    scenario: &mut Scenario,
    ticks: Option<u32>,
    dt: Option<f64>,
    mode: Option<ArbitrationMode>,
) -> Result<()> {
    if let Some(ticks) = ticks {
        scenario.ticks = ticks;
    }
    if let Some(dt) = dt {
        scenario.dt = dt;
    }
    if let Some(mode) = mode {
        scenario.arbitrator.mode = mode;
    }
    scenario.validate()
}

fn run_scheduler(scenario: &Scenario) -> Result<()> {
    let graph = scenario.build()?;
    let candidates = scenario.candidate_ids(&graph)?;
    let arbitrator = Arbitrator::new(scenario.arbitrator)?;
    tracing::info!(
        goals = graph.len(),
        candidates = candidates.len(),
        mode = %arbitrator.mode(),
        ticks = scenario.ticks,
        "Starting scheduler"
    );

    println!("Initial goals:");
    for id in graph.ids() {
        let report = graph.describe(id, 0.0, &scenario.state)?;
        println!(
            "  - {} (urgency={:.2}, utility={:.2})",
            report.name, report.urgency, report.utility
        );
    }

    let mut scheduler = Scheduler::new(&graph, candidates, arbitrator, scenario.dt);
    for index in 0..scenario.ticks {
        let tick = scheduler
            .tick(index, &scenario.state)
            .with_context(|| format!("Arbitration failed at tick {index}"))?;
        println!();
        println!("{tick}");
    }
    Ok(())
}

fn describe_goals(scenario: &Scenario, t: f64) -> Result<()> {
    let graph = scenario.build()?;
    for (i, id) in graph.ids().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", graph.describe(id, t, &scenario.state)?);
    }
    Ok(())
}

fn run_manager(scenario: &Scenario) -> Result<()> {
    let graph = scenario.build()?;
    let root = scenario
        .root_id(&graph)?
        .context("Scenario has no root goal; set `root` to use the manager")?;
    let arbitrator = Arbitrator::new(scenario.arbitrator)?;
    let mut manager = GoalManager::new(graph, root, arbitrator)?;
    tracing::info!(
        root = ?manager.graph().name(root),
        mode = %manager.arbitrator().mode(),
        ticks = scenario.ticks,
        "Starting manager"
    );

    let mut sink = VecSink::default();
    for index in 0..scenario.ticks {
        let value = manager
            .step_traced(scenario.dt, &scenario.state, &mut sink)
            .with_context(|| format!("Manager step {index} failed"))?;
        println!("Tick {index}: t={:.2} value={value:.4}", manager.time());
    }

    let cycles = sink.count(DiagnosticKind::CycleBroken);
    let faults =
        sink.count(DiagnosticKind::UrgencyFault) + sink.count(DiagnosticKind::UtilityFault);
    if cycles + faults > 0 {
        println!();
        println!("Diagnostics: {cycles} cycle(s) broken, {faults} term fault(s)");
    }
    Ok(())
}
