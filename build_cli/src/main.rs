//! build-calc: compute DPS and defences for a character record
//!
//! Run with: `build-calc calc --character char.json --tree tree.json`

use anyhow::{Context, Result};
use build_cli::simulation::{simulate, SimulationConfig};
use build_cli::{build_engine, format_summary, load_character, load_options, load_tree};
use build_core::damage::{write_report, BuildReport, CalculationResult};
use build_core::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Character stat and damage calculator
#[derive(Parser)]
#[command(name = "build-calc")]
#[command(about = "Compute DPS and defences for a character build", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one calculation and print the summary
    Calc(CalcArgs),

    /// Sample the selected skill with a seeded RNG and compare against the calculation
    Simulate(SimulateArgs),

    /// Print the default game constants as TOML
    Constants,
}

/// Inputs shared by every calculating subcommand
#[derive(Args)]
struct InputArgs {
    /// Character record (JSON)
    #[arg(short, long)]
    character: PathBuf,

    /// Passive tree data (JSON)
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Calculation options (TOML)
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Game constants replacing the built-in ones (TOML)
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Skill and support definitions replacing the built-in ones (TOML)
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Ailment definitions replacing the built-in ones (TOML)
    #[arg(long)]
    ailments: Option<PathBuf>,

    /// Skill to evaluate instead of the first one
    #[arg(long)]
    skill: Option<String>,
}

#[derive(Args)]
struct CalcArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Write the flat report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the full result as JSON instead of the summary
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Simulated seconds of continuous use
    #[arg(long, default_value_t = 600.0)]
    seconds: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Calc(args) => run_calc(args),
        Command::Simulate(args) => run_simulate(args),
        Command::Constants => {
            let toml = toml::to_string_pretty(&GameConstants::default())
                .context("failed to serialize constants")?;
            print!("{toml}");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(input: &InputArgs) -> Result<CalculationResult> {
    let character = load_character(&input.character)
        .with_context(|| format!("failed to load character {}", input.character.display()))?;
    let tree = match &input.tree {
        Some(path) => {
            load_tree(path).with_context(|| format!("failed to load tree {}", path.display()))?
        }
        None => PassiveTree::new(),
    };
    let mut options = match &input.options {
        Some(path) => load_options(path)
            .with_context(|| format!("failed to load options {}", path.display()))?,
        None => CalcOptions::default(),
    };
    if let Some(skill) = &input.skill {
        options.selected_skill = Some(skill.clone());
    }

    let engine = build_engine(
        input.constants.as_deref(),
        input.skills.as_deref(),
        input.ailments.as_deref(),
    )
    .context("failed to load game data")?;

    let result = engine
        .calculate(&character, &tree, &options)
        .context("calculation rejected its inputs")?;
    info!(skill = %result.skill, dps = result.total_dps, "calculated");
    Ok(result)
}

fn run_calc(args: CalcArgs) -> Result<()> {
    let result = run(&args.input)?;

    if let Some(path) = &args.report {
        write_report(path, &BuildReport::from_result(&result))
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_summary(&result));
    }
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let result = run(&args.input)?;
    let config = SimulationConfig {
        seconds: args.seconds,
        seed: args.seed,
    };
    let report = simulate(&result, &config);

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "sampled {:.1} vs calculated {:.1} ({:.2}% apart)",
        report.sampled_dps,
        report.analytical_dps,
        report.deviation() * 100.0
    );
    Ok(())
}
