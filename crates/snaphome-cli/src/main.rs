//! `snaphome` – snapshot-model homing from the command line.
//!
//! Loads a landmark scenario from `~/.snaphome/config.toml` (or `--config`,
//! or the built-in three-cylinder layout when neither exists) and:
//!
//! - `field` – sweeps the configured grid and reports the mean angular error
//!   of the homing vectors; exits non-zero when it misses the acceptance
//!   threshold.
//! - `probe X Y` – explains the homing decision at one position.
//! - `init` – writes the default scenario file.
//! - `schema` – prints the JSON schema of the scenario file.

mod config;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use snaphome_perception::geometry::angle_between;
use snaphome_runtime::field::angular_error;
use snaphome_runtime::{FieldEvaluator, HomingVector, correspondences};

use crate::config::Config;
use crate::report::ProbeReport;

#[derive(Parser)]
#[command(name = "snaphome")]
#[command(version)]
#[command(about = "Visual homing with the snapshot model")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scenario file (defaults to ~/.snaphome/config.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the homing field over the configured grid
    Field {
        /// Evaluate cells one at a time instead of on the thread pool
        #[arg(long)]
        sequential: bool,
    },

    /// Explain the homing vector at one position
    Probe {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },

    /// Write the default scenario file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the JSON schema of the scenario file
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    snaphome_runtime::init_tracing("info");

    let result = match cli.command {
        Commands::Field { sequential } => {
            load_config(cli.config.as_ref()).and_then(|cfg| cmd_field(&cfg, sequential, cli.format))
        }
        Commands::Probe { x, y } => {
            load_config(cli.config.as_ref()).and_then(|cfg| cmd_probe(&cfg, x, y, cli.format))
        }
        Commands::Init { force } => cmd_init(cli.config.as_ref(), force),
        Commands::Schema => config::schema_json().map(|schema| {
            println!("{schema}");
            ExitCode::SUCCESS
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_field(cfg: &Config, sequential: bool, format: OutputFormat) -> Result<ExitCode, String> {
    let evaluator = evaluator(cfg)?;
    let parallel = cfg.parallel && !sequential;
    info!(parallel, grid = ?cfg.grid, "sweeping homing field");

    let report = evaluator
        .evaluate(&cfg.grid, parallel)
        .map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Json => println!("{}", report::to_json(&report)?),
        OutputFormat::Pretty => report::print_field(&report, cfg.acceptance_threshold_deg),
    }

    if report.passes(cfg.acceptance_threshold_deg) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn cmd_probe(cfg: &Config, x: f64, y: f64, format: OutputFormat) -> Result<ExitCode, String> {
    let evaluator = evaluator(cfg)?;
    let origin = evaluator.origin().clone();
    let current = evaluator.snapshot_at(x, y).map_err(|e| e.to_string())?;

    let matches = correspondences(&origin, &current).map_err(|e| e.to_string())?;
    let homing =
        HomingVector::from_correspondences(&matches, evaluator.config()).map_err(|e| e.to_string())?;
    let ideal_bearing = angle_between(x, y, origin.x(), origin.y());
    let error_deg = angular_error(homing.direction, ideal_bearing).to_degrees();

    let probe = ProbeReport::new(origin, current, matches, homing, ideal_bearing, error_deg);
    match format {
        OutputFormat::Json => println!("{}", report::to_json(&probe)?),
        OutputFormat::Pretty => report::print_probe(&probe),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_init(path: Option<&PathBuf>, force: bool) -> Result<ExitCode, String> {
    let path = path.cloned().unwrap_or_else(config::config_path);
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    config::save_to(&Config::default(), &path)?;
    println!(
        "  {} Scenario saved to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(ExitCode::SUCCESS)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Load the scenario from `path`, or from the default location.
///
/// An explicit path must exist; a missing default file means the built-in
/// scenario.
fn load_config(path: Option<&PathBuf>) -> Result<Config, String> {
    match path {
        Some(p) => config::load_from(p)?
            .ok_or_else(|| format!("No scenario file at {}", p.display())),
        None => Ok(config::load()?.unwrap_or_else(|| {
            let mut cfg = Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        })),
    }
}

fn evaluator(cfg: &Config) -> Result<FieldEvaluator, String> {
    FieldEvaluator::new(cfg.landmarks.clone(), cfg.origin.x, cfg.origin.y, cfg.homing)
        .map_err(|e| e.to_string())
}
