//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cargador: CLI for Cargar - load harness for MulticastMenu deployments
#[derive(Parser, Debug)]
#[command(name = "cargador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a load test against a MulticastMenu deployment
    Run(RunArgs),

    /// Load and validate the fixture files without sending any traffic
    Check(CheckArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Base address of the target deployment
    #[arg(long, default_value = "http://localhost:8000")]
    pub host: String,

    /// Number of concurrent simulated users
    #[arg(short, long, default_value = "10")]
    pub users: u32,

    /// Run duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Directory holding credentials.csv, stream_ids.csv, category_slugs.csv
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Minimum think-time between actions, in seconds
    #[arg(long, default_value = "1.0")]
    pub wait_min: f64,

    /// Maximum think-time between actions, in seconds
    #[arg(long, default_value = "5.0")]
    pub wait_max: f64,

    /// Also fetch embedded /static/ and /media/ assets from page loads
    #[arg(long)]
    pub fetch_static_assets: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// YAML scenario file (replaces the other run flags, including weights)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Also write the JSON summary to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Directory holding the fixture CSV files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

/// Summary output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text report
    #[default]
    Text,
    /// JSON summary
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}
