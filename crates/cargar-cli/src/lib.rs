//! Cargador CLI Library
//!
//! Command-line interface for the Cargar load harness.

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use commands::{CheckArgs, Cli, ColorArg, Commands, OutputFormat, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::render_run_report;
