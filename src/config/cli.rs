//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// Visor: scripted HTTP smoke tester
///
/// Runs a declared list of HTTP requests against a single host and
/// validates, and optionally exports, every response.
#[derive(Debug, Parser)]
#[command(name = "visor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for visor
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute every endpoint declared in a configuration file
    Run {
        /// Path to the configuration file (JSON, or TOML by extension)
        config: Option<PathBuf>,
    },

    /// Generate a sample configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::INIT_OUTPUT)]
        output: PathBuf,
    },

    /// Print the version
    Version,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown subcommands or malformed options,
    /// as well as for `--help`/`--version` display requests.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
