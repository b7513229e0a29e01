//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error-to-exit-code
//! mapping that support the main entry point.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use visor::config::{ConfigError, ConfigErrorKind};

/// Application exit codes.
///
/// Individual endpoint failures never affect the exit code.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Invalid or missing subcommand, or malformed arguments (exit code 1).
    pub const INVALID_ARGS: ExitCode = ExitCode::FAILURE;

    /// `run` was given no configuration path (exit code 2).
    pub fn missing_config_path() -> ExitCode {
        ExitCode::from(2)
    }

    /// The configuration file could not be read (exit code 3).
    pub fn config_read() -> ExitCode {
        ExitCode::from(3)
    }

    /// The configuration file could not be parsed (exit code 4).
    pub fn config_parse() -> ExitCode {
        ExitCode::from(4)
    }

    /// A configuration field failed validation (exit code 5).
    pub fn config_invalid() -> ExitCode {
        ExitCode::from(5)
    }

    /// The root URL is not absolute (exit code 6).
    pub fn invalid_root() -> ExitCode {
        ExitCode::from(6)
    }

    /// The HTTP client or async runtime could not be initialized (exit code 7).
    pub fn client_init() -> ExitCode {
        ExitCode::from(7)
    }
}

/// Maps a configuration error to its exit code.
pub fn config_exit_code(error: &ConfigError) -> std::process::ExitCode {
    match error.kind() {
        ConfigErrorKind::Io => exit_code::config_read(),
        ConfigErrorKind::Parse => exit_code::config_parse(),
        ConfigErrorKind::Invalid => exit_code::config_invalid(),
        ConfigErrorKind::Root => exit_code::invalid_root(),
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
