//! Visor: scripted HTTP smoke tester
//!
//! Entry point for the visor application.

use std::path::Path;
use std::process::ExitCode;

use visor::config::{Cli, Command, ValidatedConfig, write_default_config};
use visor::runner::Runner;
use visor::version::version_string;

mod app;

use app::{config_exit_code, exit_code, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = match Cli::try_parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_code::INVALID_ARGS
            } else {
                exit_code::SUCCESS
            };
            // If the terminal cannot take the usage text there is nowhere
            // left to report that; the exit code still says what happened.
            let _ = e.print();
            return code;
        }
    };

    match &cli.command {
        Some(Command::Run { config }) => handle_run(config.as_deref(), cli.verbose),
        Some(Command::Init { output }) => handle_init(output),
        Some(Command::Version) => {
            println!("visor {}", version_string());
            exit_code::SUCCESS
        }
        None => {
            eprintln!("Invalid subcommand!");
            exit_code::INVALID_ARGS
        }
    }
}

/// Handles the `run` subcommand.
#[cfg(not(tarpaulin_include))]
fn handle_run(path: Option<&Path>, verbose: bool) -> ExitCode {
    setup_tracing(verbose);

    let Some(path) = path else {
        tracing::error!("No configuration path provided!");
        return exit_code::missing_config_path();
    };

    let config = match ValidatedConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return config_exit_code(&e);
        }
    };

    tracing::debug!("{config}");
    run_application(config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            config_exit_code(&e)
        }
    }
}

/// Runs every endpoint with the given configuration.
///
/// Endpoints run one at a time on a single-threaded runtime.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::client_init();
        }
    };

    runtime.block_on(async {
        match Runner::new(config) {
            Ok(runner) => {
                runner.run().await;
                exit_code::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e}");
                exit_code::client_init()
            }
        }
    })
}
