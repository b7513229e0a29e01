//! Configuration layer for visor.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - Configuration file parsing ([`ConfigFile`])
//! - Validated configuration ([`ValidatedConfig`], [`Endpoint`], [`Cookie`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values and limits ([`defaults`])
//!
//! # File Format
//!
//! Configuration files are JSON unless the file name ends in `.toml`, in
//! which case the same structure is read from TOML. Field names are
//! camelCase (`saveResponseDir`, `acceptStatus`, `saveResponse`) in both
//! formats, and unknown fields are rejected.
//!
//! # Validation
//!
//! Validation happens once, before any request is sent:
//!
//! 1. **Required fields** - `root`, at least one endpoint, and each endpoint's
//!    `name`, `path` and `method`; header keys/values and cookie names/values
//!    must be non-empty.
//! 2. **Root URL** - must be absolute, with both a scheme and a host.
//!
//! The two stages are reported as distinct [`ConfigErrorKind`]s so the
//! binary can exit with distinct codes.

mod cli;
pub mod defaults;
mod error;
mod file;
mod validated;

#[cfg(test)]
mod file_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, ConfigErrorKind};
pub use file::{ConfigFile, CookieEntry, EndpointEntry, HeaderEntry, default_config_template};
pub use validated::{Cookie, Endpoint, ValidatedConfig, write_default_config};
