//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from reading, parsing, validation, and file generation.
/// Each variant belongs to one [`ConfigErrorKind`], which the binary maps
/// to a process exit code.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON configuration.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing or empty required field.
    #[error("Missing required field: {field}")]
    MissingRequired {
        /// Dotted location of the missing field (e.g. `endpoints[2].name`)
        field: String,
    },

    /// The configuration declares no endpoints.
    #[error("At least one endpoint is required")]
    NoEndpoints,

    /// Endpoint method is not one of the supported verbs.
    #[error("Invalid HTTP method '{method}' for endpoint '{endpoint}': expected one of {}", super::defaults::METHODS.join(", "))]
    InvalidMethod {
        /// Endpoint name
        endpoint: String,
        /// The rejected method
        method: String,
    },

    /// Invalid header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Cookie name or value contains characters a cookie cannot carry.
    #[error("Invalid cookie at {location}: {reason}")]
    InvalidCookie {
        /// Dotted location of the cookie (e.g. `jar[0]`)
        location: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The root URL is not an absolute URL.
    #[error("Failed to validate root URL \"{url}\": {reason}")]
    InvalidRoot {
        /// The root URL as written in the config
        url: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Coarse classification of [`ConfigError`] used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The file could not be read or written.
    Io,
    /// The file is not valid JSON/TOML or does not match the schema.
    Parse,
    /// A field failed validation.
    Invalid,
    /// The root URL is not absolute.
    Root,
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a field location.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::FileRead { .. } | Self::FileWrite { .. } => ConfigErrorKind::Io,
            Self::Json(_) | Self::Toml(_) => ConfigErrorKind::Parse,
            Self::MissingRequired { .. }
            | Self::NoEndpoints
            | Self::InvalidMethod { .. }
            | Self::InvalidHeaderName { .. }
            | Self::InvalidHeaderValue { .. }
            | Self::InvalidCookie { .. } => ConfigErrorKind::Invalid,
            Self::InvalidRoot { .. } => ConfigErrorKind::Root,
        }
    }
}
