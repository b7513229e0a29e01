//! JSON Schema validation of response bodies.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Error validating a body against a schema.
///
/// Every variant is reported under the "schema validation failed" category.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("failed to read schema '{location}': {source}")]
    Read {
        /// Schema location as configured
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not JSON.
    #[error("schema '{location}' is not valid JSON: {source}")]
    SchemaJson {
        /// Schema location as configured
        location: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// The schema is JSON but not a valid JSON Schema.
    #[error("failed to compile schema '{location}': {reason}")]
    Compile {
        /// Schema location as configured
        location: String,
        /// Compiler diagnostic
        reason: String,
    },

    /// The response body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),

    /// The body does not satisfy the schema.
    #[error("response does not match schema '{location}': {}", errors.join("; "))]
    Mismatch {
        /// Schema location as configured
        location: String,
        /// One diagnostic per violation
        errors: Vec<String>,
    },
}

/// Validates a document against a schema.
///
/// The runner only depends on this trait, so the engine can be swapped or
/// mocked.
pub trait SchemaValidator: Send + Sync {
    /// Checks `body` against the schema found at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema cannot be loaded or compiled,
    /// the body is not JSON, or the body violates the schema.
    fn validate(&self, body: &[u8], location: &str) -> Result<(), SchemaError>;
}

/// [`SchemaValidator`] backed by the `jsonschema` crate.
///
/// `location` is a filesystem path or a `file://` URL. The schema is loaded
/// and compiled on every call. Relative `$ref`s resolve against the schema
/// file's own location, so a schema can pull in its siblings.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, body: &[u8], location: &str) -> Result<(), SchemaError> {
        let path = schema_path(location);
        let raw = std::fs::read(&path).map_err(|e| SchemaError::Read {
            location: location.to_string(),
            source: e,
        })?;
        let mut schema: serde_json::Value =
            serde_json::from_slice(&raw).map_err(|e| SchemaError::SchemaJson {
                location: location.to_string(),
                source: e,
            })?;
        anchor_to_file(&mut schema, &path);

        let validator = jsonschema::validator_for(&schema).map_err(|e| SchemaError::Compile {
            location: location.to_string(),
            reason: e.to_string(),
        })?;

        let instance: serde_json::Value = serde_json::from_slice(body).map_err(SchemaError::Body)?;

        let errors: Vec<String> = validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Mismatch {
                location: location.to_string(),
                errors,
            })
        }
    }
}

/// Maps a schema location to a filesystem path.
fn schema_path(location: &str) -> PathBuf {
    if location.starts_with("file://") {
        if let Some(path) = Url::parse(location)
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return path;
        }
    }
    PathBuf::from(location)
}

/// Gives a schema without an identifier the `file://` URL it was read from,
/// which becomes the base for its relative references.
fn anchor_to_file(schema: &mut serde_json::Value, path: &Path) {
    let Some(root) = schema.as_object_mut() else {
        return;
    };
    let Some(base) = path
        .canonicalize()
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok())
    else {
        return;
    };

    // Draft 4 spells the identifier keyword without the `$`.
    let key = if root
        .get("$schema")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|dialect| dialect.contains("draft-04"))
    {
        "id"
    } else {
        "$id"
    };
    root.entry(key)
        .or_insert_with(|| serde_json::Value::String(base.into()));
}
