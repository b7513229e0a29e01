//! Response processing.
//!
//! A buffered response goes through three phases, in fixed order:
//!
//! 1. **Export** - the raw body is written to disk when a target is
//!    configured ([`export_response`]).
//! 2. **Status** - the status code must be in the endpoint's accept list,
//!    if it has one ([`validate_status`]).
//! 3. **Schema** - the body must satisfy the endpoint's JSON Schema, if it
//!    names one ([`SchemaValidator`]).
//!
//! Export runs before, and independently of, the checks: a response that
//! later fails validation is still on disk. The first failing phase ends
//! processing and is returned.

mod export;
mod sanitize;
mod schema;


use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Endpoint;
use crate::transport::HttpResponse;

pub use export::{ExportError, export_response, export_target};
pub use sanitize::sanitize_file_name;
pub use schema::{JsonSchemaValidator, SchemaError, SchemaValidator};

/// Error from one of the processing phases.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Writing the body to disk failed. Validation was not attempted.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The status code is not in the accept list.
    #[error("invalid HTTP status received: {status}")]
    StatusMismatch {
        /// The status code received
        status: u16,
    },

    /// The body failed schema validation.
    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),
}

/// Result of a response that passed every phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Where the body was exported, if anywhere
    pub exported_to: Option<PathBuf>,
}

/// Returns true if `status` is acceptable for `accept_status`.
///
/// An empty list accepts everything.
#[must_use]
pub fn status_accepted(accept_status: &[u16], status: u16) -> bool {
    accept_status.is_empty() || accept_status.contains(&status)
}

/// Checks the response status against the endpoint's accept list.
///
/// # Errors
///
/// Returns [`ProcessError::StatusMismatch`] naming the received code when
/// the list is non-empty and does not contain it.
pub fn validate_status(endpoint: &Endpoint, status: http::StatusCode) -> Result<(), ProcessError> {
    let code = status.as_u16();
    if status_accepted(&endpoint.accept_status, code) {
        Ok(())
    } else {
        Err(ProcessError::StatusMismatch { status: code })
    }
}

/// Runs export, status validation and schema validation for one response.
///
/// # Errors
///
/// Returns the first [`ProcessError`] in phase order.
pub fn process_response<V>(
    response: &HttpResponse,
    endpoint: &Endpoint,
    save_dir: Option<&Path>,
    validator: &V,
) -> Result<ProcessOutcome, ProcessError>
where
    V: SchemaValidator + ?Sized,
{
    let exported_to = export_response(&response.body, endpoint, save_dir)?;

    validate_status(endpoint, response.status)?;

    if let Some(location) = &endpoint.schema {
        validator.validate(&response.body, location)?;
    }

    Ok(ProcessOutcome { exported_to })
}
