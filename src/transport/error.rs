//! Transport failures.

use thiserror::Error;

/// Why a request produced no usable response.
///
/// The endpoint that hits one of these is skipped; there are no retries.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No response arrived: DNS, refused connection, TLS and similar.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Headers arrived but the body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// reqwest refused to build the request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
