//! Outbound request construction.
//!
//! Turns one [`Endpoint`] plus the client-level defaults into an
//! [`HttpRequest`]: resolved URL, serialized body, merged headers and
//! attached cookies.

use http::HeaderValue;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::defaults::{CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
use crate::config::{Endpoint, ValidatedConfig};
use crate::cookies::CookieStore;
use crate::transport::HttpRequest;

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// Error building a request. The endpoint is skipped.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `root + path` is not a valid URL.
    #[error("Failed to create request for '{url}': {source}")]
    InvalidUrl {
        /// The concatenated URL
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The body could not be serialized to JSON.
    #[error("Could not marshal request body: {0}")]
    Body(#[source] serde_json::Error),
}

/// Picks the `Content-Type` for a request body by its shape.
///
/// Objects and arrays are JSON; scalars (including strings holding JSON
/// text) and absent bodies are plain text.
#[must_use]
pub const fn content_type_for(body: Option<&Value>) -> &'static str {
    if matches!(body, Some(Value::Object(_) | Value::Array(_))) {
        CONTENT_TYPE_JSON
    } else {
        CONTENT_TYPE_TEXT
    }
}

/// Builds the outbound request for `endpoint`.
///
/// Steps, in order:
/// 1. URL is `config.root + endpoint.path`, concatenated verbatim.
/// 2. A present body is serialized as JSON.
/// 3. `Content-Type` is inferred from the body shape.
/// 4. Config headers, then endpoint headers, are applied on top
///    (last write wins per name, so either may replace `Content-Type`).
/// 5. The endpoint's `jar` cookies go into the shared store, then its
///    `cookies` are attached to this request only.
///
/// # Errors
///
/// Returns [`BuildError`] if the URL does not parse or the body cannot be
/// serialized. The cookie store is left untouched in that case.
pub fn build_request(
    config: &ValidatedConfig,
    endpoint: &Endpoint,
    cookies: &CookieStore,
) -> Result<HttpRequest, BuildError> {
    let raw_url = format!("{}{}", config.root, endpoint.path);
    let url = Url::parse(&raw_url).map_err(|source| BuildError::InvalidUrl {
        url: raw_url.clone(),
        source,
    })?;

    let body = endpoint
        .body
        .as_ref()
        .map(serde_json::to_vec)
        .transpose()
        .map_err(BuildError::Body)?;

    let mut request = HttpRequest::new(endpoint.method.clone(), url).with_header(
        CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(endpoint.body.as_ref())),
    );
    request.body = body;

    request.merge_headers(&config.headers);
    request.merge_headers(&endpoint.headers);

    cookies.set_jar_cookies(&endpoint.jar);
    cookies.attach_request_cookies(&mut request, &endpoint.cookies);

    Ok(request)
}
