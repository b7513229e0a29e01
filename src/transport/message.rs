//! Values exchanged with the HTTP client, and the client seam itself.

use std::future::Future;

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use super::HttpError;

/// One outbound call, assembled per endpoint and consumed by the client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Verb to send
    pub method: Method,
    /// Absolute target, `root + path`
    pub url: Url,
    /// Final header set, cookies included
    pub headers: HeaderMap,
    /// Serialized body; `None` sends an empty body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Starts a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets `name`, dropping any earlier values for it.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlays `headers` on the current set. A name present in both ends
    /// up with the value from `headers`.
    pub fn merge_headers(&mut self, headers: &HeaderMap) {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
    }
}

/// Status and fully buffered body of an answered request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }
}

/// Sends one request and buffers the answer.
///
/// The runner is generic over this trait; tests swap in scripted clients.
pub trait HttpClient: Send + Sync {
    /// Sends `req` and reads the whole body.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] when no response arrives,
    /// [`HttpError::Body`] when the body cannot be read, and
    /// [`HttpError::InvalidUrl`] when the request cannot be built.
    fn request(&self, req: HttpRequest) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}
