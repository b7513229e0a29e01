//! reqwest-backed [`HttpClient`].

use std::sync::Arc;

use reqwest::cookie::CookieStore;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production client.
///
/// Built around a shared cookie provider: `Set-Cookie` headers on every
/// response are handed to it, and it supplies the `Cookie` header for
/// every request that does not already carry one.
///
/// ```no_run
/// use std::sync::Arc;
/// use visor::cookies::ScopedJar;
/// use visor::transport::{HttpClient, HttpRequest, ReqwestClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::with_cookie_provider(Arc::new(ScopedJar::default()))?;
/// let url = url::Url::parse("https://api.example.com/health")?;
/// let response = client.request(HttpRequest::new(http::Method::GET, url)).await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client that reads and writes cookies through `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend or system configuration
    /// cannot be initialized.
    pub fn with_cookie_provider<C>(provider: Arc<C>) -> Result<Self, reqwest::Error>
    where
        C: CookieStore + 'static,
    {
        let inner = reqwest::Client::builder()
            .cookie_provider(provider)
            .build()?;
        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();

        // `bytes()` consumes the response, so the connection is released
        // whether or not the read succeeds.
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Body(Box::new(e)))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
