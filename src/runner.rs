//! Endpoint execution loop.
//!
//! Runs every configured endpoint in declaration order, one at a time:
//! build the request, send it, process the response. A failure at any
//! stage is logged with the task's context and the loop moves on; nothing
//! an endpoint does can abort the run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::Instrument;

use crate::config::{Endpoint, ValidatedConfig};
use crate::cookies::CookieStore;
use crate::request::{BuildError, build_request};
use crate::response::{JsonSchemaValidator, ProcessError, SchemaValidator, process_response};
use crate::transport::{HttpClient, HttpError, ReqwestClient};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

/// Error setting up a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP client could not be created.
    #[error("Error when initializing client: {0}")]
    ClientInit(#[source] reqwest::Error),
}

/// Why a single endpoint failed.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The request could not be built; nothing was sent.
    #[error("Failed to prepare request: {0}")]
    Build(#[from] BuildError),

    /// The request was not answered or the body could not be read.
    #[error("Failed to send request: {0}")]
    Transport(#[from] HttpError),

    /// Export or validation of the response failed.
    #[error("Failed to process response: {0}")]
    Process(#[from] ProcessError),
}

/// Result of an endpoint that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Status code received
    pub status: http::StatusCode,
    /// Wall-clock time of the HTTP call, body read included
    pub elapsed: Duration,
    /// Where the body was exported, if anywhere
    pub exported_to: Option<PathBuf>,
}

/// Executes the configured endpoints against one host.
///
/// Owns everything that lives for the whole run: the configuration, the
/// cookie store, the HTTP client, the schema validator, and the root
/// logging span (carrying `root`) that every task span hangs off.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `V`: The schema validator implementation
#[derive(Debug)]
pub struct Runner<H = ReqwestClient, V = JsonSchemaValidator> {
    config: ValidatedConfig,
    cookies: CookieStore,
    client: H,
    validator: V,
    span: tracing::Span,
}

impl Runner<ReqwestClient, JsonSchemaValidator> {
    /// Creates a runner with the production HTTP client and validator.
    ///
    /// The client shares the runner's cookie jar, so `Set-Cookie` responses
    /// are visible to later endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::ClientInit`] if the HTTP client cannot be built.
    pub fn new(config: ValidatedConfig) -> Result<Self, RunError> {
        let cookies = CookieStore::new(config.root_url.clone());
        let client =
            ReqwestClient::with_cookie_provider(cookies.jar()).map_err(RunError::ClientInit)?;
        Ok(Self::with_parts(
            config,
            cookies,
            client,
            JsonSchemaValidator::new(),
        ))
    }
}

impl<H, V> Runner<H, V>
where
    H: HttpClient,
    V: SchemaValidator,
{
    /// Creates a runner from explicit parts.
    ///
    /// The config's startup `jar` cookies are loaded into `cookies` here.
    #[must_use]
    pub fn with_parts(config: ValidatedConfig, cookies: CookieStore, client: H, validator: V) -> Self {
        cookies.set_jar_cookies(&config.jar);
        let span = tracing::info_span!("visor", root = %config.root);

        Self {
            config,
            cookies,
            client,
            validator,
            span,
        }
    }

    /// Runs every endpoint in order, logging each outcome.
    pub async fn run(&self) {
        for endpoint in &self.config.endpoints {
            self.run_endpoint(endpoint).await;
        }
    }

    /// Runs one endpoint and logs its outcome inside a task span.
    async fn run_endpoint(&self, endpoint: &Endpoint) {
        let span = tracing::info_span!(
            parent: &self.span,
            "task",
            task_name = %endpoint.name,
            path = %endpoint.path,
            method = %endpoint.method,
        );

        async {
            match self.execute_endpoint(endpoint).await {
                Ok(outcome) => tracing::info!(
                    elapsed = ?outcome.elapsed,
                    status = outcome.status.as_u16(),
                    "Task Succeeded"
                ),
                Err(e) => tracing::error!("{e}"),
            }
        }
        .instrument(span)
        .await;
    }

    /// Builds, sends and processes one endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError`] naming the stage that failed.
    pub async fn execute_endpoint(&self, endpoint: &Endpoint) -> Result<TaskOutcome, TaskError> {
        let request = build_request(&self.config, endpoint, &self.cookies)?;

        let start = Instant::now();
        let response = self.client.request(request).await?;
        let elapsed = start.elapsed();

        let processed = process_response(
            &response,
            endpoint,
            self.config.save_response_dir.as_deref(),
            &self.validator,
        )?;

        Ok(TaskOutcome {
            status: response.status,
            elapsed,
            exported_to: processed.exported_to,
        })
    }
}
