//! Resilient content client.
//!
//! All reads and writes to the remote content service go through
//! [`ContentClient`]: one envelope-typed request surface with retry on
//! transient failures and immediate surfacing of 4xx outcomes.
//!
//! Classification:
//! - 4xx: [`ClientError::Status`], returned after one call, never retried
//! - 5xx or transport fault: retried up to the policy's attempt budget
//!   with linear backoff, then [`ClientError::ExhaustedRetries`]
//! - anything else crossing the boundary is a decode failure or a
//!   caller-driven cancellation
//!
//! Retries are fully internal; only the final outcome crosses the
//! client's boundary.

pub mod envelope;
pub mod transport;


pub use envelope::{Envelope, ErrorBody, Meta};
pub use transport::{HttpTransport, Transport, TransportFault, TransportRequest, TransportResponse};

use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::utils::retry::RetryConfig;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors crossing the client boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 4xx response. The request itself is wrong; never retried.
    #[error("content service rejected the request: {status}")]
    Status { status: StatusCode, body: ErrorBody },

    /// 5xx response. Transient from the caller's perspective; retried.
    #[error("content service failure: {status}")]
    Server { status: StatusCode, body: String },

    /// DNS/connect/timeout fault below the HTTP layer. Retried.
    #[error("transport fault: {0}")]
    Transport(#[from] TransportFault),

    /// Response body did not parse as an envelope.
    #[error("malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// Attempt budget exhausted; wraps the last observed failure.
    #[error("retries exhausted after {attempts} attempts")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },

    /// The caller cancelled the request or its retry sequence.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Transient failures eligible for another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Server { .. } | ClientError::Transport(_))
    }

    /// HTTP status, where one was observed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            ClientError::ExhaustedRetries { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// Per-request options.
///
/// A cancelled token aborts the in-flight attempt and any pending
/// backoff sleep; no retry loop outlives its caller's interest.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn cancellable(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
        }
    }
}

/// Envelope-typed HTTP client with retry and error classification.
pub struct ContentClient {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl ContentClient {
    /// Production client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.service)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.retry.policy(),
        ))
    }

    /// Client over an explicit transport and retry policy.
    pub fn with_transport(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Issue a request, retrying transient failures per the policy.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        resource: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<Envelope<T>> {
        let mut attempt: u32 = 1;

        loop {
            match self
                .attempt(method.clone(), resource, body.clone(), options)
                .await
            {
                Ok(envelope) => {
                    debug!(%method, resource, attempt, "content service call succeeded");
                    return Ok(envelope);
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    if !self.retry.should_retry(attempt) {
                        error!(
                            %method,
                            resource,
                            attempts = attempt,
                            error = %err,
                            "content service retries exhausted"
                        );
                        return Err(ClientError::ExhaustedRetries {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }

                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        %method,
                        resource,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient content service failure, retrying"
                    );
                    self.sleep_or_cancel(delay, options).await?;
                    attempt += 1;
                }
            }
        }
    }

    /// GET a resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        options: &RequestOptions,
    ) -> Result<Envelope<T>> {
        self.request(Method::GET, resource, None, options).await
    }

    /// POST a resource, optionally with a JSON body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        resource: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<Envelope<T>> {
        self.request(Method::POST, resource, body, options).await
    }

    /// DELETE a resource.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        resource: &str,
        options: &RequestOptions,
    ) -> Result<Envelope<T>> {
        self.request(Method::DELETE, resource, None, options).await
    }

    /// One network call, classified.
    async fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        resource: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> Result<Envelope<T>> {
        if let Some(token) = &options.cancel {
            if token.is_cancelled() {
                return Err(ClientError::Cancelled);
            }
        }

        let request = TransportRequest {
            method,
            resource: resource.to_string(),
            body,
        };

        let response = match &options.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(ClientError::Cancelled),
                    result = self.transport.send(request) => result?,
                }
            }
            None => self.transport.send(request).await?,
        };

        Self::classify(response)
    }

    fn classify<T: DeserializeOwned>(response: TransportResponse) -> Result<Envelope<T>> {
        let status = response.status;

        if status.is_client_error() {
            let body = serde_json::from_slice(&response.body).unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        if status.is_server_error() {
            let body: String = String::from_utf8_lossy(&response.body)
                .chars()
                .take(200)
                .collect();
            return Err(ClientError::Server { status, body });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn sleep_or_cancel(&self, delay: Duration, options: &RequestOptions) -> Result<()> {
        match &options.cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                tokio::select! {
                    _ = token.cancelled() => Err(ClientError::Cancelled),
                    _ = tokio::time::sleep(delay) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}
