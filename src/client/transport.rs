//! Transport seam for the content client.
//!
//! [`Transport`] isolates the wire from retry and classification logic,
//! so the protocol tests run against a scripted transport instead of a
//! live server. [`HttpTransport`] is the production implementation over
//! reqwest.

use async_trait::async_trait;
use http::{Method, StatusCode};

use crate::config::ServiceConfig;

/// One outbound call, before any retry bookkeeping.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Resource path relative to the service base URL.
    pub resource: String,
    pub body: Option<serde_json::Value>,
}

/// Raw response: status plus undecoded body bytes.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// A call that never produced an HTTP status: DNS failure, connection
/// refused, timeout. Always eligible for retry.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportFault {
    pub message: String,
}

impl From<reqwest::Error> for TransportFault {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Interface for issuing a single network call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFault>;
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpTransport {
    /// Build a transport from service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportFault> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TransportFault::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url_for(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFault> {
        let mut builder = self
            .client
            .request(request.method, self.url_for(&request.resource))
            .header(http::header::ACCEPT, "application/json");

        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_url_joining() {
        let config = ServiceConfig {
            base_url: "https://content.example.org/api/".to_string(),
            ..ServiceConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();

        assert_eq!(
            transport.url_for("/editions/2026"),
            "https://content.example.org/api/editions/2026"
        );
        assert_eq!(
            transport.url_for("editions"),
            "https://content.example.org/api/editions"
        );
    }
}
