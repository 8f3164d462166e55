//! HTTP transport abstraction for testability.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use super::request::UploadRequest;

/// Default timeout for upload requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// User name Package Drone expects for deploy keys.
const DEPLOY_USER: &str = "deploy";

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Errors raised before a response was received.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Connection or protocol failure.
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// No answer within the configured timeout.
    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Trait for the upload PUT.
///
/// Implementations perform one authenticated request and report whatever
/// status the server answered with; interpreting the status is up to the
/// caller.
pub trait Transport {
    /// Send `request` and return the server's status and body.
    fn put(&self, request: &UploadRequest) -> Result<TransportResponse, TransportError>;
}

/// Transport backed by a blocking reqwest client.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    key: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport authenticating with the given deploy key.
    pub fn new(key: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom request timeout.
    pub fn with_timeout(key: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            key: key.into(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for ReqwestTransport {
    fn put(&self, request: &UploadRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .put(&request.url)
            .basic_auth(DEPLOY_USER, Some(&self.key))
            .query(&request.query)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(request.body.clone())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        url: request.url.clone(),
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    TransportError::Request {
                        url: request.url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}
