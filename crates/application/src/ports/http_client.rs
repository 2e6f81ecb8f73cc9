//! HTTP client port.

use async_trait::async_trait;
use thiserror::Error;

use sonda_domain::{CallSpec, CapturedResponse, FailureKind};

/// Errors an HTTP client adapter can surface.
///
/// A non-2xx status is NOT an error: suites assert status codes explicitly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// Generic transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// DNS resolution failed.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that could not be resolved.
        host: String,
        /// Underlying resolver message.
        message: String,
    },

    /// The remote host refused the connection.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Host that refused the connection.
        host: String,
    },

    /// The call exceeded its timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Missing or invalid credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be serialized.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Classifies this error for the report.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Network(_) | Self::Dns { .. } | Self::ConnectionRefused { .. } => {
                FailureKind::Network
            }
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Auth(_) => FailureKind::Auth,
            Self::InvalidUrl(_) | Self::InvalidBody(_) | Self::Other(_) => FailureKind::Other,
        }
    }
}

/// Port for executing HTTP calls.
///
/// Object-safe so the runner and suites can hold an `Arc<dyn HttpClient>`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes the call described by `spec` and captures the response.
    async fn call(&self, spec: &CallSpec) -> Result<CapturedResponse, HttpClientError>;
}
