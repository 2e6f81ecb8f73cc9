//! Call specification
//!
//! `CallSpec` describes a single outbound HTTP call: method, URL, query
//! parameters, body, authentication scheme, buffering mode, and timeout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainResult;
use crate::request::{AuthScheme, HttpMethod, QueryParams, RequestBody};

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Specification of an HTTP call to be executed by an `HttpClient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters appended to the URL.
    #[serde(default)]
    pub query: QueryParams,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
    /// Authentication scheme.
    #[serde(default)]
    pub auth: AuthScheme,
    /// Whether to read the response as raw bytes (binary payloads).
    #[serde(default)]
    pub buffer: bool,
    /// Per-call timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl CallSpec {
    /// Creates a new call specification.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: QueryParams::new(),
            body: RequestBody::none(),
            auth: AuthScheme::None,
            buffer: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Shorthand for a GET call.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Shorthand for a HEAD call.
    #[must_use]
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Head, url)
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_json_body(mut self, content: Value) -> Self {
        self.body = RequestBody::json(content);
        self
    }

    /// Sets the authentication scheme.
    #[must_use]
    pub const fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// Requests buffered (raw byte) reading of the response body.
    #[must_use]
    pub const fn buffered(mut self) -> Self {
        self.buffer = true;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the URL with the encoded query string appended.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` if the query cannot be encoded.
    pub fn full_url(&self) -> DomainResult<String> {
        if self.query.is_empty() {
            return Ok(self.url.clone());
        }
        let encoded = self.query.encode()?;
        let separator = if self.url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.url, separator, encoded))
    }
}
