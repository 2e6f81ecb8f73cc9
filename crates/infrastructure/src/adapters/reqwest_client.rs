//! HTTP client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. Non-2xx responses are
//! captured, not raised; the suites assert status codes explicitly.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method};
use url::Url;

use sonda_application::ports::{HttpClient, HttpClientError};
use sonda_domain::{AuthScheme, CallSpec, CapturedResponse, HttpMethod};

use crate::config::{ACCESS_TOKEN_VAR, Settings};

/// HTTP client implementation using reqwest.
///
/// Holds the credential from `Settings`; a call whose spec requests
/// authentication fails with `Auth` before touching the network when no
/// token is configured.
pub struct ReqwestHttpClient {
    client: Client,
    settings: Settings,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client.
    ///
    /// Default configuration: follow up to 10 redirects, rustls TLS,
    /// `Sonda/0.1.0` user agent (GitHub rejects requests without one).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(settings: Settings) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent("Sonda/0.1.0")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Creates an adapter around a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// Converts the domain method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Builds the `Authorization` header value for the spec's auth scheme.
    ///
    /// # Errors
    ///
    /// Returns `Auth` when the scheme needs a credential and none is
    /// configured.
    fn auth_header(&self, auth: AuthScheme) -> Result<Option<String>, HttpClientError> {
        let Some(prefix) = auth.header_prefix() else {
            return Ok(None);
        };
        let token = self.settings.access_token.as_ref().ok_or_else(|| {
            HttpClientError::Auth(format!("{ACCESS_TOKEN_VAR} is not set"))
        })?;
        Ok(Some(format!("{prefix} {token}")))
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let host = error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string();
            let message = error.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::Dns { host, message };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused { host };
            }
            return HttpClientError::Network(message);
        }

        HttpClientError::Network(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn call(&self, spec: &CallSpec) -> Result<CapturedResponse, HttpClientError> {
        let full_url = spec
            .full_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
        let url = Url::parse(&full_url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {full_url}")))?;

        let auth_header = self.auth_header(spec.auth)?;

        let timeout_ms = spec.timeout_ms.min(self.settings.timeout_ms);
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(spec.method), url)
            .timeout(Duration::from_millis(timeout_ms));

        if let Some(content) = spec.body.as_json() {
            builder = builder.json(content);
        }

        if let Some(value) = auth_header {
            builder = builder.header(reqwest::header::AUTHORIZATION, value);
        }

        tracing::debug!(method = %spec.method, url = %spec.url, buffered = spec.buffer, "sending request");
        let start = Instant::now();

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        // Buffered and text responses read the same way; the raw bytes are
        // kept on the captured response for content hashing.
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?
            .to_vec();

        let duration = start.elapsed();
        tracing::debug!(status, bytes = body.len(), ?duration, "response captured");

        Ok(CapturedResponse::new(status, headers, body, duration))
    }
}
