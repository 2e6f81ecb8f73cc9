//! Captured response type
//!
//! A `CapturedResponse` is the normalized result of one HTTP call: status,
//! headers, body (text and raw bytes), and timing. It is read-only once
//! captured; assertions and descendant setup steps only inspect it.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

/// Normalized HTTP response captured by the client adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as a map.
    pub headers: HashMap<String, String>,
    /// Response body as text (lossy UTF-8 for binary payloads).
    pub body: String,
    /// Response body as raw bytes, for content hashing.
    pub body_bytes: Vec<u8>,
    /// Time taken by the call.
    pub duration: Duration,
}

impl CapturedResponse {
    /// Creates a new captured response from raw response data.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let text = String::from_utf8(body.clone())
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());

        Self {
            status,
            headers,
            body: text,
            body_bytes: body,
            duration,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Attempts to parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Parses the body as JSON, treating an empty body as an empty object.
    ///
    /// HEAD responses carry no body; they must compare equal to `{}` rather
    /// than null. Unparseable non-empty bodies also collapse to `{}`.
    #[must_use]
    pub fn json_or_empty(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Object(serde_json::Map::new());
        }
        self.json()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    /// Returns the response size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body_bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response_with(status: u16, body: &[u8]) -> CapturedResponse {
        CapturedResponse::new(status, HashMap::new(), body.to_vec(), Duration::from_millis(5))
    }

    #[test]
    fn test_get_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response =
            CapturedResponse::new(200, headers, Vec::new(), Duration::ZERO);

        assert_eq!(
            response.get_header("content-type"),
            Some(&"application/json".to_string())
        );
        assert!(response.get_header("CONTENT-TYPE").is_some());
        assert_eq!(response.get_header("x-missing"), None);
    }

    #[test]
    fn test_json_parsing() {
        let response = response_with(200, br#"{"origin": "127.0.0.1"}"#);
        assert_eq!(response.json(), Some(json!({"origin": "127.0.0.1"})));
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let response = response_with(200, b"");
        assert_eq!(response.json(), None);
        assert_eq!(response.json_or_empty(), json!({}));
    }

    #[test]
    fn test_binary_body_keeps_bytes() {
        let bytes = vec![0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe];
        let response = response_with(200, &bytes);
        assert_eq!(response.body_bytes, bytes);
        assert_eq!(response.size(), 6);
    }

    #[test]
    fn test_is_success() {
        assert!(response_with(200, b"").is_success());
        assert!(response_with(204, b"").is_success());
        assert!(!response_with(404, b"").is_success());
        assert!(!response_with(500, b"").is_success());
    }
}
