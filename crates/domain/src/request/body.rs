//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP request body.
///
/// The suites only ever send structured JSON, so the body is carried as a
/// `serde_json::Value` rather than a raw string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON body
    Json {
        /// The JSON document to send.
        content: Value,
    },
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a JSON body.
    #[must_use]
    pub const fn json(content: Value) -> Self {
        Self::Json { content }
    }

    /// Returns whether the body is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type for this body, if any.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json { .. } => Some("application/json"),
        }
    }

    /// Returns the JSON content, if this is a JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::None => None,
            Self::Json { content } => Some(content),
        }
    }
}
