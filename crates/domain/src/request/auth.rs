//! Authentication scheme types
//!
//! Only the header shape lives here; the secret itself is injected by the
//! HTTP adapter from its configuration.

use serde::{Deserialize, Serialize};

/// How a call authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// No authentication
    #[default]
    None,
    /// `Authorization: token <secret>` (GitHub personal access token style)
    Token,
    /// `Authorization: Bearer <secret>`
    Bearer,
}

impl AuthScheme {
    /// Returns the `Authorization` header prefix for this scheme.
    #[must_use]
    pub const fn header_prefix(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Token => Some("token"),
            Self::Bearer => Some("Bearer"),
        }
    }

    /// Returns whether this scheme needs a credential to be configured.
    #[must_use]
    pub const fn requires_credential(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_prefix() {
        assert_eq!(AuthScheme::None.header_prefix(), None);
        assert_eq!(AuthScheme::Token.header_prefix(), Some("token"));
        assert_eq!(AuthScheme::Bearer.header_prefix(), Some("Bearer"));
    }

    #[test]
    fn test_requires_credential() {
        assert!(!AuthScheme::None.requires_credential());
        assert!(AuthScheme::Token.requires_credential());
        assert!(AuthScheme::Bearer.requires_credential());
    }
}
