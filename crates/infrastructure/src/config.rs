//! Runtime configuration.
//!
//! Credentials are read from the environment exactly once, at startup, into
//! an explicit `Settings` value handed to the HTTP adapter. Nothing reads
//! environment variables mid-run; a missing token surfaces as an `Auth`
//! error on the first call that asks for authentication, never as a silent
//! anonymous fallback.

use sonda_domain::request::DEFAULT_TIMEOUT_MS;

/// Environment variable holding the API access token.
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Secret injected into authenticated calls. `None` until configured.
    pub access_token: Option<String>,
    /// Default per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// An empty `ACCESS_TOKEN` counts as absent.
    #[must_use]
    pub fn from_env() -> Self {
        let access_token = std::env::var(ACCESS_TOKEN_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self {
            access_token,
            ..Self::default()
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the default per-call timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.access_token, None);
        assert_eq!(settings.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_builder() {
        let settings = Settings::default().with_token("abc123").with_timeout_ms(5_000);
        assert_eq!(settings.access_token.as_deref(), Some("abc123"));
        assert_eq!(settings.timeout_ms, 5_000);
    }
}
