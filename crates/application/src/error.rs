//! Application error types

use thiserror::Error;

use sonda_domain::FailureKind;

use crate::ports::HttpClientError;

/// Errors produced by a Scope's setup step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// An HTTP call failed.
    #[error("HTTP call failed: {0}")]
    Http(#[from] HttpClientError),

    /// A variable expected from an ancestor Scope is missing or has the wrong shape.
    #[error("missing captured variable: {0}")]
    MissingVar(String),

    /// Any other setup failure.
    #[error("{0}")]
    Other(String),
}

impl SetupError {
    /// Classifies this error for the report.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Http(err) => err.failure_kind(),
            Self::MissingVar(_) | Self::Other(_) => FailureKind::Other,
        }
    }
}
