//! Sonda Domain - Core harness types
//!
//! This crate defines the domain model for the Sonda API test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod check;
pub mod error;
pub mod outcome;
pub mod request;
pub mod response;

pub use check::{CheckFailure, expect_eq, expect_exists, expect_ne, expect_subset, is_subset};
pub use error::{DomainError, DomainResult};
pub use outcome::{CheckReport, FailureKind, Outcome, RunReport, ScopeReport, SkipReason};
pub use request::{AuthScheme, CallSpec, HttpMethod, QueryParam, QueryParams, RequestBody};
pub use response::CapturedResponse;
