//! Sonda Application - Fixture chain orchestration
//!
//! This crate owns the Scope tree and the runner that executes it, plus the
//! port traits implemented by infrastructure adapters.

pub mod error;
pub mod ports;
pub mod runner;
pub mod scope;

pub use error::SetupError;
pub use ports::{CancellationToken, HttpClient, HttpClientError};
pub use runner::FixtureRunner;
pub use scope::{Scope, SetupFuture, Vars, require_var};
