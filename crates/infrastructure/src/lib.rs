//! Sonda Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: the reqwest-backed HTTP client, environment-based
//! configuration, and the text report writer.

pub mod adapters;
pub mod config;
pub mod report;

pub use adapters::ReqwestHttpClient;
pub use config::Settings;
pub use report::write_report;
