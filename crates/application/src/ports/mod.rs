//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an infrastructure adapter.

mod cancellation;
mod http_client;

pub use cancellation::CancellationToken;
pub use http_client::{HttpClient, HttpClientError};
