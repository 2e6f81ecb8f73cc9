//! HTTP call description types.

mod auth;
mod body;
mod method;
mod query;
mod spec;

pub use auth::AuthScheme;
pub use body::RequestBody;
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::{CallSpec, DEFAULT_TIMEOUT_MS};
