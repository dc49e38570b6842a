//! Upstream endpoint model.
//!
//! An endpoint is a named resource under the upstream base URL, reached with
//! either GET or POST. The set of endpoints is fixed for the lifetime of a run.

mod defaults;
mod types;

pub use defaults::{default_endpoints, DEFAULT_BASE_URL};
pub use types::{endpoint_url, EndpointDescriptor, HttpMethod, ParseMethodError};
