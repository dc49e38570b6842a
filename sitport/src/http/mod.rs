//! HTTP transport abstraction.
//!
//! The fetcher talks to the upstream through the [`HttpClient`] trait so the
//! retry loop can be exercised against scripted responses in tests. The
//! production implementation is [`ReqwestClient`], a blocking reqwest
//! session reused for every endpoint in a run.

mod client;
mod types;

pub use client::{ClientConfig, ReqwestClient};
pub use types::{ClientBuildError, HttpClient, HttpRequest, HttpResponse, TransportError};

#[cfg(test)]
pub use client::tests::MockHttpClient;
