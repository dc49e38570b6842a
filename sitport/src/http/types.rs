//! Transport types shared by every [`HttpClient`] implementation.

use crate::endpoint::HttpMethod;
use serde_json::Value;
use thiserror::Error;

/// A single request to the upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body, serialized as the request payload. `None` sends no body.
    pub body: Option<Value>,
}

/// A response as seen by the fetcher.
///
/// Every HTTP status is a response; interpreting the status is up to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Response with an `application/json` content type.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Some("application/json; charset=utf-8"), body)
    }

    /// Response with a `text/html` content type.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, Some("text/html; charset=utf-8"), body)
    }
}

/// Network-level failure: the request produced no usable HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// The HTTP session could not be constructed.
#[derive(Debug, Error)]
#[error("failed to create HTTP client: {0}")]
pub struct ClientBuildError(pub String);

/// Blocking HTTP client used by the fetcher.
pub trait HttpClient: Send + Sync {
    /// Performs the request and returns the raw response.
    ///
    /// Only network-level problems are errors; 4xx and 5xx responses come
    /// back as `Ok`.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
