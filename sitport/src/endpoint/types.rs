//! Endpoint descriptor types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP method used to reach an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method name is neither GET nor POST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method '{0}' (expected GET or POST)")]
pub struct ParseMethodError(pub String);

impl FromStr for HttpMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            _ => Err(ParseMethodError(s.trim().to_string())),
        }
    }
}

/// Immutable description of one upstream endpoint.
///
/// `body` is only meaningful for POST; GET requests never carry a body.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    name: String,
    method: HttpMethod,
    body: Option<Value>,
}

impl EndpointDescriptor {
    /// Creates a descriptor with an explicit method and no body.
    pub fn new(name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            method,
            body: None,
        }
    }

    /// GET endpoint.
    pub fn get(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get)
    }

    /// POST endpoint sending `{}` unless a body is attached.
    pub fn post(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post)
    }

    /// Attaches an explicit JSON request body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The body configured on the descriptor, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The body actually sent on the wire.
    ///
    /// POST falls back to an empty JSON object; GET is always `None`.
    pub fn request_body(&self) -> Option<Value> {
        match self.method {
            HttpMethod::Get => None,
            HttpMethod::Post => Some(
                self.body
                    .clone()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            ),
        }
    }
}

/// Joins the base URL and endpoint name as `{base}/{name}`.
pub fn endpoint_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}
