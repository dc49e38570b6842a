//! Classification of a single request attempt.

use crate::http::{HttpResponse, TransportError};
use serde_json::Value;
use std::fmt;

/// Statuses treated as transient overload or rate limiting.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Number of body characters kept for diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 400;

/// Why an attempt was rejected without retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    /// Client, auth or not-found style status.
    HttpStatus,
    /// The response is not JSON (login page, WAF challenge, ...).
    NonJsonContentType(Option<String>),
    /// JSON content type, but the body does not parse.
    MalformedJson(String),
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::HttpStatus => write!(f, "non-retryable HTTP status"),
            FatalReason::NonJsonContentType(Some(ct)) => {
                write!(f, "non-JSON content type '{}'", ct)
            }
            FatalReason::NonJsonContentType(None) => write!(f, "missing content type"),
            FatalReason::MalformedJson(e) => write!(f, "malformed JSON body: {}", e),
        }
    }
}

/// Result of one attempt, as seen by the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(Value),
    Retryable {
        /// `None` when the failure happened below HTTP.
        status: Option<u16>,
        reason: String,
    },
    Fatal {
        status: u16,
        reason: FatalReason,
        body_preview: String,
    },
}

impl AttemptOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttemptOutcome::Retryable { .. })
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// True when the content type names a JSON media type.
///
/// Matches any type containing `json`, so `application/problem+json` and
/// `text/json` pass as well.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
}

/// First [`BODY_PREVIEW_CHARS`] characters of a body.
pub fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

/// Classifies the result of one request attempt.
pub fn classify(result: Result<HttpResponse, TransportError>) -> AttemptOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            return AttemptOutcome::Retryable {
                status: None,
                reason: e.to_string(),
            }
        }
    };

    if is_retryable_status(response.status) {
        return AttemptOutcome::Retryable {
            status: Some(response.status),
            reason: format!("retryable status {}", response.status),
        };
    }

    if response.status >= 400 {
        return AttemptOutcome::Fatal {
            status: response.status,
            reason: FatalReason::HttpStatus,
            body_preview: body_preview(&response.body),
        };
    }

    if !is_json_content_type(response.content_type.as_deref()) {
        return AttemptOutcome::Fatal {
            status: response.status,
            reason: FatalReason::NonJsonContentType(response.content_type),
            body_preview: body_preview(&response.body),
        };
    }

    match serde_json::from_str(&response.body) {
        Ok(value) => AttemptOutcome::Success(value),
        Err(e) => AttemptOutcome::Fatal {
            status: response.status,
            reason: FatalReason::MalformedJson(e.to_string()),
            body_preview: body_preview(&response.body),
        },
    }
}
