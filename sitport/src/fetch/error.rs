//! Terminal fetch failures.

use super::outcome::FatalReason;
use thiserror::Error;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Exhausted,
    Fatal,
}

/// Why an endpoint could not be fetched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Every attempt hit a retryable failure.
    #[error(
        "{endpoint}: failed after {attempts} attempts (last status: {}, last error: {last_error})",
        status_label(.last_status)
    )]
    Exhausted {
        endpoint: String,
        attempts: u32,
        last_status: Option<u16>,
        last_error: String,
    },

    /// A non-retryable response ended the fetch.
    #[error("{endpoint}: {reason} (HTTP {status})")]
    Fatal {
        endpoint: String,
        status: u16,
        reason: FatalReason,
        body_preview: String,
    },
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Exhausted { .. } => FetchErrorKind::Exhausted,
            FetchError::Fatal { .. } => FetchErrorKind::Fatal,
        }
    }

    /// Name of the endpoint that failed.
    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Exhausted { endpoint, .. } | FetchError::Fatal { endpoint, .. } => endpoint,
        }
    }

    /// Last HTTP status observed, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Exhausted { last_status, .. } => *last_status,
            FetchError::Fatal { status, .. } => Some(*status),
        }
    }

    /// Body preview of the rejected response; only fatal errors carry one.
    pub fn body_preview(&self) -> Option<&str> {
        match self {
            FetchError::Fatal { body_preview, .. } => Some(body_preview),
            FetchError::Exhausted { .. } => None,
        }
    }
}
