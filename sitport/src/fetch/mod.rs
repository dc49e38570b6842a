//! Per-endpoint fetch with retry.
//!
//! Each request attempt is classified into an [`AttemptOutcome`]:
//!
//! - `Success` - 2xx/3xx with a JSON content type and a parseable body
//! - `Retryable` - 429, 500, 502, 503, 504 or a network-level failure
//! - `Fatal` - any other status >= 400, a non-JSON content type, or a body
//!   that does not parse as JSON
//!
//! The [`Fetcher`] drives its attempt loop on that tag. Retryable outcomes
//! sleep according to the [`BackoffPolicy`] and try again until
//! `max_attempts` is used up; fatal outcomes end the fetch at once.

mod error;
mod fetcher;
mod outcome;
mod policy;
mod sleeper;

pub use error::{FetchError, FetchErrorKind};
pub use fetcher::{FetchReport, Fetcher};
pub use outcome::{
    body_preview, classify, is_json_content_type, is_retryable_status, AttemptOutcome,
    FatalReason, BODY_PREVIEW_CHARS, RETRYABLE_STATUSES,
};
pub use policy::{BackoffPolicy, RetryPolicy};
pub use sleeper::{Sleeper, ThreadSleeper};

#[cfg(test)]
pub use sleeper::tests::RecordingSleeper;
