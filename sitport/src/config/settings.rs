//! Settings structs for each configuration section.
//!
//! Each struct represents one `[section]` of the INI file. These are plain
//! data; parsing lives in `parser`, serialization in `writer`.

use crate::endpoint::EndpointDescriptor;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub upstream: UpstreamSettings,
    pub http: HttpSettings,
    pub retry: RetrySettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
    /// Endpoints in fetch order, from `[endpoints]`.
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Upstream service and identifying headers.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamSettings {
    /// Base URL; endpoints are reached at `{base_url}/{name}`
    pub base_url: String,
    pub user_agent: String,
    /// Optional `Origin` header
    pub origin: Option<String>,
    /// Optional `Referer` header
    pub referer: Option<String>,
}

/// HTTP timeouts, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub connect_timeout: u64,
    pub read_timeout: u64,
}

/// Retry budget and backoff schedule, durations in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_step: u64,
    pub backoff_floor: u64,
    pub backoff_ceiling: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Where the snapshot JSON is written
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path; truncated at the start of each run
    pub file: PathBuf,
}
