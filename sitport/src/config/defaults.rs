//! Default values for every configuration setting.

use std::path::PathBuf;

use super::settings::*;
use crate::endpoint::{default_endpoints, DEFAULT_BASE_URL};

/// User-Agent identifying the snapshot job to the upstream.
pub const DEFAULT_USER_AGENT: &str = "sitport-etl/1.0";

/// `Origin` header sent with every request.
pub const DEFAULT_ORIGIN: &str = "https://orion.directemar.cl";

/// `Referer` header sent alongside [`DEFAULT_ORIGIN`].
pub const DEFAULT_REFERER: &str = "https://orion.directemar.cl/";

/// TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Per-request timeout in seconds once connected.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

/// Attempts per endpoint before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Backoff grows by this many seconds per failed attempt.
pub const DEFAULT_BACKOFF_STEP_SECS: u64 = 2;

/// Shortest wait between attempts.
pub const DEFAULT_BACKOFF_FLOOR_SECS: u64 = 2;

/// Longest wait between attempts.
pub const DEFAULT_BACKOFF_CEILING_SECS: u64 = 60;

/// Lowest accepted backoff floor.
pub const MIN_BACKOFF_FLOOR_SECS: u64 = 1;

/// Snapshot output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/sitport.json";

/// Log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "logs/sitport.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            upstream: UpstreamSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                origin: Some(DEFAULT_ORIGIN.to_string()),
                referer: Some(DEFAULT_REFERER.to_string()),
            },
            http: HttpSettings {
                connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
                read_timeout: DEFAULT_READ_TIMEOUT_SECS,
            },
            retry: RetrySettings {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                backoff_step: DEFAULT_BACKOFF_STEP_SECS,
                backoff_floor: DEFAULT_BACKOFF_FLOOR_SECS,
                backoff_ceiling: DEFAULT_BACKOFF_CEILING_SECS,
            },
            output: OutputSettings {
                path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            },
            logging: LoggingSettings {
                file: PathBuf::from(DEFAULT_LOG_FILE),
            },
            endpoints: default_endpoints(),
        }
    }
}
