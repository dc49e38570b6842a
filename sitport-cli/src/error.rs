//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a non-zero exit code for every failure.

use std::fmt;
use std::path::PathBuf;
use std::process;
use sitport::config::{ConfigError, ConfigFileError};
use sitport::fetch::{FatalReason, FetchError};
use sitport::http::ClientBuildError;
use sitport::snapshot::SnapshotWriteError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or is invalid
    Config(String),
    /// Failed to create the HTTP session
    Client(ClientBuildError),
    /// An endpoint could not be fetched; no snapshot was written
    Fetch(FetchError),
    /// Failed to write the snapshot file
    SnapshotWrite(SnapshotWriteError),
    /// Refused to overwrite an existing file
    FileExists(PathBuf),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Fetch(FetchError::Fatal {
                reason: FatalReason::NonJsonContentType(_),
                body_preview,
                ..
            }) => {
                eprintln!();
                eprintln!("The upstream answered with something other than JSON.");
                eprintln!("This is usually a login page or a WAF challenge. Response preview:");
                eprintln!("  {}", body_preview);
            }
            CliError::Fetch(FetchError::Fatal { body_preview, .. }) if !body_preview.is_empty() => {
                eprintln!();
                eprintln!("Response preview:");
                eprintln!("  {}", body_preview);
            }
            CliError::Fetch(FetchError::Exhausted { .. }) => {
                eprintln!();
                eprintln!("The upstream kept failing with transient errors.");
                eprintln!("The previous snapshot (if any) was left untouched; try again later.");
            }
            CliError::FileExists(_) => {
                eprintln!();
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Client(e) => write!(f, "{}", e),
            CliError::Fetch(e) => write!(f, "Snapshot run failed: {}", e),
            CliError::SnapshotWrite(e) => write!(f, "{}", e),
            CliError::FileExists(path) => write!(f, "File already exists: {}", path.display()),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Client(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::SnapshotWrite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ClientBuildError> for CliError {
    fn from(e: ClientBuildError) -> Self {
        CliError::Client(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<SnapshotWriteError> for CliError {
    fn from(e: SnapshotWriteError) -> Self {
        CliError::SnapshotWrite(e)
    }
}
