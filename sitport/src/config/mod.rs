//! Configuration for the snapshot job.
//!
//! Settings are read from an INI file (`~/.sitport/config.ini` unless a path
//! is given) into a [`ConfigFile`], then turned into the immutable
//! [`SnapshotConfig`] that the aggregator runs with.
//!
//! # Example
//!
//! ```
//! use sitport::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let snapshot_config = config.to_snapshot_config().unwrap();
//! assert_eq!(snapshot_config.endpoints().len(), 7);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod snapshot;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, HttpSettings, LoggingSettings, OutputSettings, RetrySettings, UpstreamSettings,
};
pub use snapshot::{ConfigError, SnapshotConfig};
