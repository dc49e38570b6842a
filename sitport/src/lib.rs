//! SITPORT snapshot - fetch the SITPORT port-conditions API into one JSON file
//!
//! A run fetches a fixed, ordered list of JSON endpoints from a single
//! upstream, retries transient failures, rejects anything that is not JSON,
//! and writes all results as one timestamped snapshot. Either every endpoint
//! succeeds and the snapshot is written, or the run fails and the previous
//! file is left untouched.
//!
//! ```ignore
//! use sitport::aggregator::Aggregator;
//! use sitport::config::ConfigFile;
//! use sitport::snapshot::SnapshotWriter;
//!
//! let config = ConfigFile::load()?;
//! let aggregator = Aggregator::from_config(config.to_snapshot_config()?)?;
//! let snapshot = aggregator.run()?;
//! SnapshotWriter::new(&config.output.path).write(&snapshot)?;
//! ```

pub mod aggregator;
pub mod config;
pub mod endpoint;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod snapshot;

/// Version of the library and CLI, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
