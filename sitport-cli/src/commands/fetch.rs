//! The snapshot run.

use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use sitport::aggregator::Aggregator;
use sitport::snapshot::SnapshotWriter;

use crate::error::CliError;
use crate::runner::{CliRunner, Overrides};

/// Arguments for the fetch command.
#[derive(Debug, Default)]
pub struct FetchArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub debug: bool,
}

/// Fetch every endpoint and write the snapshot.
///
/// Nothing is written unless every endpoint succeeded.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let overrides = Overrides {
        output: args.output,
        base_url: args.base_url,
        max_attempts: args.max_attempts,
    };
    let runner = CliRunner::new(args.config.as_deref(), &overrides, args.debug)?;
    runner.log_startup("fetch");

    let config = runner.config();
    let snapshot_config = config.to_snapshot_config()?;
    let writer = SnapshotWriter::new(&config.output.path);
    let aggregator = Aggregator::from_config(snapshot_config)?;

    let start = Instant::now();
    let snapshot = aggregator.run()?;
    let bytes = writer.write(&snapshot)?;

    info!(
        path = %writer.path().display(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Done"
    );
    println!(
        "OK -> {} ({} endpoints, {:.1} KB, refreshed {})",
        writer.path().display(),
        snapshot.len(),
        bytes as f64 / 1024.0,
        snapshot.refreshed_utc()
    );

    Ok(())
}
