//! Lists the configured endpoints in fetch order.

use std::path::Path;
use sitport::config::ConfigFile;
use sitport::endpoint::endpoint_url;

use crate::error::CliError;
use crate::runner::resolve_config_path;

pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    let config = ConfigFile::load_from(&path)?;
    let snapshot_config = config.to_snapshot_config()?;

    println!("Base: {}", snapshot_config.base_url());
    println!();
    for (index, endpoint) in snapshot_config.endpoints().iter().enumerate() {
        let body = endpoint
            .request_body()
            .map(|b| format!("  body: {}", b))
            .unwrap_or_default();
        println!(
            "{:>2}. {:<4} {}{}",
            index + 1,
            endpoint.method(),
            endpoint_url(snapshot_config.base_url(), endpoint.name()),
            body
        );
    }

    Ok(())
}
