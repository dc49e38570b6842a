//! Configuration initialization.

use std::path::Path;
use sitport::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Write a default config.ini, refusing to overwrite unless `force` is set.
pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    if path.exists() && !force {
        return Err(CliError::FileExists(path));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}
