//! CLI runner for common setup.
//!
//! Encapsulates config loading, command-line overrides and logging
//! initialization so command handlers start from a ready environment.

use crate::error::CliError;
use std::path::{Path, PathBuf};
use tracing::info;
use sitport::config::{config_file_path, ConfigFile};
use sitport::logging::{init_logging, LoggingGuard};

/// Values given on the command line that take precedence over config.ini.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
}

impl Overrides {
    /// Apply the overrides to a loaded configuration.
    pub fn apply(&self, config: &mut ConfigFile) {
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.upstream.base_url = base_url.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
    }
}

/// Resolve the config path, falling back to ~/.sitport/config.ini.
pub fn resolve_config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load config, apply overrides and initialize logging.
    pub fn new(
        config_path: Option<&Path>,
        overrides: &Overrides,
        debug_mode: bool,
    ) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let mut config = ConfigFile::load_from(&config_path)?;
        overrides.apply(&mut config);

        let logging_guard = init_logging(&config.logging.file, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("sitport v{}", sitport::VERSION);
        info!(
            config = %self.config_path.display(),
            exists = self.config_path.exists(),
            "sitport CLI: {} command",
            command
        );
    }
}
