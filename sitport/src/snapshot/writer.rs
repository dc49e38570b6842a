//! Writes snapshots to disk.
//!
//! The document is written to a temporary file next to the target and then
//! renamed over it, so readers see either the previous snapshot or the new
//! one, never a partial file.

use super::types::Snapshot;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Failure while persisting a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotWriteError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to create output directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to write snapshot to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Failure while loading a previously written snapshot.
#[derive(Debug, Error)]
pub enum SnapshotReadError {
    #[error("failed to read snapshot {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid snapshot document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persists snapshots at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the snapshot, replacing any previous file.
    ///
    /// Returns the number of bytes written.
    pub fn write(&self, snapshot: &Snapshot) -> Result<usize, SnapshotWriteError> {
        let mut document = snapshot.to_json_pretty()?;
        document.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SnapshotWriteError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.temp_path();
        debug!(path = %temp_path.display(), "Writing snapshot to temporary file");

        let result = write_synced(&temp_path, document.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(source) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(SnapshotWriteError::Write {
                path: self.path.clone(),
                source,
            });
        }

        info!(
            path = %self.path.display(),
            bytes = document.len(),
            entries = snapshot.len(),
            "Snapshot written"
        );
        Ok(document.len())
    }

    /// Loads the snapshot currently stored at the writer's path.
    pub fn read(&self) -> Result<Snapshot, SnapshotReadError> {
        Snapshot::read_from(&self.path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl Snapshot {
    /// Reads a snapshot document from disk.
    pub fn read_from(path: &Path) -> Result<Snapshot, SnapshotReadError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SnapshotReadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
