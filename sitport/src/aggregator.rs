//! Drives the fetcher over every configured endpoint and assembles the
//! snapshot.
//!
//! A run is all-or-nothing: endpoints are fetched one at a time in
//! configured order, and the first failure aborts the run without
//! producing a snapshot.
//!
//! ```text
//! Idle -> Fetching(0) -> Fetching(1) -> ... -> Complete
//!              \              \
//!               `-> Failed     `-> Failed
//! ```

use crate::config::SnapshotConfig;
use crate::fetch::{FetchError, Fetcher};
use crate::http::{ClientBuildError, HttpClient, ReqwestClient};
use crate::snapshot::{Snapshot, SnapshotEntry};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, error, info};

/// Source of the snapshot timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Progress of the current or most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Fetching the endpoint at this index.
    Fetching(usize),
    Complete,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed)
    }
}

/// Builds snapshots from a fixed endpoint list.
pub struct Aggregator<C> {
    config: SnapshotConfig,
    fetcher: Fetcher<C>,
    clock: Box<dyn Clock>,
    /// Readable from other threads while a run is in progress.
    state: Mutex<RunState>,
}

impl Aggregator<ReqwestClient> {
    /// Creates an aggregator with a fresh HTTP session built from the config.
    pub fn from_config(config: SnapshotConfig) -> Result<Self, ClientBuildError> {
        let client = ReqwestClient::new(config.client())?;
        let fetcher = Fetcher::new(client, *config.retry());
        Ok(Self::new(config, fetcher))
    }
}

impl<C: HttpClient> Aggregator<C> {
    pub fn new(config: SnapshotConfig, fetcher: Fetcher<C>) -> Self {
        Self {
            config,
            fetcher,
            clock: Box::new(SystemClock),
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Replaces the clock used to stamp snapshots.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// State of the current or last run.
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: RunState) {
        let mut current = self.state.lock().unwrap_or_else(|e| e.into_inner());
        debug!(from = ?*current, to = ?state, "Run state transition");
        *current = state;
    }

    /// Fetches every endpoint and returns the completed snapshot.
    ///
    /// Each call starts a new run from [`RunState::Idle`]; nothing carries
    /// over from an earlier failed run.
    pub fn run(&self) -> Result<Snapshot, FetchError> {
        self.set_state(RunState::Idle);
        let started = Instant::now();
        let base_url = self.config.base_url();
        let endpoints = self.config.endpoints();

        info!(
            base_url,
            endpoints = endpoints.len(),
            "Starting snapshot run"
        );

        let mut entries = Vec::with_capacity(endpoints.len());
        for (index, endpoint) in endpoints.iter().enumerate() {
            self.set_state(RunState::Fetching(index));
            info!(
                endpoint = endpoint.name(),
                method = %endpoint.method(),
                position = index + 1,
                total = endpoints.len(),
                "Fetching endpoint"
            );

            let payload = match self.fetcher.fetch(base_url, endpoint) {
                Ok(payload) => payload,
                Err(e) => {
                    self.set_state(RunState::Failed);
                    error!(endpoint = endpoint.name(), error = %e, "Snapshot run failed");
                    return Err(e);
                }
            };

            entries.push((
                endpoint.name().to_string(),
                SnapshotEntry {
                    method: endpoint.method(),
                    payload,
                },
            ));
        }

        let snapshot = Snapshot::new(self.clock.now(), base_url, entries);
        self.set_state(RunState::Complete);
        info!(
            entries = snapshot.len(),
            refreshed_utc = %snapshot.refreshed_utc(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Snapshot run complete"
        );
        Ok(snapshot)
    }
}
