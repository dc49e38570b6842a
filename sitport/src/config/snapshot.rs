//! Immutable runtime configuration handed to the aggregator.

use super::settings::ConfigFile;
use crate::endpoint::EndpointDescriptor;
use crate::fetch::{BackoffPolicy, RetryPolicy};
use crate::http::ClientConfig;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// A configuration that cannot produce a complete snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint name must not be empty")]
    EmptyEndpointName,

    #[error("endpoint '{0}' is configured more than once")]
    DuplicateEndpoint(String),
}

/// Everything one run needs: where to fetch from, what to fetch, and how.
///
/// Validated on construction: the base URL is http(s), and endpoint names
/// are non-empty and unique, so every endpoint maps to exactly one snapshot
/// entry.
///
/// # Example
///
/// ```
/// use sitport::config::SnapshotConfig;
/// use sitport::endpoint::EndpointDescriptor;
///
/// let config = SnapshotConfig::new(
///     "http://localhost:8080/users",
///     vec![EndpointDescriptor::get("Totalgeneral")],
/// )
/// .unwrap();
/// assert_eq!(config.retry().max_attempts(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    base_url: String,
    endpoints: Vec<EndpointDescriptor>,
    client: ClientConfig,
    retry: RetryPolicy,
}

impl SnapshotConfig {
    pub fn new(
        base_url: impl Into<String>,
        endpoints: Vec<EndpointDescriptor>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        validate_endpoints(&endpoints)?;

        Ok(Self {
            base_url,
            endpoints,
            client: ClientConfig::default(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoints in fetch order.
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

fn validate_endpoints(endpoints: &[EndpointDescriptor]) -> Result<(), ConfigError> {
    if endpoints.is_empty() {
        return Err(ConfigError::NoEndpoints);
    }

    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if endpoint.name().trim().is_empty() {
            return Err(ConfigError::EmptyEndpointName);
        }
        if !seen.insert(endpoint.name()) {
            return Err(ConfigError::DuplicateEndpoint(endpoint.name().to_string()));
        }
    }
    Ok(())
}

impl ConfigFile {
    /// Builds the runtime configuration from the loaded settings.
    pub fn to_snapshot_config(&self) -> Result<SnapshotConfig, ConfigError> {
        let client = ClientConfig::new()
            .with_user_agent(self.upstream.user_agent.clone())
            .with_origin(self.upstream.origin.clone())
            .with_referer(self.upstream.referer.clone())
            .with_connect_timeout(Duration::from_secs(self.http.connect_timeout))
            .with_read_timeout(Duration::from_secs(self.http.read_timeout));

        let retry = RetryPolicy::new()
            .with_max_attempts(self.retry.max_attempts)
            .with_backoff(BackoffPolicy::new(
                Duration::from_secs(self.retry.backoff_step),
                Duration::from_secs(self.retry.backoff_floor),
                Duration::from_secs(self.retry.backoff_ceiling),
            ));

        Ok(SnapshotConfig::new(&self.upstream.base_url, self.endpoints.clone())?
            .with_client(client)
            .with_retry(retry))
    }
}
