//! Data source adapter: live backend fetch with sample-data fallback

use crate::config::DashboardConfig;
use crate::errors::{DashboardError, Result};
use crate::mock;
use crate::models::{MetricsSnapshot, ResourceData, ResourceKind};
use crate::transport::{FetchStats, FetchStatsSnapshot, HttpTransport, ProbeResult};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Where a value handed to the dispatcher came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Mock,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Live => write!(f, "live"),
            DataOrigin::Mock => write!(f, "mock"),
        }
    }
}

/// A value tagged with the path that produced it
#[derive(Clone, Debug, PartialEq)]
pub struct Sourced<T> {
    pub source: DataOrigin,
    pub value: T,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self { source: DataOrigin::Live, value }
    }

    pub fn mock(value: T) -> Self {
        Self { source: DataOrigin::Mock, value }
    }
}

/// Resolves each resource to either a live fetch or the built-in sample data.
///
/// `fetch_resource` never fails: demo mode short-circuits to sample data,
/// and any live failure is logged and replaced by sample data.
#[derive(Debug)]
pub struct DataSource {
    transport: HttpTransport,
    stats: FetchStats,
}

impl DataSource {
    pub fn new(http_timeout: Duration) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(http_timeout)?,
            stats: FetchStats::new(),
        })
    }

    pub async fn fetch_resource(
        &self,
        kind: ResourceKind,
        config: &DashboardConfig,
    ) -> Sourced<ResourceData> {
        if config.demo_mode {
            debug!(resource = %kind, "Demo mode, serving sample data");
            return Sourced::mock(mock::resource(kind));
        }

        let start = Instant::now();
        match self.fetch_live(kind, &config.endpoint).await {
            Ok(value) => {
                self.stats.record_live(start.elapsed()).await;
                Sourced::live(value)
            }
            Err(e) => {
                warn!(
                    resource = %kind,
                    endpoint = %config.endpoint,
                    error = %e,
                    "Live fetch failed, falling back to sample data"
                );
                self.stats.record_fallback().await;
                Sourced::mock(mock::resource(kind))
            }
        }
    }

    async fn fetch_live(&self, kind: ResourceKind, endpoint: &str) -> Result<ResourceData> {
        let body = self.transport.get_json(endpoint, &kind.path()).await?;
        decode_resource(kind, body)
    }

    /// Connectivity test against a candidate endpoint; never falls back.
    pub async fn probe(&self, endpoint: &str) -> ProbeResult {
        self.transport.probe(endpoint).await
    }

    pub async fn stats(&self) -> FetchStatsSnapshot {
        self.stats.snapshot().await
    }
}

/// Decode a backend body into the payload for `kind`
pub fn decode_resource(kind: ResourceKind, body: Value) -> Result<ResourceData> {
    match kind {
        ResourceKind::Metrics => {
            let metrics: MetricsSnapshot = serde_json::from_value(body)?;
            if !metrics.is_consistent() {
                return Err(DashboardError::InvalidPayload(format!(
                    "inconsistent request counts: {} successful + {} failed > {} total",
                    metrics.successful_requests, metrics.failed_requests, metrics.total_requests
                )));
            }
            Ok(ResourceData::Metrics(metrics))
        }
        ResourceKind::Connections => Ok(ResourceData::Connections(decode_list(kind, body)?)),
        ResourceKind::Tools => Ok(ResourceData::Tools(decode_list(kind, body)?)),
        ResourceKind::Logs => Ok(ResourceData::Logs(decode_list(kind, body)?)),
    }
}

// Collections arrive either bare or wrapped as `{"<kind>": [...]}`.
fn decode_list<T: DeserializeOwned>(kind: ResourceKind, body: Value) -> Result<Vec<T>> {
    let list = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove(kind.as_str()).ok_or_else(|| {
            DashboardError::InvalidPayload(format!("missing '{}' field", kind))
        })?,
        other => {
            return Err(DashboardError::InvalidPayload(format!(
                "expected a list of {}, got {}",
                kind, other
            )));
        }
    };

    Ok(serde_json::from_value(list)?)
}
