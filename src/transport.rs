//! HTTP transport layer for reading dashboard resources from the backend

use crate::errors::{DashboardError, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// HTTP transport for backend resources
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("mcp_dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            client,
            timeout: http_timeout,
        })
    }

    /// GET `{endpoint}{path}` and decode the body as JSON
    pub async fn get_json(&self, endpoint: &str, path: &str) -> Result<Value> {
        let url = join_url(endpoint, path);
        debug!("Fetching {}", url);

        let response = timeout(self.timeout, self.client.get(&url).send())
            .await
            .map_err(|_| DashboardError::Transport(format!("Request to {} timed out", url)))?
            .map_err(DashboardError::Http)?;

        let response = self.check_status(response, &url).await?;
        let body: Value = response.json().await.map_err(DashboardError::Http)?;
        Ok(body)
    }

    async fn check_status(&self, response: Response, url: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        let error_message = match status.as_u16() {
            401 | 403 => format!("Access denied for {}: {}", url, error_body),
            404 => format!("Resource not found at {}: {}", url, error_body),
            429 => format!("Rate limited at {}: {}", url, error_body),
            500..=599 => format!("Server error {} at {}: {}", status, url, error_body),
            _ => format!("Unexpected response {} at {}: {}", status, url, error_body),
        };

        Err(DashboardError::Transport(error_message))
    }

    /// Probe `{endpoint}/health`, timing the round trip.
    ///
    /// Failures are reported in the result rather than replaced by sample
    /// data: the caller wants to know whether the endpoint really answers.
    pub async fn probe(&self, endpoint: &str) -> ProbeResult {
        let url = join_url(endpoint, "/health");
        debug!("Probing {}", url);

        let start = Instant::now();
        let response = timeout(self.timeout, self.client.get(&url).send()).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let response = match response {
            Err(_) => {
                return ProbeResult::failed(Some(elapsed_ms), "Health check timeout".to_string());
            }
            Ok(Err(e)) => return ProbeResult::failed(Some(elapsed_ms), e.to_string()),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeResult::failed(Some(elapsed_ms), format!("HTTP {}", status));
        }

        let data = response.json::<Value>().await.ok();

        info!("Probe of {} succeeded in {}ms", url, elapsed_ms);

        ProbeResult {
            success: true,
            response_time_ms: Some(elapsed_ms),
            data,
            error: None,
        }
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

/// Outcome of a user-initiated connectivity test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub success: bool,
    pub response_time_ms: Option<u64>,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl ProbeResult {
    fn failed(response_time_ms: Option<u64>, error: String) -> Self {
        warn!("Connectivity probe failed: {}", error);
        Self {
            success: false,
            response_time_ms,
            data: None,
            error: Some(error),
        }
    }
}

/// Live-versus-fallback counters for the data source
#[derive(Debug)]
pub struct FetchStats {
    live: RwLock<u64>,
    fallbacks: RwLock<u64>,
    live_duration: RwLock<Duration>,
}

impl FetchStats {
    pub fn new() -> Self {
        Self {
            live: RwLock::new(0),
            fallbacks: RwLock::new(0),
            live_duration: RwLock::new(Duration::ZERO),
        }
    }

    pub async fn record_live(&self, duration: Duration) {
        *self.live.write().await += 1;
        *self.live_duration.write().await += duration;
    }

    pub async fn record_fallback(&self) {
        *self.fallbacks.write().await += 1;
    }

    pub async fn snapshot(&self) -> FetchStatsSnapshot {
        let live = *self.live.read().await;
        let fallbacks = *self.fallbacks.read().await;
        let live_duration = *self.live_duration.read().await;

        let attempts = live + fallbacks;
        let live_rate = if attempts > 0 {
            (live as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        let avg_live_ms = if live > 0 {
            live_duration.as_millis() as u64 / live
        } else {
            0
        };

        FetchStatsSnapshot {
            live,
            fallbacks,
            live_rate,
            avg_live_ms,
        }
    }
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fetch statistics
#[derive(Debug, Clone, PartialEq)]
pub struct FetchStatsSnapshot {
    pub live: u64,
    pub fallbacks: u64,
    pub live_rate: f64,
    pub avg_live_ms: u64,
}
