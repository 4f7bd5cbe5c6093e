//! Application state store and refresh cache

use crate::config::{DashboardConfig, validate_endpoint};
use crate::errors::{DashboardError, Result};
use crate::filters::{ConnectionFilter, FilterState, ToolSort};
use crate::models::{
    Connection, LogEntry, LogLevel, MetricsSnapshot, ResourceData, Section, Theme, Tool,
};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration plus navigation and filter state of the running dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationState {
    pub config: DashboardConfig,
    pub active_section: Section,
    pub filters: FilterState,
}

/// Last fetched value per resource kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshCache {
    pub metrics: Option<MetricsSnapshot>,
    pub connections: Vec<Connection>,
    pub tools: Vec<Tool>,
    pub logs: Vec<LogEntry>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RefreshCache {
    /// Replace the entry for the payload's kind wholesale
    pub fn replace(&mut self, data: ResourceData) {
        match data {
            ResourceData::Metrics(metrics) => self.metrics = Some(metrics),
            ResourceData::Connections(connections) => self.connections = connections,
            ResourceData::Tools(tools) => self.tools = tools,
            ResourceData::Logs(logs) => self.logs = logs,
        }
    }
}

/// Shared handle to the single application state record.
///
/// Every mutation goes through an explicit setter. Readers take owned
/// snapshots so no lock is held across an await on the network.
#[derive(Debug, Clone)]
pub struct StateStore {
    state: Arc<RwLock<ApplicationState>>,
    cache: Arc<RwLock<RefreshCache>>,
}

impl StateStore {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_section(config, Section::default())
    }

    pub fn with_section(config: DashboardConfig, active_section: Section) -> Self {
        Self {
            state: Arc::new(RwLock::new(ApplicationState {
                config,
                active_section,
                filters: FilterState::default(),
            })),
            cache: Arc::new(RwLock::new(RefreshCache::default())),
        }
    }

    pub async fn snapshot(&self) -> ApplicationState {
        self.state.read().await.clone()
    }

    pub async fn config(&self) -> DashboardConfig {
        self.state.read().await.config.clone()
    }

    pub async fn active_section(&self) -> Section {
        self.state.read().await.active_section
    }

    pub async fn filters(&self) -> FilterState {
        self.state.read().await.filters.clone()
    }

    pub async fn navigate(&self, section: Section) {
        self.state.write().await.active_section = section;
        debug!("Active section is now {}", section);
    }

    pub async fn set_endpoint(&self, endpoint: String) -> Result<()> {
        validate_endpoint(&endpoint).map_err(DashboardError::Config)?;
        info!("Endpoint changed to {}", endpoint);
        self.state.write().await.config.endpoint = endpoint;
        Ok(())
    }

    pub async fn set_refresh_rate(&self, rate: Duration) -> Result<()> {
        if rate.is_zero() {
            return Err(DashboardError::Config(
                "refresh rate must be greater than 0".to_string(),
            ));
        }
        self.state.write().await.config.refresh_rate = rate;
        info!("Refresh rate changed to {}ms", rate.as_millis());
        Ok(())
    }

    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.state.write().await.config.auto_refresh = enabled;
        info!("Auto refresh {}", if enabled { "enabled" } else { "disabled" });
    }

    pub async fn set_demo_mode(&self, enabled: bool) {
        self.state.write().await.config.demo_mode = enabled;
        info!("Demo mode {}", if enabled { "enabled" } else { "disabled" });
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.state.write().await.config.theme = theme;
    }

    pub async fn set_connection_filter(&self, filter: ConnectionFilter) {
        self.state.write().await.filters.connections = filter;
    }

    pub async fn set_tool_sort(&self, sort: ToolSort) {
        self.state.write().await.filters.tools = sort;
    }

    pub async fn set_log_level(&self, level: Option<LogLevel>) {
        self.state.write().await.filters.logs.level = level;
    }

    pub async fn set_log_search(&self, search: String) {
        self.state.write().await.filters.logs.search = search;
    }

    /// Overwrite the cached collection for the payload's resource kind
    pub async fn store(&self, data: ResourceData) {
        let kind = data.kind();
        self.cache.write().await.replace(data);
        debug!(resource = %kind, "Refresh cache updated");
    }

    pub async fn mark_updated(&self, at: DateTime<Utc>) {
        self.cache.write().await.last_updated = Some(at);
    }

    pub async fn cache(&self) -> RefreshCache {
        self.cache.read().await.clone()
    }
}
