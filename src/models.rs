//! Dashboard data structures and formatting helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::DashboardError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RedisStatus {
    Connected,
    Disconnected,
}

/// Point-in-time server metrics as served by `/api/metrics`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    pub server_status: ServerStatus,
    pub uptime_hours: f64,
    pub total_connections: u64,
    pub active_connections: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: f64,
    pub tools_available: u32,
    pub redis_status: RedisStatus,
    pub redis_latency: f64,
}

impl MetricsSnapshot {
    /// Successful and failed requests must never exceed the total.
    pub fn is_consistent(&self) -> bool {
        self.successful_requests
            .checked_add(self.failed_requests)
            .is_some_and(|sum| sum <= self.total_requests)
            && self.average_response_time >= 0.0
            && self.redis_latency >= 0.0
            && self.uptime_hours >= 0.0
    }

    /// Percentage of requests that succeeded, 0 when nothing was served yet
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        (self.successful_requests as f64 / self.total_requests as f64) * 100.0
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "connected" => Ok(ConnectionStatus::Connected),
            "disconnected" => Ok(ConnectionStatus::Disconnected),
            other => Err(DashboardError::Command(format!(
                "unknown connection status '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub id: String,
    pub connected_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub tools_used: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub call_count: u64,
    pub success_rate: f64,
    pub avg_response_time: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "DEBUG" | "TRACE" => LogLevel::Debug,
            "INFO" | "INFORMATION" => LogLevel::Info,
            "WARN" | "WARNING" => LogLevel::Warning,
            "ERROR" | "ERR" => LogLevel::Error,
            "CRITICAL" | "FATAL" => LogLevel::Critical,
            _ => LogLevel::Info, // Default fallback
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        LogLevel::from(s.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Backend resources the dashboard knows how to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Metrics,
    Connections,
    Tools,
    Logs,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Metrics => "metrics",
            ResourceKind::Connections => "connections",
            ResourceKind::Tools => "tools",
            ResourceKind::Logs => "logs",
        }
    }

    /// Path relative to the configured endpoint
    pub fn path(&self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetched payload for one resource kind
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceData {
    Metrics(MetricsSnapshot),
    Connections(Vec<Connection>),
    Tools(Vec<Tool>),
    Logs(Vec<LogEntry>),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Metrics(_) => ResourceKind::Metrics,
            ResourceData::Connections(_) => ResourceKind::Connections,
            ResourceData::Tools(_) => ResourceKind::Tools,
            ResourceData::Logs(_) => ResourceKind::Logs,
        }
    }
}

/// Top-level views of the dashboard
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Health,
    Connections,
    Tools,
    Logs,
    Settings,
}

impl Section {
    /// The resource a section refreshes; settings has none.
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Section::Dashboard | Section::Health => Some(ResourceKind::Metrics),
            Section::Connections => Some(ResourceKind::Connections),
            Section::Tools => Some(ResourceKind::Tools),
            Section::Logs => Some(ResourceKind::Logs),
            Section::Settings => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Dashboard => "dashboard",
            Section::Health => "health",
            Section::Connections => "connections",
            Section::Tools => "tools",
            Section::Logs => "logs",
            Section::Settings => "settings",
        };
        f.write_str(name)
    }
}

impl FromStr for Section {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" => Ok(Section::Dashboard),
            "health" => Ok(Section::Health),
            "connections" => Ok(Section::Connections),
            "tools" => Ok(Section::Tools),
            "logs" => Ok(Section::Logs),
            "settings" => Ok(Section::Settings),
            other => Err(DashboardError::Command(format!("unknown section '{}'", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for Theme {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(DashboardError::Config(format!("unknown theme '{}'", other))),
        }
    }
}

/// Render a duration in seconds as `1h 0m`, `2m 5s` or `45s`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Render fractional uptime hours as days and hours
pub fn format_uptime(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0h".to_string();
    }
    let whole = hours.floor() as u64;
    let days = whole / 24;
    let rest = whole % 24;
    if days > 0 {
        format!("{}d {}h", days, rest)
    } else {
        format!("{:.1}h", hours)
    }
}

/// Build a UTC timestamp from seconds since the Unix epoch
pub fn timestamp_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: u64, ok: u64, failed: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            server_status: ServerStatus::Online,
            uptime_hours: 1.0,
            total_connections: 0,
            active_connections: 0,
            total_requests: total,
            successful_requests: ok,
            failed_requests: failed,
            average_response_time: 10.0,
            tools_available: 1,
            redis_status: RedisStatus::Connected,
            redis_latency: 1.0,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(7325), "2h 2m");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0.0), "0h");
        assert_eq!(format_uptime(5.5), "5.5h");
        assert_eq!(format_uptime(72.5), "3d 0h");
    }

    #[test]
    fn test_metrics_consistency() {
        assert!(snapshot(10, 7, 3).is_consistent());
        assert!(snapshot(10, 5, 3).is_consistent());
        assert!(!snapshot(10, 8, 3).is_consistent());
        assert!(!snapshot(0, u64::MAX, 1).is_consistent());
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(snapshot(0, 0, 0).success_rate(), 0.0);
        assert_eq!(snapshot(200, 150, 50).success_rate(), 75.0);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from("warn"), LogLevel::Warning);
        assert_eq!(LogLevel::from("error"), LogLevel::Error);
        assert_eq!(LogLevel::from("unknown"), LogLevel::Info);
    }

    #[test]
    fn test_log_entry_wire_format() {
        let json = r#"{"timestamp":"2024-01-15T10:30:00Z","level":"WARN","message":"slow"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.level, LogLevel::Warning);

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["level"], "WARNING");
    }

    #[test]
    fn test_section_resources() {
        assert_eq!(Section::Dashboard.resource(), Some(ResourceKind::Metrics));
        assert_eq!(Section::Health.resource(), Some(ResourceKind::Metrics));
        assert_eq!(Section::Logs.resource(), Some(ResourceKind::Logs));
        assert_eq!(Section::Settings.resource(), None);
        assert_eq!("Tools".parse::<Section>().unwrap(), Section::Tools);
        assert!("nowhere".parse::<Section>().is_err());
    }
}
