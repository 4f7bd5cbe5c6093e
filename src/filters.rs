//! Filter and sort transforms applied to cached collections before render

use crate::errors::DashboardError;
use crate::models::{Connection, ConnectionStatus, LogEntry, LogLevel, Tool};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionFilter {
    #[default]
    All,
    Status(ConnectionStatus),
}

impl FromStr for ConnectionFilter {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ConnectionFilter::All);
        }
        s.parse().map(ConnectionFilter::Status)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolSort {
    /// Call count, highest first
    #[default]
    Calls,
    /// Name, lexicographic
    Name,
    /// Success rate, highest first
    Success,
}

impl FromStr for ToolSort {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calls" => Ok(ToolSort::Calls),
            "name" => Ok(ToolSort::Name),
            "success" => Ok(ToolSort::Success),
            other => Err(DashboardError::Command(format!("unknown tool sort '{}'", other))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// `None` keeps every level
    pub level: Option<LogLevel>,
    /// Case-insensitive substring, empty matches everything
    pub search: String,
}

/// Current filter state of the connections, tools and logs sections
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub connections: ConnectionFilter,
    pub tools: ToolSort,
    pub logs: LogFilter,
}

pub fn filter_connections(connections: &[Connection], filter: ConnectionFilter) -> Vec<Connection> {
    connections
        .iter()
        .filter(|conn| match filter {
            ConnectionFilter::All => true,
            ConnectionFilter::Status(status) => conn.status == status,
        })
        .cloned()
        .collect()
}

/// Stable sort; equal keys keep their input order.
pub fn sort_tools(tools: &[Tool], sort: ToolSort) -> Vec<Tool> {
    let mut sorted = tools.to_vec();
    match sort {
        ToolSort::Calls => sorted.sort_by(|a, b| b.call_count.cmp(&a.call_count)),
        ToolSort::Name => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        ToolSort::Success => sorted.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate)),
    }
    sorted
}

pub fn filter_logs(logs: &[LogEntry], filter: &LogFilter) -> Vec<LogEntry> {
    let needle = filter.search.to_lowercase();
    logs.iter()
        .filter(|entry| filter.level.is_none_or(|level| entry.level == level))
        .filter(|entry| needle.is_empty() || entry.message.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
