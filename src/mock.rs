//! Built-in sample data served in demo mode and whenever a live fetch fails

use crate::models::{
    Connection, ConnectionStatus, LogEntry, LogLevel, MetricsSnapshot, RedisStatus,
    ResourceData, ResourceKind, ServerStatus, Tool, timestamp_from_secs,
};

// 2024-01-15T10:30:00Z
const BASE_TIMESTAMP: i64 = 1_705_314_600;

pub fn metrics() -> MetricsSnapshot {
    MetricsSnapshot {
        server_status: ServerStatus::Online,
        uptime_hours: 72.5,
        total_connections: 156,
        active_connections: 2,
        total_requests: 15_420,
        successful_requests: 15_102,
        failed_requests: 318,
        average_response_time: 245.0,
        tools_available: 4,
        redis_status: RedisStatus::Connected,
        redis_latency: 2.3,
    }
}

pub fn connections() -> Vec<Connection> {
    vec![
        Connection {
            id: "conn_001".to_string(),
            connected_at: timestamp_from_secs(BASE_TIMESTAMP),
            duration_seconds: 3600,
            status: ConnectionStatus::Connected,
            tools_used: vec!["tavily_search".to_string(), "tavily_extract".to_string()],
        },
        Connection {
            id: "conn_002".to_string(),
            connected_at: timestamp_from_secs(BASE_TIMESTAMP + 900),
            duration_seconds: 125,
            status: ConnectionStatus::Disconnected,
            tools_used: vec!["tavily_search".to_string()],
        },
        Connection {
            id: "conn_003".to_string(),
            connected_at: timestamp_from_secs(BASE_TIMESTAMP + 3555),
            duration_seconds: 45,
            status: ConnectionStatus::Connected,
            tools_used: Vec::new(),
        },
    ]
}

pub fn tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "tavily_search".to_string(),
            description: "Search the web for current information".to_string(),
            call_count: 8_542,
            success_rate: 98.2,
            avg_response_time: 1_250.0,
        },
        Tool {
            name: "tavily_extract".to_string(),
            description: "Extract content from a list of URLs".to_string(),
            call_count: 3_211,
            success_rate: 96.8,
            avg_response_time: 2_100.0,
        },
        Tool {
            name: "tavily_crawl".to_string(),
            description: "Crawl a site starting from a base URL".to_string(),
            call_count: 1_024,
            success_rate: 94.5,
            avg_response_time: 4_800.0,
        },
        Tool {
            name: "tavily_map".to_string(),
            description: "Map the structure of a website".to_string(),
            call_count: 640,
            success_rate: 99.1,
            avg_response_time: 1_900.0,
        },
    ]
}

pub fn logs() -> Vec<LogEntry> {
    vec![
        LogEntry {
            timestamp: timestamp_from_secs(BASE_TIMESTAMP + 3600),
            level: LogLevel::Info,
            message: "Server started successfully".to_string(),
        },
        LogEntry {
            timestamp: timestamp_from_secs(BASE_TIMESTAMP + 3615),
            level: LogLevel::Info,
            message: "New connection established: conn_003".to_string(),
        },
        LogEntry {
            timestamp: timestamp_from_secs(BASE_TIMESTAMP + 3630),
            level: LogLevel::Warning,
            message: "High response time detected: 1200ms".to_string(),
        },
        LogEntry {
            timestamp: timestamp_from_secs(BASE_TIMESTAMP + 3645),
            level: LogLevel::Error,
            message: "Tool execution failed: tavily_crawl timeout".to_string(),
        },
    ]
}

/// Sample value for a resource kind
pub fn resource(kind: ResourceKind) -> ResourceData {
    match kind {
        ResourceKind::Metrics => ResourceData::Metrics(metrics()),
        ResourceKind::Connections => ResourceData::Connections(connections()),
        ResourceKind::Tools => ResourceData::Tools(tools()),
        ResourceKind::Logs => ResourceData::Logs(logs()),
    }
}
