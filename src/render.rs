//! Render sink interface and the console sink used by the binary

use crate::errors::Result;
use crate::models::{
    Connection, LogEntry, MetricsSnapshot, Section, Tool, format_duration, format_uptime,
};
use crate::source::DataOrigin;

use async_trait::async_trait;
use std::io::Write;

/// Finished, already filtered data for one section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    Dashboard(MetricsSnapshot),
    Health(MetricsSnapshot),
    Connections(Vec<Connection>),
    Tools(Vec<Tool>),
    Logs(Vec<LogEntry>),
}

impl SectionView {
    pub fn section(&self) -> Section {
        match self {
            SectionView::Dashboard(_) => Section::Dashboard,
            SectionView::Health(_) => Section::Health,
            SectionView::Connections(_) => Section::Connections,
            SectionView::Tools(_) => Section::Tools,
            SectionView::Logs(_) => Section::Logs,
        }
    }
}

/// Draws a finished section. Implementations never see fetch or fallback logic.
#[async_trait]
pub trait RenderSink: Send + Sync {
    async fn render(&self, view: &SectionView, origin: DataOrigin) -> Result<()>;
}

/// Plain-text sink writing each section to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderSink for ConsoleSink {
    async fn render(&self, view: &SectionView, origin: DataOrigin) -> Result<()> {
        let text = render_text(view, origin);
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Text layout of a section
pub fn render_text(view: &SectionView, origin: DataOrigin) -> String {
    let mut out = format!("== {} ({}) ==\n", view.section(), origin);

    match view {
        SectionView::Dashboard(m) => {
            out.push_str(&format!(
                "server: {:?}  uptime: {}  connections: {}/{}\n",
                m.server_status,
                format_uptime(m.uptime_hours),
                m.active_connections,
                m.total_connections
            ));
            out.push_str(&format!(
                "requests: {} ({} ok, {} failed, {:.1}% success)  avg: {:.0}ms  tools: {}\n",
                m.total_requests,
                m.successful_requests,
                m.failed_requests,
                m.success_rate(),
                m.average_response_time,
                m.tools_available
            ));
        }
        SectionView::Health(m) => {
            out.push_str(&format!(
                "server: {:?}  redis: {:?} ({:.1}ms)  avg response: {:.0}ms\n",
                m.server_status, m.redis_status, m.redis_latency, m.average_response_time
            ));
        }
        SectionView::Connections(conns) => {
            for conn in conns {
                out.push_str(&format!(
                    "{:<12} {:<13} {:>8}  {}  [{}]\n",
                    conn.id,
                    conn.status,
                    format_duration(conn.duration_seconds),
                    conn.connected_at.format("%Y-%m-%d %H:%M:%S"),
                    conn.tools_used.join(", ")
                ));
            }
        }
        SectionView::Tools(tools) => {
            for tool in tools {
                out.push_str(&format!(
                    "{:<18} {:>8} calls {:>6.1}% {:>7.0}ms  {}\n",
                    tool.name,
                    tool.call_count,
                    tool.success_rate,
                    tool.avg_response_time,
                    tool.description
                ));
            }
        }
        SectionView::Logs(logs) => {
            for entry in logs {
                out.push_str(&format!(
                    "{} {:<8} {}\n",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.level,
                    entry.message
                ));
            }
        }
    }

    out
}
