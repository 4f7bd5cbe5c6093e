//! MCP Dashboard Library
//!
//! This library provides the refresh engine behind a monitoring dashboard for
//! an MCP server: live-or-sample data sources, filter and sort transforms, a
//! per-section dispatcher and an auto-refresh scheduler.

pub mod app;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod errors;
pub mod filters;
pub mod mock;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod state;
pub mod transport;

pub use app::{DashboardApp, Flow};
pub use config::DashboardConfig;
pub use dispatcher::{DispatchOutcome, SectionDispatcher};
pub use errors::{DashboardError, Result};
pub use models::{Connection, LogEntry, LogLevel, MetricsSnapshot, Section, Theme, Tool};
pub use render::{ConsoleSink, RenderSink, SectionView};
pub use scheduler::{AutoRefreshScheduler, SchedulerState};
pub use source::{DataOrigin, DataSource, Sourced};
pub use state::{ApplicationState, RefreshCache, StateStore};
