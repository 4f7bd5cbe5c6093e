//! Dashboard application wiring store, data source, dispatcher and scheduler

use crate::config::{DashboardConfig, validate_endpoint};
use crate::console::{Command, HELP, parse_command};
use crate::dispatcher::{DispatchOutcome, SectionDispatcher};
use crate::errors::{DashboardError, Result};
use crate::models::Section;
use crate::render::RenderSink;
use crate::scheduler::{AutoRefreshScheduler, SchedulerState};
use crate::source::DataSource;
use crate::state::StateStore;
use crate::transport::ProbeResult;

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, interval};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Whether the command loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct DashboardApp {
    store: StateStore,
    dispatcher: Arc<SectionDispatcher>,
    scheduler: AutoRefreshScheduler,
    session_id: String,
}

impl DashboardApp {
    pub fn new(
        config: DashboardConfig,
        section: Section,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self> {
        config.validate().map_err(DashboardError::Config)?;

        let source = Arc::new(DataSource::new(config.http_timeout)?);
        let store = StateStore::with_section(config, section);
        let dispatcher = Arc::new(SectionDispatcher::new(source, store.clone(), sink));
        let scheduler = AutoRefreshScheduler::new(Arc::clone(&dispatcher));

        Ok(Self {
            store,
            dispatcher,
            scheduler,
            session_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Render the initial section and arm the auto-refresh timer
    pub async fn start(&mut self) -> DispatchOutcome {
        let config = self.store.config().await;
        info!(
            "Starting dashboard session {} against {} (demo mode: {})",
            self.session_id, config.endpoint, config.demo_mode
        );

        let outcome = self.dispatcher.refresh_active().await;
        self.scheduler.start(&config);
        outcome
    }

    /// One dispatch cycle for `section`, without touching navigation
    pub async fn snapshot(&self, section: Section) -> DispatchOutcome {
        self.dispatcher.refresh(section).await
    }

    pub async fn probe(&self, endpoint: &str) -> ProbeResult {
        self.dispatcher.source().probe(endpoint).await
    }

    #[instrument(skip(self))]
    pub async fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Navigate(section) => {
                self.store.navigate(section).await;
                self.dispatcher.refresh(section).await;
            }
            Command::Refresh => {
                self.dispatcher.refresh_active().await;
            }
            Command::FilterConnections(filter) => {
                self.store.set_connection_filter(filter).await;
                self.refresh_if_active(Section::Connections).await;
            }
            Command::SortTools(sort) => {
                self.store.set_tool_sort(sort).await;
                self.refresh_if_active(Section::Tools).await;
            }
            Command::LogLevel(level) => {
                self.store.set_log_level(level).await;
                self.refresh_if_active(Section::Logs).await;
            }
            Command::Search(term) => {
                self.store.set_log_search(term).await;
                self.refresh_if_active(Section::Logs).await;
            }
            Command::RefreshRate(rate) => {
                self.store.set_refresh_rate(rate).await?;
                self.scheduler.reconfigure(&self.store.config().await);
            }
            Command::AutoRefresh(enabled) => {
                self.store.set_auto_refresh(enabled).await;
                self.scheduler.reconfigure(&self.store.config().await);
            }
            Command::DemoMode(enabled) => {
                self.store.set_demo_mode(enabled).await;
                self.dispatcher.refresh_active().await;
            }
            Command::Theme(theme) => {
                self.store.set_theme(theme).await;
                println!("theme: {}", theme);
            }
            Command::Endpoint(endpoint) => {
                self.commit_endpoint(endpoint).await?;
                self.dispatcher.refresh_active().await;
            }
            Command::Probe(endpoint) => {
                let endpoint = match endpoint {
                    Some(endpoint) => endpoint,
                    None => self.store.config().await.endpoint,
                };
                let result = self.probe(&endpoint).await;
                println!("{}", serde_json::to_string(&result)?);
            }
            Command::Stats => {
                let stats = self.dispatcher.source().stats().await;
                let cache = self.store.cache().await;
                println!(
                    "fetches: {} live, {} fallback ({:.1}% live, avg {}ms); \
                     scheduler: {:?}; last updated: {}",
                    stats.live,
                    stats.fallbacks,
                    stats.live_rate,
                    stats.avg_live_ms,
                    self.scheduler.state(),
                    cache
                        .last_updated
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string())
                );
            }
            Command::Help => print!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Switch endpoints only after the candidate answers its health probe
    async fn commit_endpoint(&self, endpoint: String) -> Result<()> {
        validate_endpoint(&endpoint).map_err(DashboardError::Config)?;

        let result = self.probe(&endpoint).await;
        if !result.success {
            return Err(DashboardError::Transport(format!(
                "endpoint {} not committed: {}",
                endpoint,
                result.error.unwrap_or_else(|| "probe failed".to_string())
            )));
        }

        self.store.set_endpoint(endpoint).await
    }

    async fn refresh_if_active(&self, section: Section) {
        if self.store.active_section().await == section {
            self.dispatcher.refresh(section).await;
        }
    }

    /// Read commands from stdin until `quit` or Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        self.start().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let mut stats_interval = interval(Duration::from_secs(60));
        stats_interval.tick().await;

        loop {
            tokio::select! {
                line = lines.next_line(), if stdin_open => {
                    match line? {
                        Some(line) => {
                            if self.dispatch_line(&line).await == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            info!("Input closed, refreshing until interrupted");
                            stdin_open = false;
                        }
                    }
                }
                _ = stats_interval.tick() => {
                    self.report_stats().await;
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.map_err(|e| {
                        DashboardError::Io(std::io::Error::other(format!(
                            "Failed to wait for shutdown signal: {}",
                            e
                        )))
                    })?;
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn dispatch_line(&mut self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                println!("{}", e);
                return Flow::Continue;
            }
        };

        match self.handle(command).await {
            Ok(flow) => flow,
            Err(e) => {
                warn!("Command failed: {}", e);
                println!("{}", e);
                Flow::Continue
            }
        }
    }

    async fn report_stats(&self) {
        let stats = self.dispatcher.source().stats().await;
        info!(
            "Dashboard fetches - {} live, {} fallback ({:.1}% live), avg live latency {}ms",
            stats.live, stats.fallbacks, stats.live_rate, stats.avg_live_ms
        );
    }

    /// Stop the timer and log final fetch statistics
    pub async fn shutdown(&mut self) {
        info!("Shutting down dashboard session {}", self.session_id);
        self.scheduler.stop();
        self.report_stats().await;
    }
}
