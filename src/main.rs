//! MCP Dashboard Binary

use clap::{Parser, Subcommand};
use mcp_dashboard::{ConsoleSink, DashboardApp, DashboardConfig, Result, Section, Theme};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "mcp_dashboard",
    version,
    about = "Terminal monitoring dashboard for an MCP server"
)]
struct Cli {
    /// Base URL of the monitored service
    #[arg(long)]
    endpoint: Option<String>,

    /// Auto-refresh period in milliseconds
    #[arg(long)]
    refresh_rate_ms: Option<u64>,

    /// Disable the auto-refresh timer
    #[arg(long)]
    no_auto_refresh: bool,

    /// Serve built-in sample data instead of calling the backend
    #[arg(long)]
    demo: bool,

    #[arg(long)]
    theme: Option<Theme>,

    /// Section shown at startup
    #[arg(long, default_value = "dashboard")]
    section: Section,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Interactive dashboard driven by stdin commands (default)
    Run,
    /// Refresh one section once and exit
    Snapshot,
    /// Test connectivity to an endpoint
    Probe { endpoint: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let cli = Cli::parse();
    info!("Starting MCP dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = apply_overrides(DashboardConfig::from_env(), &cli);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Dashboard configuration - Endpoint: {}, Refresh: {}ms, Auto refresh: {}, \
         Demo mode: {}, Theme: {}",
        config.endpoint,
        config.refresh_rate.as_millis(),
        config.auto_refresh,
        config.demo_mode,
        config.theme
    );

    let mut app = DashboardApp::new(config, cli.section, Arc::new(ConsoleSink::new()))?;

    match cli.mode.unwrap_or(Mode::Run) {
        Mode::Run => {
            println!("type 'help' for commands");
            if let Err(e) = app.run().await {
                error!("Dashboard failed: {}", e);
                std::process::exit(1);
            }
        }
        Mode::Snapshot => {
            let outcome = app.snapshot(cli.section).await;
            if !outcome.rendered && cli.section != Section::Settings {
                std::process::exit(1);
            }
        }
        Mode::Probe { endpoint } => {
            let result = app.probe(&endpoint).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn apply_overrides(mut config: DashboardConfig, cli: &Cli) -> DashboardConfig {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(ms) = cli.refresh_rate_ms {
        config.refresh_rate = Duration::from_millis(ms);
    }
    if cli.no_auto_refresh {
        config.auto_refresh = false;
    }
    if cli.demo {
        config.demo_mode = true;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config
}

/// Initialize structured logging on stderr; stdout carries the dashboard view
fn initialize_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
