//! Error types for the dashboard engine

use std::fmt;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub enum DashboardError {
    /// Reading console input failed
    Io(std::io::Error),

    /// The HTTP client could not complete a request
    Http(reqwest::Error),

    /// A body was not the JSON the dashboard expects
    Json(serde_json::Error),

    /// A setting was rejected before being applied
    Config(String),

    /// Backend request timed out or returned a non-success status
    Transport(String),

    /// Backend answered with data the dashboard refuses to show
    InvalidPayload(String),

    /// A render sink failed to draw a section
    Render(String),

    /// Unrecognized or malformed console command
    Command(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Io(err) => write!(f, "console input failed: {}", err),
            DashboardError::Http(err) => write!(f, "could not reach backend: {}", err),
            DashboardError::Json(err) => write!(f, "malformed backend data: {}", err),
            DashboardError::Config(msg) => write!(f, "invalid dashboard setting: {}", msg),
            DashboardError::Transport(msg) => write!(f, "backend request failed: {}", msg),
            DashboardError::InvalidPayload(msg) => write!(f, "rejected backend data: {}", msg),
            DashboardError::Render(msg) => write!(f, "section not drawn: {}", msg),
            DashboardError::Command(msg) => write!(f, "{}; type 'help' for commands", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Io(err) => Some(err),
            DashboardError::Http(err) => Some(err),
            DashboardError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Json(err)
    }
}
