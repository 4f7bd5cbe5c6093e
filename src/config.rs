//! Configuration management for the dashboard

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::models::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the monitored service
    pub endpoint: String,

    /// Period of the auto-refresh timer
    pub refresh_rate: Duration,

    /// Whether the auto-refresh timer runs at all
    pub auto_refresh: bool,

    /// Serve built-in sample data and never touch the network
    pub demo_mode: bool,

    /// UI theme preference
    pub theme: Theme,

    /// HTTP timeout for backend requests
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            refresh_rate: Duration::from_millis(5000),
            auto_refresh: true,
            demo_mode: false,
            theme: Theme::Auto,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = DashboardConfig::default();

        if let Ok(endpoint) = env::var("DASHBOARD_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(rate) = env::var("REFRESH_RATE_MS") {
            if let Ok(ms) = rate.parse::<u64>() {
                config.refresh_rate = Duration::from_millis(ms);
            }
        }

        if let Ok(auto_refresh) = env::var("AUTO_REFRESH") {
            config.auto_refresh = auto_refresh.to_lowercase() == "true";
        }

        if let Ok(demo_mode) = env::var("DEMO_MODE") {
            config.demo_mode = demo_mode.to_lowercase() == "true";
        }

        if let Ok(theme) = env::var("DASHBOARD_THEME") {
            if let Ok(theme) = theme.parse() {
                config.theme = theme;
            }
        }

        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_endpoint(&self.endpoint)?;

        if self.refresh_rate.is_zero() {
            return Err("refresh_rate must be greater than 0".to_string());
        }

        if self.http_timeout.is_zero() {
            return Err("http_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Endpoints must be non-empty http(s) base URLs
pub fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    if endpoint.is_empty() {
        return Err("endpoint cannot be empty".to_string());
    }

    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(format!("endpoint must start with http:// or https://: {}", endpoint));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_rate, Duration::from_millis(5000));
        assert!(config.auto_refresh);
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DashboardConfig::default();
        config.refresh_rate = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.endpoint = String::new();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.endpoint = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }
}
