//! Line-oriented command surface driving the dashboard

use crate::errors::{DashboardError, Result};
use crate::filters::{ConnectionFilter, ToolSort};
use crate::models::{LogLevel, Section, Theme};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(Section),
    Refresh,
    FilterConnections(ConnectionFilter),
    SortTools(ToolSort),
    LogLevel(Option<LogLevel>),
    Search(String),
    RefreshRate(Duration),
    AutoRefresh(bool),
    DemoMode(bool),
    Theme(Theme),
    Endpoint(String),
    Probe(Option<String>),
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  nav <dashboard|health|connections|tools|logs|settings>
  refresh
  filter <all|connected|disconnected>
  sort <calls|name|success>
  level <all|DEBUG|INFO|WARNING|ERROR|CRITICAL>
  search [text]
  rate <ms>
  auto <on|off>
  demo <on|off>
  theme <light|dark|auto>
  endpoint <url>
  probe [url]
  stats
  quit
";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "nav" | "go" => Command::Navigate(required(verb, rest)?.parse()?),
        "refresh" | "r" => Command::Refresh,
        "filter" => Command::FilterConnections(required(verb, rest)?.parse()?),
        "sort" => Command::SortTools(required(verb, rest)?.parse()?),
        "level" => {
            let level = required(verb, rest)?;
            if level.eq_ignore_ascii_case("all") {
                Command::LogLevel(None)
            } else {
                Command::LogLevel(Some(parse_level(level)?))
            }
        }
        "search" => Command::Search(rest.to_string()),
        "rate" => {
            let ms = required(verb, rest)?.parse::<u64>().map_err(|_| {
                DashboardError::Command(format!("invalid refresh rate '{}'", rest))
            })?;
            Command::RefreshRate(Duration::from_millis(ms))
        }
        "auto" => Command::AutoRefresh(parse_toggle(verb, rest)?),
        "demo" => Command::DemoMode(parse_toggle(verb, rest)?),
        "theme" => Command::Theme(required(verb, rest)?.parse()?),
        "endpoint" => Command::Endpoint(required(verb, rest)?.to_string()),
        "probe" => Command::Probe((!rest.is_empty()).then(|| rest.to_string())),
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(DashboardError::Command(format!("unknown command '{}'", other)));
        }
    };

    Ok(Some(command))
}

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        return Err(DashboardError::Command(format!("'{}' needs an argument", verb)));
    }
    Ok(rest)
}

fn parse_toggle(verb: &str, rest: &str) -> Result<bool> {
    match required(verb, rest)?.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(DashboardError::Command(format!("expected on/off, got '{}'", other))),
    }
}

// Stricter than `LogLevel::from`, which maps unknown wire values to INFO.
fn parse_level(s: &str) -> Result<LogLevel> {
    match s.to_uppercase().as_str() {
        "DEBUG" | "INFO" | "WARN" | "WARNING" | "ERROR" | "CRITICAL" => Ok(LogLevel::from(s)),
        _ => Err(DashboardError::Command(format!("unknown log level '{}'", s))),
    }
}
