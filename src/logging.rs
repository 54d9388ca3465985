//! # Logging
//!
//! `tracing` subscriber setup for the `canvasgen` binary and for embedders.
//!
//! ## Environment Variables
//!
//! - `CANVASGEN_LOG_LEVEL`: `trace` | `debug` | `info` | `warn` | `error` (default `info`)
//! - `CANVASGEN_LOG_FORMAT`: `json` | `pretty` (default `pretty`)
//! - `CANVASGEN_LOG_TARGET_FILTER`: extra comma-separated filter directives
//! - `CANVASGEN_LOG_INCLUDE_LOCATION`: `true` to print file and line
//!
//! `RUST_LOG`, when set, replaces the level. Logs go to stderr so that
//! `canvasgen preview` output on stdout stays machine-readable.

use anyhow::Context;
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for collection, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        LogConfig {
            log_level: var("CANVASGEN_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: var("CANVASGEN_LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.format),
            target_filter: var("CANVASGEN_LOG_TARGET_FILTER").filter(|f| !f.trim().is_empty()),
            include_location: var("CANVASGEN_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Raise the level to `debug` (`-v`) or `trace` (`-vv`).
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        match verbose {
            0 => {}
            1 => self.log_level = "debug".to_string(),
            _ => self.log_level = "trace".to_string(),
        }
        self
    }

    fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(targets) = &self.target_filter {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

/// Install a global subscriber for `config`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_from_lookup_values() {
        let config = LogConfig::from_lookup(|key| match key {
            "CANVASGEN_LOG_LEVEL" => Some("warn".to_string()),
            "CANVASGEN_LOG_FORMAT" => Some("json".to_string()),
            "CANVASGEN_LOG_TARGET_FILTER" => Some("canvasgen::render=trace".to_string()),
            "CANVASGEN_LOG_INCLUDE_LOCATION" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(config.level(), Level::WARN);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.target_filter.as_deref(), Some("canvasgen::render=trace"));
        assert!(config.include_location);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(LogConfig::default().with_verbosity(1).level(), Level::DEBUG);
        assert_eq!(LogConfig::default().with_verbosity(3).level(), Level::TRACE);
        assert_eq!(LogConfig::default().with_verbosity(0).level(), Level::INFO);
    }
}
