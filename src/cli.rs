//! CLI argument parsing for monit-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: MONIT_CONFIG)
//! - `--listen-address`: Server listen address (env: MONIT_LISTEN_ADDRESS)
//! - `--metrics-path`: Metrics endpoint path (env: MONIT_METRICS_PATH)
//! - `--scrape-uri`: Monit status URI (env: MONIT_SCRAPE_URI)
//! - `--user`: Monit basic auth username (env: MONIT_USER)
//! - `--password`: Monit basic auth password (env: MONIT_PASSWORD)
//!
//! `MONIT_MONIT_SCRAPE_URI`, `MONIT_MONIT_USER` and `MONIT_MONIT_PASSWORD`
//! are still read as fallbacks for the three Monit settings above.
//! - `--ignore-ssl`: Skip TLS certificate verification (env: MONIT_IGNORE_SSL)
//! - `--timeout`: Monit HTTP timeout in milliseconds (env: MONIT_TIMEOUT)
//! - `--validate`: Validate configuration without starting server
//! - `--dry-run`: Poll Monit once and print the metrics
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: MONIT_LOG_LEVEL)
//! - `--output-format`: Output format for validate (text/json/yaml)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// monit-exporter - Prometheus exporter for Monit
///
/// Polls the Monit XML status page on every scrape and exports the
/// service checks in Prometheus format.
///
/// Environment variables can be used for all configuration options.
/// CLI arguments take precedence over environment variables,
/// which take precedence over config file values.
#[derive(Parser, Debug)]
#[command(name = "monit-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "MONIT_CONFIG"
    )]
    pub config: PathBuf,

    /// Server listen address as host:port (overrides config file)
    #[arg(long, value_name = "ADDRESS", env = "MONIT_LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Metrics endpoint path (overrides config file)
    /// Must start with '/' and not conflict with '/' or '/health'
    #[arg(long, value_name = "PATH", env = "MONIT_METRICS_PATH")]
    pub metrics_path: Option<String>,

    /// Monit XML status URI (overrides config file)
    #[arg(long, value_name = "URI", env = "MONIT_SCRAPE_URI")]
    pub scrape_uri: Option<String>,

    /// Monit basic auth username (overrides config file)
    #[arg(long, value_name = "USER", env = "MONIT_USER")]
    pub user: Option<String>,

    /// Monit basic auth password (overrides config file)
    #[arg(long, value_name = "PASSWORD", env = "MONIT_PASSWORD")]
    pub password: Option<String>,

    /// Older environment names of the Monit settings, used only when the
    /// current name is unset
    #[arg(long, hide = true, env = "MONIT_MONIT_SCRAPE_URI")]
    pub monit_scrape_uri: Option<String>,

    #[arg(long, hide = true, env = "MONIT_MONIT_USER")]
    pub monit_user: Option<String>,

    #[arg(long, hide = true, env = "MONIT_MONIT_PASSWORD")]
    pub monit_password: Option<String>,

    /// Skip TLS certificate verification towards Monit (overrides config file)
    #[arg(long, value_name = "BOOL", env = "MONIT_IGNORE_SSL")]
    pub ignore_ssl: Option<bool>,

    /// Monit HTTP timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "MONIT_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Validate configuration without starting server
    #[arg(long)]
    pub validate: bool,

    /// Poll Monit once, print the metrics and exit
    #[arg(long, conflicts_with = "validate")]
    pub dry_run: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "MONIT_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Output format for --validate
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output format options for validate mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}
