//! Configuration management for monit-exporter
//!
//! Handles loading and validating configuration from YAML files, and layering
//! command-line / environment overrides on top.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use crate::cli::Cli;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Monit endpoint configuration
    #[serde(default)]
    pub monit: MonitConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Monit endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitConfig {
    /// Full URI of the XML status page
    #[serde(default = "default_scrape_uri")]
    pub scrape_uri: String,

    /// Basic auth username; credentials are only sent when this is non-empty
    #[serde(default)]
    pub user: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub ignore_ssl: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (`host:port`)
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

// Default value functions
fn default_scrape_uri() -> String {
    "http://localhost:2812/_status?format=xml&level=full".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_listen_address() -> String {
    "0.0.0.0:9388".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for MonitConfig {
    fn default() -> Self {
        Self {
            scrape_uri: default_scrape_uri(),
            user: String::new(),
            password: String::new(),
            ignore_ssl: false,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl MonitConfig {
    /// Basic auth credentials, if a username is configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.user.is_empty() {
            None
        } else {
            Some((self.user.as_str(), self.password.as_str()))
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `Config::load_or_default()` if you want fallback to defaults
    /// - Validation is deferred to `validate()` so that overrides can be applied first
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Apply command-line arguments (and the environment variables clap
    /// resolved for them) on top of the file values
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(ref address) = cli.listen_address {
            self.server.listen_address = address.clone();
        }
        if let Some(ref path) = cli.metrics_path {
            self.server.metrics_path = path.clone();
        }
        if let Some(uri) = cli.scrape_uri.as_ref().or(cli.monit_scrape_uri.as_ref()) {
            self.monit.scrape_uri = uri.clone();
        }
        if let Some(user) = cli.user.as_ref().or(cli.monit_user.as_ref()) {
            self.monit.user = user.clone();
        }
        if let Some(password) = cli.password.as_ref().or(cli.monit_password.as_ref()) {
            self.monit.password = password.clone();
        }
        if let Some(ignore_ssl) = cli.ignore_ssl {
            self.monit.ignore_ssl = ignore_ssl;
        }
        if let Some(timeout) = cli.timeout {
            self.monit.timeout_ms = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        let path = &self.server.metrics_path;
        if !path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }
        if path.contains([':', '*', '{', '}']) {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' must not contain route captures or wildcards",
                path
            )));
        }
        if path == "/" || path == "/health" {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' conflicts with a built-in endpoint",
                path
            )));
        }

        let uri = url::Url::parse(&self.monit.scrape_uri).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid scrape_uri '{}': {}",
                self.monit.scrape_uri, e
            ))
        })?;
        if !matches!(uri.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "scrape_uri must use http or https, got '{}'",
                uri.scheme()
            )));
        }

        if self.monit.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = &self.server.listen_address;
        // "localhost" is not a valid IP literal; map it to loopback
        let resolved = match address.strip_prefix("localhost:") {
            Some(port) => format!("127.0.0.1:{}", port),
            None => address.clone(),
        };
        resolved.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid listen_address '{}': {}. Use host:port (e.g., '0.0.0.0:9388').",
                address, e
            ))
        })
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.monit.password.is_empty() {
            config.monit.password = "********".to_string();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.listen_address, "0.0.0.0:9388");
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(
            config.monit.scrape_uri,
            "http://localhost:2812/_status?format=xml&level=full"
        );
        assert!(!config.monit.ignore_ssl);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
monit:
  user: admin
"#,
        )
        .unwrap();
        assert_eq!(config.monit.user, "admin");
        assert_eq!(config.monit.timeout_ms, 5000);
        assert_eq!(config.server.metrics_path, "/metrics");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.server.metrics_path = "metrics".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.metrics_path = "/health".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.listen_address = "not-an-address".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.monit.scrape_uri = "ftp://localhost/_status".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.monit.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metrics_path_rejects_route_syntax() {
        for path in ["/*", "/*rest", "/:x", "/metrics/:id", "/{x}"] {
            let mut config = Config::default();
            config.server.metrics_path = path.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::ValidationError(_))),
                "{} should be rejected",
                path
            );
        }

        let mut config = Config::default();
        config.server.metrics_path = "/monit/metrics".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_localhost_listen_address() {
        let mut config = Config::default();
        config.server.listen_address = "localhost:9388".to_string();
        let addr = config.listen_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9388);
    }

    #[test]
    fn test_credentials() {
        let mut config = MonitConfig::default();
        assert!(config.credentials().is_none());

        config.user = "admin".to_string();
        assert_eq!(config.credentials(), Some(("admin", "")));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = Config::default();
        config.monit.user = "from-file".to_string();

        let cli = Cli::parse_from([
            "monit-exporter",
            "--user",
            "from-cli",
            "--listen-address",
            "127.0.0.1:9999",
            "--ignore-ssl",
            "true",
        ]);
        config.apply_overrides(&cli);

        assert_eq!(config.monit.user, "from-cli");
        assert_eq!(config.server.listen_address, "127.0.0.1:9999");
        assert!(config.monit.ignore_ssl);
        // untouched values keep their file/default value
        assert_eq!(config.server.metrics_path, "/metrics");
    }

    #[test]
    fn test_legacy_monit_names_are_fallbacks() {
        let cli = Cli::parse_from([
            "monit-exporter",
            "--monit-user",
            "legacy",
            "--monit-password",
            "old-secret",
            "--password",
            "new-secret",
        ]);
        let mut config = Config::default();
        config.apply_overrides(&cli);

        assert_eq!(config.monit.user, "legacy");
        assert_eq!(config.monit.password, "new-secret");
    }

    #[test]
    fn test_redacted_hides_password() {
        let mut config = Config::default();
        config.monit.password = "secret".to_string();
        assert_eq!(config.redacted().monit.password, "********");
        assert_eq!(config.monit.password, "secret");
    }
}
