//! monit-exporter - Prometheus exporter for Monit
//!
//! This binary provides a Prometheus-compatible metrics endpoint
//! that polls the Monit XML status page on every scrape.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use monit_exporter::{
    cli::{Cli, OutputFormat},
    config::Config,
    exporter::Exporter,
    server,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    monit_exporter::init_logging(&cli.log_level.to_string())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting monit-exporter"
    );

    // Load configuration, then layer CLI and environment on top
    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_overrides(&cli);
    config.validate()?;

    if cli.validate {
        print_config(&config, cli.output_format)?;
        return Ok(());
    }

    if cli.dry_run {
        return dry_run(&config).await;
    }

    // Start server
    server::run(config).await?;

    Ok(())
}

/// Print the resolved configuration with secrets redacted
fn print_config(config: &Config, format: OutputFormat) -> Result<()> {
    let config = config.redacted();

    match format {
        OutputFormat::Text => {
            println!("Configuration is valid");
            println!();
            println!("monit:");
            println!("  scrape_uri: {}", config.monit.scrape_uri);
            println!("  user: {}", config.monit.user);
            println!("  password: {}", config.monit.password);
            println!("  ignore_ssl: {}", config.monit.ignore_ssl);
            println!("  timeout_ms: {}", config.monit.timeout_ms);
            println!("server:");
            println!("  listen_address: {}", config.server.listen_address);
            println!("  metrics_path: {}", config.server.metrics_path);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
    }

    Ok(())
}

/// Poll Monit once and print the exposition text
async fn dry_run(config: &Config) -> Result<()> {
    let exporter = Exporter::from_config(&config.monit)?;

    let snapshot = exporter.scrape().await?;
    print!("{}", exporter.render(&snapshot));

    Ok(())
}
