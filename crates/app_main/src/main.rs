//! Vebitor - Text document server for the browser editor
//!
//! Main entry point for the HTTP server.

mod app;

use anyhow::{Context, Result};
use app_core::AppConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    // Initialize logging and panic hook first
    let _log_guard = app_log::init(&config.log)?;

    let log_dir = app_log::log_dir(&config.log);
    if let Err(e) = app_log::cleanup_old_logs(&log_dir, config.log.retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Vebitor starting...");

    let service = app_core::init(&config);

    app::run(config, service).await
}

/// Load configuration from `--config <path>` or the default location
fn load_config() -> Result<AppConfig> {
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .map(PathBuf::from)
                .context("--config requires a path")?;
            return AppConfig::load_from(&path);
        }
    }

    AppConfig::load()
}
