//! Vebitor Logging & Observability Module
//!
//! Provides structured logging, log retention and crash reports.

mod panic_hook;
mod logging;

pub use panic_hook::init_panic_hook;
pub use logging::{init_logging, cleanup_old_logs};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// `[log]` section of the application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// Log directory; platform data dir when unset
    pub dir: Option<PathBuf>,
    /// Delete log files older than this many days at startup
    pub retention_days: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            retention_days: 7,
        }
    }
}

/// Get the application log directory, honouring a configured override
pub fn log_dir(config: &LogConfig) -> PathBuf {
    if let Some(dir) = &config.dir {
        return dir.clone();
    }

    ProjectDirs::from("com", "Vebitor", "Vebitor")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init(config: &LogConfig) -> anyhow::Result<WorkerGuard> {
    let guard = init_logging(&config.level, &log_dir(config))?;
    init_panic_hook();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_override() {
        let config = LogConfig {
            dir: Some(PathBuf::from("/var/log/vebitor")),
            ..LogConfig::default()
        };
        assert_eq!(log_dir(&config), PathBuf::from("/var/log/vebitor"));
        assert!(log_dir(&LogConfig::default()).ends_with("logs"));
    }

    #[test]
    fn test_partial_section() {
        let config: LogConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.dir, None);
        assert_eq!(config.retention_days, 7);
    }
}
