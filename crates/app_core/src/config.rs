//! Application configuration

use app_log::LogConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the document root
pub const ENV_USERDATA_DIR: &str = "VEBITOR_USERDATA_DIR";
/// Environment variable overriding the session directory
pub const ENV_APPDATA_DIR: &str = "VEBITOR_APPDATA_DIR";
/// Environment variable overriding the listen port
pub const ENV_PORT: &str = "VEBITOR_PORT";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "VEBITOR_BIND";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

/// Where documents and the session file live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the document tree; nothing outside it is ever touched
    pub userdata_dir: PathBuf,
    /// Directory holding session.json
    pub appdata_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            userdata_dir: PathBuf::from("userdata"),
            appdata_dir: PathBuf::from("appdata"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Allow cross-origin requests from any origin (frontend dev server)
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            permissive_cors: true,
        }
    }
}

impl ServerConfig {
    /// Socket address string to listen on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl AppConfig {
    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, then apply environment overrides
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            config
        } else {
            tracing::info!("Using default configuration");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_USERDATA_DIR).filter(|v| !v.is_empty()) {
            self.storage.userdata_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup(ENV_APPDATA_DIR).filter(|v| !v.is_empty()) {
            self.storage.appdata_dir = PathBuf::from(dir);
        }

        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", ENV_PORT, port, e))?;
        }

        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "Vebitor", "Vebitor")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
