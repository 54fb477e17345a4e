//! Vebitor Core Domain Logic
//!
//! This crate contains:
//! - Configuration
//! - Error types
//! - Session persistence
//! - The document service used by the request layer

pub mod config;
pub mod error;
pub mod session;
pub mod service;

pub use app_log::LogConfig;
pub use config::{AppConfig, ServerConfig, StorageConfig};
pub use error::AppError;
pub use session::{Session, SessionStore};
pub use service::DocumentService;

/// Build the document service from a loaded configuration
pub fn init(config: &AppConfig) -> DocumentService {
    DocumentService::new(&config.storage)
}
