//! Application error types

use thiserror::Error;

/// Main application error type
///
/// Each variant is a stable kind the request layer maps to a response.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Client errors (caller can fix the request) =====
    #[error("Path outside root: {0}")]
    PathOutsideRoot(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    // ===== Server errors =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),
}

impl AppError {
    /// Stable identifier for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::PathOutsideRoot(_) => "path_outside_root",
            AppError::NotFound(_) => "not_found",
            AppError::FolderNotFound(_) => "folder_not_found",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::Validation(_) => "validation",
            AppError::Io(_) => "io_error",
            AppError::Session(_) => "session_error",
        }
    }

    /// Is the request itself at fault (as opposed to the server)?
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::PathOutsideRoot(_)
                | AppError::NotFound(_)
                | AppError::FolderNotFound(_)
                | AppError::AlreadyExists(_)
                | AppError::InvalidPath(_)
                | AppError::Validation(_)
        )
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::Io(err) => AppError::Io(err),
            app_fs::FsError::PathOutsideRoot(p) => AppError::PathOutsideRoot(p),
            app_fs::FsError::NotFound(p) => AppError::NotFound(p),
            app_fs::FsError::FolderNotFound(p) => AppError::FolderNotFound(p),
            app_fs::FsError::AlreadyExists(p) => AppError::AlreadyExists(p),
            app_fs::FsError::InvalidPath(p) => AppError::InvalidPath(p),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Session(e.to_string())
    }
}
