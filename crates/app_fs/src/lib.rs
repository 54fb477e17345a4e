//! Vebitor File System Abstraction Layer
//!
//! Provides the document store backing the editor, including:
//! - PathResolver: Sandboxed resolution of logical paths under the data root
//! - DocumentStore: Read/write/delete/list/rename of text documents
//! - MatchStrategy: Plain and regex line matching
//! - SearchEngine: Recursive full-text search over a folder tree

mod resolver;
mod document;
mod store;
mod matcher;
mod search;

pub use resolver::PathResolver;
pub use document::{Document, DocumentMetadata};
pub use store::DocumentStore;
pub use matcher::{MatchSpan, MatchStrategy, SearchMode};
pub use search::{SearchEngine, SearchMatch, SearchRequest, SearchResult};

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path outside root: {0}")]
    PathOutsideRoot(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl FsError {
    /// Stable identifier for the error kind, independent of the message
    pub fn kind(&self) -> &'static str {
        match self {
            FsError::Io(_) => "io_error",
            FsError::PathOutsideRoot(_) => "path_outside_root",
            FsError::NotFound(_) => "not_found",
            FsError::FolderNotFound(_) => "folder_not_found",
            FsError::AlreadyExists(_) => "already_exists",
            FsError::InvalidPath(_) => "invalid_path",
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
