//! Document data model shared by the store and its callers

use serde::{Deserialize, Serialize};

/// A text document addressed by its logical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub file_path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_folder: bool,
}

impl Document {
    /// Create a file document
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
            is_folder: false,
        }
    }
}

/// Listing entry: name and kind only, the body is never read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub file_path: String,
    pub is_folder: bool,
}
