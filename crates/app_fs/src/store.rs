//! Document store - read, write, delete, list and rename documents

use crate::{DocumentMetadata, FsError, PathResolver, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Filesystem-backed document store rooted at a single data directory
///
/// Every operation resolves its path through the [`PathResolver`] first; the
/// store keeps no other state, so it can be shared freely between requests.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    resolver: PathResolver,
}

impl DocumentStore {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Create a store rooted at the given directory
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self::new(PathResolver::new(root))
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Read a document's content
    pub fn read(&self, path: &str) -> Result<String> {
        let abs = self.resolver.resolve(path)?;

        if !abs.is_file() {
            return Err(FsError::NotFound(path.to_string()));
        }

        let content = fs::read_to_string(&abs)?;
        tracing::debug!("Read document: {}", abs.display());

        Ok(content)
    }

    /// Create or overwrite a document, creating parent folders on demand
    pub fn write(&self, path: &str, content: &str) -> Result<()> {
        let abs = self.resolver.resolve(path)?;

        if self.resolver.is_root(&abs) {
            return Err(FsError::InvalidPath(
                "Cannot write to the root folder".to_string(),
            ));
        }

        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }

        // Single write call so readers never see a partial buffer
        fs::write(&abs, content.as_bytes())?;
        tracing::info!("Wrote document: {} ({} bytes)", abs.display(), content.len());

        Ok(())
    }

    /// Delete a document, or a folder together with its contents
    pub fn delete(&self, path: &str) -> Result<()> {
        let abs = self.resolver.resolve(path)?;

        if self.resolver.is_root(&abs) {
            return Err(FsError::InvalidPath(
                "Cannot delete the root folder".to_string(),
            ));
        }

        let metadata = match fs::symlink_metadata(&abs) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FsError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&abs)?;
        } else {
            fs::remove_file(&abs)?;
        }
        tracing::warn!("Permanently deleted: {}", abs.display());

        Ok(())
    }

    /// List the immediate children of a folder
    ///
    /// An empty parent lists the root, which is created if missing. Entries
    /// are sorted by name so identical trees always list identically.
    pub fn list(&self, parent: &str) -> Result<Vec<DocumentMetadata>> {
        let base = self.resolver.resolve(parent)?;

        if self.resolver.is_root(&base) {
            fs::create_dir_all(&base)?;
        } else if !base.is_dir() {
            return Err(FsError::FolderNotFound(parent.to_string()));
        }

        let mut entries = Vec::new();

        for entry in fs::read_dir(&base)? {
            let entry = entry?;
            let file_type = entry.file_type()?;

            entries.push(DocumentMetadata {
                file_path: entry.file_name().to_string_lossy().to_string(),
                is_folder: file_type.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        tracing::debug!("Listed {} entries in {}", entries.len(), base.display());

        Ok(entries)
    }

    /// Rename or move a document or folder
    ///
    /// Never overwrites: an occupied destination is reported as
    /// [`FsError::AlreadyExists`] and neither side is touched.
    pub fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        let from = self.resolver.resolve(old_path)?;
        let to = self.resolver.resolve(new_path)?;

        if self.resolver.is_root(&from) || self.resolver.is_root(&to) {
            return Err(FsError::InvalidPath(
                "Cannot rename the root folder".to_string(),
            ));
        }

        // A missing source fails before any destination folder is created
        if fs::symlink_metadata(&from).is_err() {
            return Err(FsError::NotFound(old_path.to_string()));
        }

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }

        // Not atomic with the rename below; concurrent writers may still race
        if fs::symlink_metadata(&to).is_ok() {
            return Err(FsError::AlreadyExists(new_path.to_string()));
        }

        fs::rename(&from, &to).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FsError::NotFound(old_path.to_string()),
            _ => FsError::Io(e),
        })?;
        tracing::info!("Renamed: {} -> {}", from.display(), to.display());

        Ok(())
    }

    /// Check whether a logical path names an existing regular file
    pub fn is_file(&self, path: &str) -> bool {
        self.resolver
            .resolve(path)
            .map(|abs| abs.is_file())
            .unwrap_or(false)
    }
}
