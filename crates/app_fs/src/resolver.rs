//! PathResolver - maps logical document paths onto a sandboxed root directory

use crate::{FsError, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves caller-supplied logical paths (slash-separated, relative to the
/// document root) into absolute filesystem paths that are guaranteed to stay
/// inside the root.
///
/// Resolution is purely lexical: nothing on disk is touched, so the root does
/// not have to exist yet.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Normalized absolute root directory
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for the given root directory
    ///
    /// Relative roots are anchored at the current working directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();

        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir().unwrap_or_default().join(root)
        };

        // Normalize components (resolve . and ..)
        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                _ => normalized.push(component),
            }
        }

        Self { root: normalized }
    }

    /// The root directory all logical paths resolve beneath
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path to an absolute path inside the root
    ///
    /// An empty path (or a bare separator) resolves to the root itself.
    /// Leading separators are stripped rather than rejected. Any `..` segment
    /// is rejected, even one that would stay inside the root.
    pub fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let trimmed = logical.trim_start_matches(is_separator);

        let mut resolved = self.root.clone();

        for segment in trimmed.split(is_separator) {
            match segment {
                "" | "." => {}
                ".." => return Err(FsError::PathOutsideRoot(logical.to_string())),
                name => {
                    // A segment must be a plain name: no drive prefix, no root
                    let mut components = Path::new(name).components();
                    match (components.next(), components.next()) {
                        (Some(Component::Normal(_)), None) => {}
                        _ => return Err(FsError::PathOutsideRoot(logical.to_string())),
                    }
                    resolved.push(name);
                }
            }
        }

        Ok(resolved)
    }

    /// Check whether an absolute path is the root directory itself
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }

    /// Convert an absolute path beneath the root back into a logical path
    pub fn to_logical(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| FsError::PathOutsideRoot(path.display().to_string()))?;

        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        Ok(segments.join("/"))
    }
}

/// Both separators are accepted so `..\` cannot slip past on any host
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}
