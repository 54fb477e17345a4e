//! Editor session persistence (open tabs, active file, working folder)

use crate::AppError;
use app_fs::DocumentStore;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// Editor session as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, deserialize_with = "null_as_default")]
    pub opened_files: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_active_file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_folder: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads and writes `session.json` in the app-data directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    documents: DocumentStore,
}

impl SessionStore {
    /// `documents` is used to drop opened files that no longer exist
    pub fn new<P: AsRef<Path>>(appdata_dir: P, documents: DocumentStore) -> Self {
        Self {
            dir: appdata_dir.as_ref().to_path_buf(),
            documents,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Load the session, creating an empty one on first use
    ///
    /// Opened files that are no longer regular files under the document root
    /// are filtered out. The working folder is returned unchecked.
    pub fn load(&self) -> Result<Session, AppError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path();

        if !path.exists() {
            let session = Session::default();
            self.save(&session)?;
            tracing::info!("Created empty session at {}", path.display());
            return Ok(session);
        }

        let content = std::fs::read_to_string(&path)?;
        let mut session: Session = serde_json::from_str(&content)?;

        let before = session.opened_files.len();
        session
            .opened_files
            .retain(|file| self.documents.is_file(file));

        if session.opened_files.len() != before {
            tracing::debug!(
                "Dropped {} missing files from session",
                before - session.opened_files.len()
            );
        }

        Ok(session)
    }

    /// Write the session verbatim
    pub fn save(&self, session: &Session) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir)?;

        let mut content = serde_json::to_string_pretty(session)?;
        content.push('\n');
        std::fs::write(self.path(), content)?;

        tracing::debug!("Session saved ({} open files)", session.opened_files.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentStore, SessionStore) {
        let dir = TempDir::new().unwrap();
        let documents = DocumentStore::with_root(dir.path().join("userdata"));
        let sessions = SessionStore::new(dir.path().join("appdata"), documents.clone());
        (dir, documents, sessions)
    }

    #[test]
    fn test_first_load_creates_file() {
        let (_dir, _documents, sessions) = setup();

        assert_eq!(sessions.load().unwrap(), Session::default());
        assert!(sessions.path().is_file());

        let raw = std::fs::read_to_string(sessions.path()).unwrap();
        assert!(raw.contains("\"openedFiles\": []"));
    }

    #[test]
    fn test_missing_files_are_filtered() {
        let (_dir, documents, sessions) = setup();
        documents.write("notes/a.txt", "a").unwrap();
        documents.write("b.txt", "b").unwrap();

        let session = Session {
            opened_files: vec![
                "notes/a.txt".into(),
                "gone.txt".into(),
                "notes".into(),
                "../escape.txt".into(),
                "b.txt".into(),
            ],
            last_active_file: "gone.txt".into(),
            working_folder: "missing-folder".into(),
        };
        sessions.save(&session).unwrap();

        let loaded = sessions.load().unwrap();
        assert_eq!(loaded.opened_files, vec!["notes/a.txt", "b.txt"]);
        assert_eq!(loaded.last_active_file, "gone.txt");
        assert_eq!(loaded.working_folder, "missing-folder");
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let (_dir, _documents, sessions) = setup();
        std::fs::create_dir_all(sessions.path().parent().unwrap()).unwrap();
        std::fs::write(sessions.path(), r#"{"openedFiles":null,"workingFolder":"w"}"#).unwrap();

        let loaded = sessions.load().unwrap();
        assert!(loaded.opened_files.is_empty());
        assert_eq!(loaded.working_folder, "w");
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let (_dir, _documents, sessions) = setup();
        std::fs::create_dir_all(sessions.path().parent().unwrap()).unwrap();
        std::fs::write(sessions.path(), "{not json").unwrap();

        assert!(matches!(sessions.load(), Err(AppError::Session(_))));
    }
}
