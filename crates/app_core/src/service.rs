//! Document operations exposed to the request layer

use crate::{AppError, Session, SessionStore, StorageConfig};
use app_fs::{
    Document, DocumentMetadata, DocumentStore, PathResolver, SearchEngine, SearchRequest,
    SearchResult,
};

/// Entry point for every document, search and session operation
///
/// Holds no mutable state; clone it into each request handler.
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: DocumentStore,
    search: SearchEngine,
    sessions: SessionStore,
}

impl DocumentService {
    pub fn new(storage: &StorageConfig) -> Self {
        let resolver = PathResolver::new(&storage.userdata_dir);
        let store = DocumentStore::new(resolver.clone());
        let search = SearchEngine::new(resolver);
        let sessions = SessionStore::new(&storage.appdata_dir, store.clone());

        tracing::info!(
            "Document root: {}, session dir: {}",
            store.resolver().root().display(),
            storage.appdata_dir.display()
        );

        Self {
            store,
            search,
            sessions,
        }
    }

    pub fn get_document(&self, path: &str) -> Result<Document, AppError> {
        let path = strip_leading_slash(path);
        let content = self.store.read(path)?;
        Ok(Document::new(path, content))
    }

    pub fn create_document(&self, document: Document) -> Result<Document, AppError> {
        let path = strip_leading_slash(&document.file_path);
        self.store.write(path, &document.content)?;
        Ok(Document::new(path, document.content))
    }

    pub fn update_document(&self, path: &str, content: String) -> Result<Document, AppError> {
        let path = strip_leading_slash(path);
        self.store.write(path, &content)?;
        Ok(Document::new(path, content))
    }

    pub fn delete_document(&self, path: &str) -> Result<(), AppError> {
        self.store.delete(strip_leading_slash(path))?;
        Ok(())
    }

    pub fn list_documents(&self, parent: Option<&str>) -> Result<Vec<DocumentMetadata>, AppError> {
        Ok(self.store.list(parent.unwrap_or(""))?)
    }

    pub fn rename_document(&self, old_path: &str, new_path: &str) -> Result<(), AppError> {
        self.store
            .rename(strip_leading_slash(old_path), strip_leading_slash(new_path))?;
        Ok(())
    }

    pub fn search_documents(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, AppError> {
        Ok(self.search.search(request)?)
    }

    pub fn load_session(&self) -> Result<Session, AppError> {
        self.sessions.load()
    }

    pub fn save_session(&self, session: &Session) -> Result<(), AppError> {
        self.sessions.save(session)
    }
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_fs::SearchMode;
    use tempfile::TempDir;

    fn service() -> (TempDir, DocumentService) {
        let dir = TempDir::new().unwrap();
        let storage = StorageConfig {
            userdata_dir: dir.path().join("userdata"),
            appdata_dir: dir.path().join("appdata"),
        };
        let service = DocumentService::new(&storage);
        (dir, service)
    }

    #[test]
    fn test_document_lifecycle() {
        let (_dir, service) = service();

        let created = service
            .create_document(Document::new("/notes/today.md", "# Today\n"))
            .unwrap();
        assert_eq!(created.file_path, "notes/today.md");
        assert!(!created.is_folder);

        let updated = service
            .update_document("/notes/today.md", "# Today\n- done\n".into())
            .unwrap();
        assert_eq!(service.get_document("notes/today.md").unwrap(), updated);

        let listing = service.list_documents(None).unwrap();
        assert_eq!(
            listing,
            vec![DocumentMetadata { file_path: "notes".into(), is_folder: true }]
        );

        service.rename_document("notes/today.md", "/archive/today.md").unwrap();
        assert!(matches!(
            service.get_document("notes/today.md"),
            Err(AppError::NotFound(_))
        ));

        service.delete_document("/archive/today.md").unwrap();
        assert!(matches!(
            service.delete_document("archive/today.md"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_errors_keep_their_kind() {
        let (_dir, service) = service();

        assert!(matches!(
            service.list_documents(Some("missing")),
            Err(AppError::FolderNotFound(_))
        ));
        assert!(matches!(
            service.get_document("../secret"),
            Err(AppError::PathOutsideRoot(_))
        ));

        let request = SearchRequest::new("x", SearchMode::Plain).in_folder("../..");
        assert!(matches!(
            service.search_documents(&request),
            Err(AppError::PathOutsideRoot(_))
        ));
    }

    #[test]
    fn test_search_and_session() {
        let (_dir, service) = service();
        service.create_document(Document::new("a.txt", "find me")).unwrap();

        let results = service
            .search_documents(&SearchRequest::new("FIND", SearchMode::Plain))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_path, "a.txt");

        let session = Session {
            opened_files: vec!["a.txt".into(), "b.txt".into()],
            last_active_file: "a.txt".into(),
            working_folder: String::new(),
        };
        service.save_session(&session).unwrap();
        assert_eq!(service.load_session().unwrap().opened_files, vec!["a.txt"]);
    }
}
