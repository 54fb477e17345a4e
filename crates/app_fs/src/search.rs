//! Recursive full-text search over the document tree

use crate::{MatchStrategy, PathResolver, Result, SearchMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Search parameters as received from the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub search_mode: SearchMode,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Restrict the walk to this folder; empty or absent means the root
    #[serde(default)]
    pub search_folder: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, search_mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            search_mode,
            case_sensitive: false,
            search_folder: None,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.search_folder = Some(folder.into());
        self
    }
}

/// One match: the whole line plus the byte span of the hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// 1-based
    pub line_number: usize,
    pub line_text: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// All matches within one file, in line order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub file_path: String,
    pub matches: Vec<SearchMatch>,
}

/// Walks the document tree and matches every file line by line
#[derive(Debug, Clone)]
pub struct SearchEngine {
    resolver: PathResolver,
}

impl SearchEngine {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Run a search
    ///
    /// Files are visited in name order. Any unreadable file aborts the whole
    /// search; there are no partial results.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let folder = request.search_folder.as_deref().unwrap_or("");
        let base = self.resolver.resolve(folder)?;

        let strategy = MatchStrategy::new(
            &request.query,
            request.search_mode,
            request.case_sensitive,
        );

        let mut results = Vec::new();
        let mut scanned = 0usize;

        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;

            // Directories and symlinks are never searched
            if !entry.file_type().is_file() {
                continue;
            }
            scanned += 1;

            let matches = search_file(entry.path(), &strategy)?;
            if matches.is_empty() {
                continue;
            }

            results.push(SearchResult {
                file_path: self.resolver.to_logical(entry.path())?,
                matches,
            });
        }

        tracing::debug!(
            "Search {:?} ({:?}) in {}: {} of {} files matched",
            request.query,
            request.search_mode,
            base.display(),
            results.len(),
            scanned
        );

        Ok(results)
    }
}

fn search_file(path: &Path, strategy: &MatchStrategy) -> Result<Vec<SearchMatch>> {
    let content = fs::read_to_string(path)?;
    let mut matches = Vec::new();

    for (index, line) in content.lines().enumerate() {
        for span in strategy.find_spans(line) {
            matches.push(SearchMatch {
                line_number: index + 1,
                line_text: line.to_string(),
                start_pos: span.start,
                end_pos: span.end,
            });
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentStore, FsError};
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentStore, SearchEngine) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::with_root(dir.path());
        let engine = SearchEngine::new(store.resolver().clone());
        (dir, store, engine)
    }

    #[test]
    fn test_search_across_tree() {
        let (_dir, store, engine) = setup();

        store.write("a.txt", "first line\nsay hello there\nHello again").unwrap();
        store.write("notes/b.txt", "nothing here").unwrap();
        store.write("notes/deep/c.txt", "hello\r\nhello hello\r\n").unwrap();

        let results = engine
            .search(&SearchRequest::new("hello", SearchMode::Plain))
            .unwrap();

        let paths: Vec<_> = results.iter().map(|r| r.file_path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "notes/deep/c.txt"]);

        let a = &results[0].matches;
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].line_number, 2);
        assert_eq!(a[0].line_text, "say hello there");
        assert_eq!((a[0].start_pos, a[0].end_pos), (4, 9));
        assert_eq!(a[1].line_number, 3);
        assert_eq!((a[1].start_pos, a[1].end_pos), (0, 5));

        let c = &results[1].matches;
        assert_eq!(c.len(), 3);
        assert_eq!(c[1].line_text, "hello hello");
        assert_eq!((c[2].line_number, c[2].start_pos), (2, 6));
    }

    #[test]
    fn test_case_sensitive_search() {
        let (_dir, store, engine) = setup();
        store.write("a.txt", "Hello\nhello").unwrap();

        let results = engine
            .search(&SearchRequest::new("Hello", SearchMode::Plain).case_sensitive(true))
            .unwrap();
        assert_eq!(results[0].matches.len(), 1);
        assert_eq!(results[0].matches[0].line_number, 1);
    }

    #[test]
    fn test_overlapping_plain_matches() {
        let (_dir, store, engine) = setup();
        store.write("a.txt", "aaaa").unwrap();

        let results = engine
            .search(&SearchRequest::new("aa", SearchMode::Plain).case_sensitive(true))
            .unwrap();
        let spans: Vec<_> = results[0]
            .matches
            .iter()
            .map(|m| (m.start_pos, m.end_pos))
            .collect();
        assert_eq!(spans, vec![(0, 2), (1, 3), (2, 4)]);
    }

    #[test]
    fn test_regex_search() {
        let (_dir, store, engine) = setup();
        store.write("log.txt", "error 42\nok\nERROR 7").unwrap();

        let results = engine
            .search(&SearchRequest::new(r"error \d+", SearchMode::Regex))
            .unwrap();
        assert_eq!(results[0].matches.len(), 2);
        assert_eq!(results[0].matches[1].line_number, 3);
        assert_eq!(results[0].matches[1].end_pos, 7);
    }

    #[test]
    fn test_invalid_regex_returns_no_results() {
        let (_dir, store, engine) = setup();
        store.write("a.txt", "(unbalanced").unwrap();

        let results = engine
            .search(&SearchRequest::new("(unbalanced", SearchMode::Regex))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_folder_restriction() {
        let (_dir, store, engine) = setup();
        store.write("top.txt", "needle").unwrap();
        store.write("inner/one.txt", "needle").unwrap();
        store.write("inner2/two.txt", "needle").unwrap();

        let results = engine
            .search(&SearchRequest::new("needle", SearchMode::Plain).in_folder("inner"))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_path, "inner/one.txt");

        let escaped = engine.search(&SearchRequest::new("needle", SearchMode::Plain).in_folder("../"));
        assert!(matches!(escaped, Err(FsError::PathOutsideRoot(_))));
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let (_dir, _store, engine) = setup();

        let result = engine.search(&SearchRequest::new("x", SearchMode::Plain).in_folder("missing"));
        assert!(matches!(result, Err(FsError::Io(_))));
    }

    #[test]
    fn test_undecodable_file_aborts_search() {
        let (dir, store, engine) = setup();
        store.write("a.txt", "needle").unwrap();
        std::fs::write(dir.path().join("b.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let result = engine.search(&SearchRequest::new("needle", SearchMode::Plain));
        assert!(matches!(result, Err(FsError::Io(_))));
    }

    #[test]
    fn test_no_matches_is_empty() {
        let (_dir, store, engine) = setup();
        store.write("a.txt", "abc").unwrap();

        let results = engine
            .search(&SearchRequest::new("zzz", SearchMode::Plain))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_request_wire_format() {
        let request: SearchRequest = serde_json::from_str(
            r#"{"query":"x","searchMode":"regex","caseSensitive":true,"searchFolder":"notes"}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            SearchRequest::new("x", SearchMode::Regex)
                .case_sensitive(true)
                .in_folder("notes")
        );
    }
}
