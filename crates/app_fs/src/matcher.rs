//! Line matching strategies for full-text search

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// How the query string is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    #[default]
    #[serde(rename = "plain")]
    Plain,
    #[serde(rename = "regex")]
    Regex,
    /// Any other literal; matches nothing
    #[serde(rename = "unrecognized")]
    #[serde(other)]
    Unrecognized,
}

/// Byte offsets of one match within a line, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// A query prepared for matching line by line
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// Substring search; overlapping occurrences are all reported
    Plain {
        /// Query as given, lower-cased when case-insensitive
        needle: String,
        /// Byte length of the original query
        width: usize,
        case_sensitive: bool,
    },
    /// Compiled pattern, leftmost non-overlapping matches
    Regex(Regex),
    /// Invalid pattern or unknown mode
    Disabled,
}

impl MatchStrategy {
    /// Prepare a query for the given mode
    ///
    /// A pattern that fails to compile yields a strategy that never matches.
    pub fn new(query: &str, mode: SearchMode, case_sensitive: bool) -> Self {
        match mode {
            SearchMode::Plain => {
                let needle = if case_sensitive {
                    query.to_string()
                } else {
                    query.to_lowercase()
                };
                MatchStrategy::Plain {
                    needle,
                    width: query.len(),
                    case_sensitive,
                }
            }
            SearchMode::Regex => match RegexBuilder::new(query)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(regex) => MatchStrategy::Regex(regex),
                Err(e) => {
                    tracing::debug!("Ignoring invalid search pattern {:?}: {}", query, e);
                    MatchStrategy::Disabled
                }
            },
            SearchMode::Unrecognized => MatchStrategy::Disabled,
        }
    }

    /// Find all match spans in a single line, leftmost first
    ///
    /// Case-insensitive plain spans are offsets into the lower-cased line.
    /// Lower-casing can change byte lengths, so a span may fall outside the
    /// original line; check bounds before slicing with it.
    pub fn find_spans(&self, line: &str) -> Vec<MatchSpan> {
        match self {
            MatchStrategy::Plain {
                needle,
                width,
                case_sensitive,
            } => {
                if *case_sensitive {
                    plain_spans(line, needle, *width)
                } else {
                    plain_spans(&line.to_lowercase(), needle, *width)
                }
            }
            MatchStrategy::Regex(regex) => regex
                .find_iter(line)
                .map(|m| MatchSpan {
                    start: m.start(),
                    end: m.end(),
                })
                .collect(),
            MatchStrategy::Disabled => Vec::new(),
        }
    }
}

/// Scan for every occurrence of `needle`, resuming one character after the
/// start of the previous hit so overlapping occurrences are counted.
fn plain_spans(haystack: &str, needle: &str, width: usize) -> Vec<MatchSpan> {
    let mut spans = Vec::new();

    if needle.is_empty() {
        return spans;
    }

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        spans.push(MatchSpan {
            start,
            end: start + width,
        });

        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }

    spans
}
