//! List manifest parsing
//!
//! A list manifest is a plain text file with one subscription URL per line.
//! Blank lines and comments are ignored. Only absolute URLs with a scheme
//! are kept; anything else, including path-only references such as
//! `/a.txt`, is skipped silently. The result is deduplicated and sorted.

use std::collections::BTreeSet;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;
use url::Url;

use super::types::ParseStats;
use crate::constants::titles::COMMENT_MARKERS;

/// What a single manifest line contributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLine<'a> {
    /// Blank line
    Empty,
    /// Comment line
    Comment,
    /// Line that is not an absolute URL, such as a bare path
    Invalid,
    /// A subscription URL
    Url(&'a str),
}

/// Classify one manifest line
///
/// A line is a URL only if it parses as an absolute URL.
pub fn classify_line(line: &str) -> ListLine<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        ListLine::Empty
    } else if trimmed.starts_with(COMMENT_MARKERS) {
        ListLine::Comment
    } else if Url::parse(trimmed).is_err() {
        ListLine::Invalid
    } else {
        ListLine::Url(trimmed)
    }
}

/// Incremental parser collecting unique URLs
#[derive(Debug, Default)]
pub struct ListParser {
    urls: BTreeSet<String>,
    stats: ParseStats,
}

impl ListParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line
    pub fn push_line(&mut self, line: &str) {
        self.stats.lines_processed += 1;

        match classify_line(line) {
            ListLine::Empty => self.stats.empty_lines += 1,
            ListLine::Comment => self.stats.comment_lines += 1,
            ListLine::Invalid => {
                trace!("Skipping malformed list line: {:?}", line);
                self.stats.invalid_lines += 1;
            }
            ListLine::Url(url) => {
                if !self.urls.insert(url.to_string()) {
                    self.stats.duplicate_urls += 1;
                }
            }
        }
    }

    /// Sorted unique URLs
    pub fn finish(self) -> (Vec<String>, ParseStats) {
        (self.urls.into_iter().collect(), self.stats)
    }
}

/// Parse manifest text into sorted unique URLs
///
/// # Examples
///
/// ```
/// use filterlist_index::app::manifest::parse_list;
///
/// let urls = parse_list("# lists\nhttps://b.example/x.txt\n\nhttps://a.example/y.txt\n");
/// assert_eq!(urls, vec!["https://a.example/y.txt", "https://b.example/x.txt"]);
/// ```
pub fn parse_list(text: &str) -> Vec<String> {
    parse_list_with_stats(text).0
}

/// Parse manifest text, also returning line statistics
pub fn parse_list_with_stats(text: &str) -> (Vec<String>, ParseStats) {
    let mut parser = ListParser::new();
    for line in text.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

/// Parse a manifest from any buffered async reader
pub async fn read_list<R>(reader: R) -> std::io::Result<(Vec<String>, ParseStats)>
where
    R: AsyncBufRead + Unpin,
{
    let mut parser = ListParser::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        parser.push_line(&line);
    }
    Ok(parser.finish())
}
