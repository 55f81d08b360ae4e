//! Title extraction from filter list files
//!
//! Filter lists announce their name in a header comment, either as
//! `! Title: Some List` or through an embedded subscription link such as
//! `! abp:subscribe?location=...&title=Some%20List`. The first match wins.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use url::form_urlencoded;

use crate::constants::titles::{COMMENT_MARKERS, SUBSCRIBE_PREFIX, TITLE_KEY};

/// Extract a title from a single line, if it declares one
///
/// A `Title:` header with nothing after the colon still counts as a
/// declaration and yields an empty title.
pub fn title_from_line(line: &str) -> Option<String> {
    let line = line.trim();
    if !line.starts_with(COMMENT_MARKERS) {
        return None;
    }

    let rest =
        line.trim_start_matches(|c: char| COMMENT_MARKERS.contains(&c) || c.is_whitespace());

    if let Some(after_key) = strip_prefix_ignore_case(rest, TITLE_KEY) {
        return after_key
            .trim_start()
            .strip_prefix(':')
            .map(|value| value.trim().to_string());
    }

    if let Some(link) = strip_prefix_ignore_case(rest, SUBSCRIBE_PREFIX) {
        let query = link.trim_start_matches('?');
        return form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == TITLE_KEY)
            .map(|(_, value)| value.trim().to_string())
            .filter(|title| !title.is_empty());
    }

    None
}

/// Return the first title declared in the given lines
pub fn extract_title<'a, I>(lines: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .find_map(title_from_line)
}

/// Read lines from `reader` until a title is found
///
/// Stops reading as soon as a title is found, so large filter files are
/// not consumed further than their header.
pub async fn read_title<R>(reader: R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(title) = title_from_line(&line) {
            return Ok(Some(title));
        }
    }
    Ok(None)
}

/// Incremental title scanner fed with raw body chunks
///
/// Lines may be split across chunks; incomplete trailing bytes are kept
/// until the next chunk or [`TitleScanner::finish`].
#[derive(Debug, Default)]
pub struct TitleScanner {
    pending: Vec<u8>,
}

impl TitleScanner {
    /// Create an empty scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk, returning a title as soon as one is complete
    pub fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);

        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if let Some(title) = title_from_line(&String::from_utf8_lossy(&line)) {
                return Some(title);
            }
        }

        None
    }

    /// Check the final unterminated line once the body is exhausted
    pub fn finish(self) -> Option<String> {
        title_from_line(&String::from_utf8_lossy(&self.pending))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
