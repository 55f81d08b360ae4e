//! Human-readable titles for filter lists and manifests
//!
//! - `extract`: scrape the title a filter list declares about itself
//! - `normalize`: derive a display title from a file name

pub mod extract;
pub mod normalize;

pub use extract::{extract_title, read_title, title_from_line, TitleScanner};
pub use normalize::{make_list_title, strip_extension};

use url::Url;

/// Title derived from a list URL when the list itself declares none
///
/// Uses the last path segment without its extension, falling back to the
/// host for URLs without a usable path. Returns `None` only for strings
/// that are not absolute URLs.
pub fn fallback_title(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    let from_path = make_list_title(strip_extension(parsed.path()));
    if !from_path.is_empty() {
        return Some(from_path);
    }

    let from_host = parsed.host_str().map(make_list_title).unwrap_or_default();
    if from_host.is_empty() {
        None
    } else {
        Some(from_host)
    }
}
