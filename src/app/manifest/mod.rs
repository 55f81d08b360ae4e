//! List manifests: parsing, types and deduplication
//!
//! This module is organized into:
//! - `types`: the [`Manifest`] record and parsing statistics
//! - `parser`: turning manifest text into sorted unique URLs
//! - `dedup`: dropping manifests that repeat an earlier URL set

pub mod dedup;
pub mod parser;
pub mod types;

pub use dedup::{deduplicate, unique_urls};
pub use parser::{classify_line, parse_list, parse_list_with_stats, read_list, ListLine, ListParser};
pub use types::{Manifest, ParseStats};
