//! Core application logic for the filter list index generator
//!
//! This module contains the hosting provider abstraction, the list fetching
//! client, manifest parsing and deduplication, title resolution, rendering
//! and the coordinator that ties a run together.
//!
//! # Examples
//!
//! ```rust
//! use filterlist_index::app::{deduplicate, parse_list, Manifest};
//!
//! let urls = parse_list("! comment\nhttps://b.example/\nhttps://a.example/\n");
//! assert_eq!(urls, vec!["https://a.example/", "https://b.example/"]);
//!
//! let manifest = |name: &str, urls: Vec<String>| Manifest {
//!     name: name.to_string(),
//!     filter_file_url: String::new(),
//!     stars: 0,
//!     repo_owner: "owner".to_string(),
//!     repo_name: "repo".to_string(),
//!     list_url: String::new(),
//!     urls,
//! };
//! let mut reversed = urls.clone();
//! reversed.reverse();
//!
//! let kept = deduplicate(vec![manifest("first", urls), manifest("second", reversed)]);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].name, "first");
//! ```

pub mod client;
pub mod coordinator;
pub mod enrich;
pub mod hosting;
pub mod manifest;
pub mod output;
pub mod snapshot;
pub mod title;
pub mod walker;

// Re-export main public API
pub use client::{ClientConfig, ListClient, ListSource};
pub use coordinator::{render_snapshots, Coordinator, CoordinatorConfig, DefaultListConfig, RunSummary};
pub use enrich::{resolve_title, PoolConfig, TitleMapping, TitlePool};
pub use hosting::{GitHubClient, HostingProvider, MockHosting, Repository};
pub use manifest::{deduplicate, parse_list, unique_urls, Manifest, ParseStats};
pub use output::{present, render_jsonp, write_output, OutputDocument, PresentableList, UrlTitle};
pub use walker::{RepositoryWalker, WalkerPolicy};
