//! Application constants for the filter list index generator
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Access token for the hosting API (required)
    pub const TOKEN: &str = "GITHUB_TOKEN";

    /// Owner of the reference repository
    pub const REPO_OWNER: &str = "INITIAL_REPO_OWNER";

    /// Name of the reference repository
    pub const REPO_NAME: &str = "INITIAL_REPO_NAME";

    /// Path of the generated JSONP file
    pub const OUTPUT_FILE: &str = "OUTPUT_FILE";
}

/// Reference repository defaults
pub mod repository {
    /// Default owner of the reference repository
    pub const DEFAULT_OWNER: &str = "xarantolus";

    /// Default name of the reference repository
    pub const DEFAULT_NAME: &str = "filtrite";

    /// Directory inside each repository that holds the list manifests
    pub const LISTS_PATH: &str = "lists";
}

/// GitHub REST API settings
pub mod github {
    use super::Duration;

    /// Default REST API base URL
    pub const API_BASE: &str = "https://api.github.com";

    /// Default web base URL, used for release download links
    pub const WEB_BASE: &str = "https://github.com";

    /// Media type requested from the API
    pub const ACCEPT: &str = "application/vnd.github+json";

    /// Pinned REST API version
    pub const API_VERSION: &str = "2022-11-28";

    /// Page size for paginated listings (API maximum)
    pub const PER_PAGE: u32 = 100;

    /// Deadline for loading every page of forks
    pub const FORK_LISTING_TIMEOUT: Duration = Duration::from_secs(5 * 60);
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("filterlist-index/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Default rate limit for outgoing list requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 20;
}

/// Eligibility policy for manifests found in repositories
pub mod policy {
    use super::Duration;

    /// License every repository must carry (SPDX identifier)
    pub const REQUIRED_LICENSE: &str = "MIT";

    /// Extension of list manifest files
    pub const LIST_EXTENSION: &str = ".txt";

    /// Extension of the release asset built from a manifest
    pub const ASSET_EXTENSION: &str = ".dat";

    /// Assets not refreshed within this window are considered abandoned
    pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(10 * 24 * 60 * 60);

    /// Repositories younger than this are ignored
    pub const MIN_REPOSITORY_AGE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

    /// Largest filter file the browser will accept (10 MiB)
    pub const MAX_ASSET_SIZE: u64 = 10 * 1024 * 1024;

    /// Manifest files that are never picked up from repositories
    pub const IGNORED_FILES: &[&str] = &["bromite-default.txt"];
}

/// Title extraction and presentation
pub mod titles {
    /// Comment markers recognized in list and filter files
    pub const COMMENT_MARKERS: &[char] = &['!', '#'];

    /// Key that introduces a title comment
    pub const TITLE_KEY: &str = "title";

    /// Prefix of subscription links embedded in filter files
    pub const SUBSCRIBE_PREFIX: &str = "abp:subscribe";

    /// Title shown when none could be resolved
    pub const UNKNOWN_TITLE: &str = "Unknown";
}

/// Worker pool configuration
pub mod workers {
    /// Fallback worker count when available parallelism cannot be queried
    pub const FALLBACK_WORKER_COUNT: usize = 4;

    /// Capacity of the title work channel
    pub const QUEUE_CAPACITY: usize = 64;
}

/// Output and snapshot files
pub mod files {
    /// Default path of the generated JSONP file
    pub const DEFAULT_OUTPUT_FILE: &str = "filterlists_jsonp.js";

    /// Prefix written before the JSON document
    pub const JSONP_PREFIX: &str = "jsonp(";

    /// Suffix written after the JSON document
    pub const JSONP_SUFFIX: &str = ")";

    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Snapshot of every manifest found before deduplication
    pub const RAW_LISTS_SNAPSHOT: &str = "lists.json";

    /// Snapshot of manifests after deduplication
    pub const DEDUPLICATED_LISTS_SNAPSHOT: &str = "lists_deduplicated.json";

    /// Snapshot of the URL to title mapping
    pub const TITLES_SNAPSHOT: &str = "titles.json";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "filterlist-index.toml";

    /// Directory name under the user config directory
    pub const CONFIG_DIR_NAME: &str = "filterlist-index";
}

/// Optional list that lives outside the fork network
pub mod default_list {
    /// Display name of the default list
    pub const NAME: &str = "Bromite Default";

    /// Repository whose star count is attributed to the default list
    pub const OWNER: &str = "bromite";

    /// Repository name for the default list
    pub const REPO: &str = "filters";

    /// Manifest of the default list
    pub const LIST_URL: &str = "https://www.bromite.org/filters/lists.txt";

    /// Compiled filter file of the default list
    pub const FILTER_FILE_URL: &str = "https://www.bromite.org/filters/filters.dat";
}

// Re-export commonly used constants for convenience
pub use env::TOKEN as ENV_TOKEN;
pub use files::{DEFAULT_OUTPUT_FILE, TEMP_FILE_SUFFIX};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
