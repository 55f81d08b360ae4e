//! Source-control hosting capabilities
//!
//! The generator needs four things from a hosting provider: repository
//! metadata, the forks of a repository, directory listings and the latest
//! release. [`HostingProvider`] captures exactly that, so any provider that
//! offers these operations can stand in for GitHub.
//!
//! - `github`: REST implementation for github.com
//! - `mock`: in-memory implementation for tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HostingResult;

pub mod github;
pub mod mock;

pub use github::GitHubClient;
pub use mock::MockHosting;

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owning account
    pub owner: String,
    /// Repository name
    pub name: String,
    /// SPDX identifier of the declared license
    pub license: Option<String>,
    /// Star count
    pub stars: u64,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Repository with no license, stars or creation time
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            license: None,
            stars: 0,
            created_at: None,
        }
    }

    /// Set the license identifier
    pub fn with_license(mut self, spdx_id: impl Into<String>) -> Self {
        self.license = Some(spdx_id.into());
        self
    }

    /// Set the star count
    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = stars;
        self
    }

    /// Set the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// "owner/name"
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link
    Symlink,
    /// Git submodule
    Submodule,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File name
    pub name: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Size in bytes
    pub size: u64,
    /// Raw download URL, absent for directories
    pub download_url: Option<String>,
}

impl ContentEntry {
    /// Regular file entry
    pub fn file(name: impl Into<String>, size: u64, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
            download_url: Some(download_url.into()),
        }
    }
}

/// Result of looking up a path in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// The path is a single file
    File(ContentEntry),
    /// The path is a directory with these entries
    Directory(Vec<ContentEntry>),
}

/// Binary attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last time the asset was uploaded or replaced
    pub updated_at: DateTime<Utc>,
}

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag_name: String,
    /// Attached assets
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Asset with exactly this file name
    pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// Operations the generator needs from a hosting provider
#[async_trait]
pub trait HostingProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Repository metadata
    async fn get_repository(&self, owner: &str, name: &str) -> HostingResult<Repository>;

    /// Every fork of a repository, across all pages
    async fn list_forks(&self, owner: &str, name: &str) -> HostingResult<Vec<Repository>>;

    /// File or directory at `path`
    async fn get_contents(&self, owner: &str, name: &str, path: &str) -> HostingResult<Contents>;

    /// Latest published release
    async fn get_latest_release(&self, owner: &str, name: &str) -> HostingResult<Release>;

    /// Stable download link for an asset of the latest release
    fn release_download_url(&self, owner: &str, name: &str, asset: &str) -> String;
}
