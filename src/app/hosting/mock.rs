//! In-memory hosting provider for deterministic tests.
//!
//! Repositories, forks, directory listings and releases are registered up
//! front; anything not registered answers with `HostingError::NotFound`.
//!
//! # Example
//!
//! ```
//! use filterlist_index::app::hosting::{HostingProvider, MockHosting, Repository};
//!
//! # tokio_test::block_on(async {
//! let hosting = MockHosting::new()
//!     .with_repository(Repository::new("owner", "lists").with_stars(3))
//!     .with_fork("owner", "lists", Repository::new("friend", "lists"));
//!
//! let forks = hosting.list_forks("owner", "lists").await.unwrap();
//! assert_eq!(forks.len(), 1);
//! assert!(hosting.get_latest_release("friend", "lists").await.is_err());
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Contents, HostingProvider, Release, Repository};
use crate::errors::{HostingError, HostingResult};

type RepoKey = (String, String);

fn key(owner: &str, name: &str) -> RepoKey {
    (owner.to_string(), name.to_string())
}

/// Mock hosting provider.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockHosting {
    inner: Arc<Mutex<MockHostingInner>>,
}

#[derive(Debug, Default)]
struct MockHostingInner {
    repositories: HashMap<RepoKey, Repository>,
    forks: HashMap<RepoKey, Vec<Repository>>,
    contents: HashMap<(String, String, String), Contents>,
    releases: HashMap<RepoKey, Release>,
    requests: Vec<String>,
}

impl MockHosting {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockHostingInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register repository metadata
    pub fn with_repository(self, repo: Repository) -> Self {
        self.lock()
            .repositories
            .insert(key(&repo.owner, &repo.name), repo);
        self
    }

    /// Register a fork of `owner/name`; the fork's metadata is registered too
    pub fn with_fork(self, owner: &str, name: &str, fork: Repository) -> Self {
        {
            let mut inner = self.lock();
            inner
                .repositories
                .insert(key(&fork.owner, &fork.name), fork.clone());
            inner.forks.entry(key(owner, name)).or_default().push(fork);
        }
        self
    }

    /// Register what lives at `path` in `owner/name`
    pub fn with_contents(self, owner: &str, name: &str, path: &str, contents: Contents) -> Self {
        self.lock().contents.insert(
            (owner.to_string(), name.to_string(), path.to_string()),
            contents,
        );
        self
    }

    /// Register the latest release of `owner/name`
    pub fn with_release(self, owner: &str, name: &str, release: Release) -> Self {
        self.lock().releases.insert(key(owner, name), release);
        self
    }

    /// Requests received so far, as "operation owner/name"
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn record(&self, operation: &str, owner: &str, name: &str) {
        self.lock()
            .requests
            .push(format!("{} {}/{}", operation, owner, name));
    }
}

#[async_trait]
impl HostingProvider for MockHosting {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_repository(&self, owner: &str, name: &str) -> HostingResult<Repository> {
        self.record("get_repository", owner, name);
        self.lock()
            .repositories
            .get(&key(owner, name))
            .cloned()
            .ok_or_else(|| HostingError::NotFound(format!("{}/{}", owner, name)))
    }

    async fn list_forks(&self, owner: &str, name: &str) -> HostingResult<Vec<Repository>> {
        self.record("list_forks", owner, name);
        Ok(self
            .lock()
            .forks
            .get(&key(owner, name))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_contents(&self, owner: &str, name: &str, path: &str) -> HostingResult<Contents> {
        self.record("get_contents", owner, name);
        self.lock()
            .contents
            .get(&(owner.to_string(), name.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| HostingError::NotFound(format!("{}/{}/{}", owner, name, path)))
    }

    async fn get_latest_release(&self, owner: &str, name: &str) -> HostingResult<Release> {
        self.record("get_latest_release", owner, name);
        self.lock()
            .releases
            .get(&key(owner, name))
            .cloned()
            .ok_or_else(|| HostingError::NotFound("Not Found".to_string()))
    }

    fn release_download_url(&self, owner: &str, name: &str, asset: &str) -> String {
        format!(
            "https://mock.example/{}/{}/releases/latest/download/{}",
            owner, name, asset
        )
    }
}
