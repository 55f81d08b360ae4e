//! Repository walker
//!
//! Turns one repository into the manifests it publishes. A repository is
//! only considered when it carries the required license, is not brand new,
//! has a lists directory and a latest release with assets. Within the lists
//! directory, a manifest only counts while the release keeps shipping a
//! fresh, reasonably sized filter file built from it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app::client::ListSource;
use crate::app::hosting::{ContentEntry, Contents, EntryKind, HostingProvider, Release, Repository};
use crate::app::manifest::Manifest;
use crate::app::title::{make_list_title, strip_extension};
use crate::constants::{policy, repository};
use crate::errors::{RepositoryError, RepositoryResult};

/// Eligibility rules for repositories and their manifests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerPolicy {
    /// Directory holding the manifests
    pub lists_path: String,
    /// License every repository must carry (SPDX, case-insensitive)
    pub required_license: String,
    /// Extension of manifest files
    pub list_extension: String,
    /// Extension of the release asset built from a manifest
    pub asset_extension: String,
    /// Assets older than this are considered abandoned
    #[serde(with = "humantime_serde")]
    pub freshness_window: Duration,
    /// Repositories younger than this are ignored
    #[serde(with = "humantime_serde")]
    pub min_repository_age: Duration,
    /// Largest acceptable asset in bytes
    pub max_asset_size: u64,
    /// Manifest file names that are never used
    pub ignored_files: Vec<String>,
}

impl Default for WalkerPolicy {
    fn default() -> Self {
        Self {
            lists_path: repository::LISTS_PATH.to_string(),
            required_license: policy::REQUIRED_LICENSE.to_string(),
            list_extension: policy::LIST_EXTENSION.to_string(),
            asset_extension: policy::ASSET_EXTENSION.to_string(),
            freshness_window: policy::FRESHNESS_WINDOW,
            min_repository_age: policy::MIN_REPOSITORY_AGE,
            max_asset_size: policy::MAX_ASSET_SIZE,
            ignored_files: policy::IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Why a single manifest file was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSkip {
    /// Not a non-empty plain file with the list extension, or ignored
    NotAList,
    /// No asset with the matching name in the latest release
    NotReleased { asset: String },
    /// Matching asset was not refreshed within the freshness window
    Outdated { asset: String },
    /// Matching asset is larger than allowed
    TooLarge { asset: String, size: u64 },
}

impl WalkerPolicy {
    /// Check the repository-level rules that do not need the API
    pub fn check_repository(&self, repo: &Repository, now: DateTime<Utc>) -> RepositoryResult<()> {
        let license_ok = repo
            .license
            .as_deref()
            .map(|id| id.eq_ignore_ascii_case(&self.required_license))
            .unwrap_or(false);
        if !license_ok {
            return Err(RepositoryError::IncompatibleLicense {
                required: self.required_license.clone(),
                found: repo.license.clone().unwrap_or_else(|| "none".to_string()),
            });
        }

        if let Some(created_at) = repo.created_at {
            let age = now.signed_duration_since(created_at);
            let too_young = age
                .to_std()
                .map(|age| age < self.min_repository_age)
                .unwrap_or(true);
            if too_young {
                return Err(RepositoryError::TooYoung {
                    age_hours: age.num_hours(),
                });
            }
        }

        Ok(())
    }

    /// Check one directory entry against the release, returning the asset
    /// name it is published as
    pub fn check_file(
        &self,
        entry: &ContentEntry,
        release: &Release,
        now: DateTime<Utc>,
    ) -> Result<String, FileSkip> {
        let stem = match entry.name.strip_suffix(self.list_extension.as_str()) {
            Some(stem) if entry.kind == EntryKind::File && entry.size > 0 => stem,
            _ => return Err(FileSkip::NotAList),
        };
        if self.ignored_files.iter().any(|ignored| *ignored == entry.name) {
            return Err(FileSkip::NotAList);
        }

        let asset_name = format!("{}{}", stem, self.asset_extension);
        let asset = release
            .asset(&asset_name)
            .ok_or_else(|| FileSkip::NotReleased {
                asset: asset_name.clone(),
            })?;

        let stale = now
            .signed_duration_since(asset.updated_at)
            .to_std()
            .map(|age| age > self.freshness_window)
            .unwrap_or(false);
        if stale {
            return Err(FileSkip::Outdated { asset: asset_name });
        }

        if asset.size > self.max_asset_size {
            return Err(FileSkip::TooLarge {
                asset: asset_name,
                size: asset.size,
            });
        }

        Ok(asset_name)
    }
}

/// Walks repositories and collects their manifests
pub struct RepositoryWalker {
    hosting: Arc<dyn HostingProvider>,
    source: Arc<dyn ListSource>,
    policy: WalkerPolicy,
}

impl RepositoryWalker {
    /// Create a walker
    pub fn new(
        hosting: Arc<dyn HostingProvider>,
        source: Arc<dyn ListSource>,
        policy: WalkerPolicy,
    ) -> Self {
        Self {
            hosting,
            source,
            policy,
        }
    }

    /// Collect the manifests of one repository
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` when the repository as a whole is not
    /// eligible. Problems with single files are logged and skipped.
    pub async fn walk(&self, repo: &Repository) -> RepositoryResult<Vec<Manifest>> {
        self.walk_at(repo, Utc::now()).await
    }

    /// Same as [`walk`](Self::walk) with an explicit current time
    pub async fn walk_at(
        &self,
        repo: &Repository,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Manifest>> {
        self.policy.check_repository(repo, now)?;

        let (owner, name) = (repo.owner.as_str(), repo.name.as_str());
        let lists_path = self.policy.lists_path.as_str();

        let entries = match self.hosting.get_contents(owner, name, lists_path).await? {
            Contents::Directory(entries) => entries,
            Contents::File(_) => {
                return Err(RepositoryError::NotADirectory {
                    path: lists_path.to_string(),
                })
            }
        };

        let release = self
            .hosting
            .get_latest_release(owner, name)
            .await
            .map_err(RepositoryError::NoRelease)?;
        if release.assets.is_empty() {
            return Err(RepositoryError::NoAssets);
        }

        let mut manifests = Vec::new();
        for entry in &entries {
            if let Some(manifest) = self.manifest_for(repo, entry, &release, now).await {
                manifests.push(manifest);
            }
        }

        debug!(
            "{}: {} manifests from {} entries",
            repo.full_name(),
            manifests.len(),
            entries.len()
        );
        Ok(manifests)
    }

    async fn manifest_for(
        &self,
        repo: &Repository,
        entry: &ContentEntry,
        release: &Release,
        now: DateTime<Utc>,
    ) -> Option<Manifest> {
        let full_name = repo.full_name();

        let asset_name = match self.policy.check_file(entry, release, now) {
            Ok(asset_name) => asset_name,
            Err(FileSkip::NotAList) => return None,
            Err(FileSkip::NotReleased { asset }) => {
                warn!(
                    "Looks like the list {:?} ({:?}) in {} is not being released",
                    entry.name, asset, full_name
                );
                return None;
            }
            Err(FileSkip::Outdated { asset }) => {
                warn!("Ignoring outdated asset {:?} in {}", asset, full_name);
                return None;
            }
            Err(FileSkip::TooLarge { asset, size }) => {
                warn!(
                    "Ignoring asset {:?} in {} because it's too large ({} bytes)",
                    asset, full_name, size
                );
                return None;
            }
        };

        let Some(list_url) = entry.download_url.as_deref() else {
            warn!("List {:?} in {} has no download URL", entry.name, full_name);
            return None;
        };

        let urls = match self.source.fetch_urls(list_url).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Requesting list {:?} in {}: {}", entry.name, full_name, e);
                return None;
            }
        };
        if urls.is_empty() {
            warn!(
                "List {:?} in {} doesn't define any filterlists we could download",
                entry.name, full_name
            );
            return None;
        }

        Some(Manifest {
            name: make_list_title(strip_extension(&entry.name)),
            filter_file_url: self
                .hosting
                .release_download_url(&repo.owner, &repo.name, &asset_name),
            stars: repo.stars,
            repo_owner: repo.owner.clone(),
            repo_name: repo.name.clone(),
            list_url: list_url.to_string(),
            urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use crate::app::hosting::{MockHosting, ReleaseAsset};
    use crate::errors::{FetchError, FetchResult};

    struct StaticLists(HashMap<String, Vec<String>>);

    #[async_trait]
    impl ListSource for StaticLists {
        async fn fetch_urls(&self, url: &str) -> FetchResult<Vec<String>> {
            self.0.get(url).cloned().ok_or_else(|| FetchError::ServerError {
                url: url.to_string(),
                status: 404,
            })
        }

        async fn fetch_title(&self, _url: &str) -> FetchResult<String> {
            Err(FetchError::NoTitle)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - chrono::Duration::days(days)
    }

    fn asset(name: &str, size: u64, age_days: i64) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            size,
            updated_at: days_ago(age_days),
        }
    }

    fn fork() -> Repository {
        Repository::new("friend", "filtrite")
            .with_license("mit")
            .with_stars(5)
            .with_created_at(days_ago(100))
    }

    fn raw(file: &str) -> String {
        format!("https://raw.example/friend/filtrite/lists/{}", file)
    }

    fn walker(hosting: MockHosting, lists: Vec<(String, Vec<&str>)>) -> RepositoryWalker {
        let lists = lists
            .into_iter()
            .map(|(url, urls)| (url, urls.into_iter().map(String::from).collect()))
            .collect();
        RepositoryWalker::new(
            Arc::new(hosting),
            Arc::new(StaticLists(lists)),
            WalkerPolicy::default(),
        )
    }

    fn standard_hosting() -> MockHosting {
        MockHosting::new()
            .with_contents(
                "friend",
                "filtrite",
                "lists",
                Contents::Directory(vec![
                    ContentEntry::file("bromite-extended.txt", 100, raw("bromite-extended.txt")),
                    ContentEntry::file("stale.txt", 100, raw("stale.txt")),
                    ContentEntry::file("huge.txt", 100, raw("huge.txt")),
                    ContentEntry::file("unreleased.txt", 100, raw("unreleased.txt")),
                    ContentEntry::file("empty.txt", 0, raw("empty.txt")),
                    ContentEntry::file("notes.md", 100, raw("notes.md")),
                    ContentEntry::file("bromite-default.txt", 100, raw("bromite-default.txt")),
                    ContentEntry::file("nothing.txt", 100, raw("nothing.txt")),
                    ContentEntry::file("broken.txt", 100, raw("broken.txt")),
                ]),
            )
            .with_release(
                "friend",
                "filtrite",
                Release {
                    tag_name: "latest".to_string(),
                    assets: vec![
                        asset("bromite-extended.dat", 1024, 1),
                        asset("stale.dat", 1024, 11),
                        asset("huge.dat", 11 * 1024 * 1024, 1),
                        asset("empty.dat", 1024, 1),
                        asset("bromite-default.dat", 1024, 1),
                        asset("nothing.dat", 1024, 1),
                        asset("broken.dat", 1024, 1),
                    ],
                },
            )
    }

    #[tokio::test]
    async fn test_walk_applies_file_rules() {
        let walker = walker(
            standard_hosting(),
            vec![
                (
                    raw("bromite-extended.txt"),
                    vec!["https://b.example/", "https://a.example/"],
                ),
                (raw("stale.txt"), vec!["https://stale.example/"]),
                (raw("huge.txt"), vec!["https://huge.example/"]),
                (raw("bromite-default.txt"), vec!["https://default.example/"]),
                (raw("nothing.txt"), vec![]),
            ],
        );

        let manifests = walker.walk_at(&fork(), now()).await.unwrap();
        assert_eq!(manifests.len(), 1);

        let manifest = &manifests[0];
        assert_eq!(manifest.name, "Bromite Extended");
        assert_eq!(manifest.stars, 5);
        assert_eq!(manifest.repository(), "friend/filtrite");
        assert_eq!(manifest.list_url, raw("bromite-extended.txt"));
        assert_eq!(
            manifest.filter_file_url,
            "https://mock.example/friend/filtrite/releases/latest/download/bromite-extended.dat"
        );
        assert_eq!(manifest.urls, vec!["https://b.example/", "https://a.example/"]);
    }

    #[tokio::test]
    async fn test_incompatible_license_is_rejected() {
        let walker = walker(standard_hosting(), vec![]);

        let gpl = fork().with_license("GPL-3.0");
        assert!(matches!(
            walker.walk_at(&gpl, now()).await,
            Err(RepositoryError::IncompatibleLicense { .. })
        ));

        let mut unlicensed = fork();
        unlicensed.license = None;
        assert!(matches!(
            walker.walk_at(&unlicensed, now()).await,
            Err(RepositoryError::IncompatibleLicense { found, .. }) if found == "none"
        ));
    }

    #[tokio::test]
    async fn test_young_repository_is_rejected() {
        let walker = walker(standard_hosting(), vec![]);
        let young = fork().with_created_at(now() - chrono::Duration::hours(20));
        assert!(matches!(
            walker.walk_at(&young, now()).await,
            Err(RepositoryError::TooYoung { age_hours: 20 })
        ));
    }

    #[tokio::test]
    async fn test_missing_release_and_assets() {
        let listing = Contents::Directory(vec![ContentEntry::file("a.txt", 1, raw("a.txt"))]);

        let no_release = MockHosting::new().with_contents("friend", "filtrite", "lists", listing.clone());
        assert!(matches!(
            walker(no_release, vec![]).walk_at(&fork(), now()).await,
            Err(RepositoryError::NoRelease(_))
        ));

        let no_assets = MockHosting::new()
            .with_contents("friend", "filtrite", "lists", listing)
            .with_release(
                "friend",
                "filtrite",
                Release {
                    tag_name: "v1".to_string(),
                    assets: vec![],
                },
            );
        assert!(matches!(
            walker(no_assets, vec![]).walk_at(&fork(), now()).await,
            Err(RepositoryError::NoAssets)
        ));
    }

    #[tokio::test]
    async fn test_lists_file_instead_of_directory() {
        let hosting = MockHosting::new().with_contents(
            "friend",
            "filtrite",
            "lists",
            Contents::File(ContentEntry::file("lists", 3, raw("lists"))),
        );
        assert!(matches!(
            walker(hosting, vec![]).walk_at(&fork(), now()).await,
            Err(RepositoryError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_check_file_reasons() {
        let policy = WalkerPolicy::default();
        let release = Release {
            tag_name: "v1".to_string(),
            assets: vec![asset("a.dat", 10, 3), asset("old.dat", 10, 30)],
        };

        let ok = ContentEntry::file("a.txt", 10, raw("a.txt"));
        assert_eq!(policy.check_file(&ok, &release, now()), Ok("a.dat".to_string()));

        let old = ContentEntry::file("old.txt", 10, raw("old.txt"));
        assert_eq!(
            policy.check_file(&old, &release, now()),
            Err(FileSkip::Outdated {
                asset: "old.dat".to_string()
            })
        );

        let mut dir = ContentEntry::file("a.txt", 10, raw("a.txt"));
        dir.kind = EntryKind::Dir;
        assert_eq!(policy.check_file(&dir, &release, now()), Err(FileSkip::NotAList));
    }
}
