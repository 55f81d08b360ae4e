//! Run orchestration
//!
//! The coordinator drives one generation run from the reference repository
//! to the written index:
//!
//! 1. load the reference repository and all of its forks
//! 2. walk every repository, most starred forks first
//! 3. deduplicate the collected manifests
//! 4. resolve titles for every distinct filter list URL
//! 5. render and atomically write the index
//!
//! - [`config`] - run configuration
//! - [`stats`] - run summary
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use filterlist_index::app::{Coordinator, CoordinatorConfig, GitHubClient, ListClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hosting = Arc::new(GitHubClient::new("token")?);
//! let source = Arc::new(ListClient::new()?);
//!
//! let config = CoordinatorConfig::default().with_snapshot_dir("snapshots");
//! let summary = Coordinator::new(config, hosting, source).run().await?;
//! println!("{} lists written", summary.manifests_retained);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stats;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::app::client::ListSource;
use crate::app::enrich::{TitleMapping, TitlePool};
use crate::app::hosting::{HostingProvider, Repository};
use crate::app::manifest::{deduplicate, unique_urls, Manifest};
use crate::app::output::{present, write_output};
use crate::app::snapshot::{load_json, save_json};
use crate::app::walker::RepositoryWalker;
use crate::constants::files;
use crate::errors::{OutputError, Result};

pub use config::{CoordinatorConfig, DefaultListConfig};
pub use stats::RunSummary;

/// Coordinates one generation run
pub struct Coordinator {
    config: CoordinatorConfig,
    hosting: Arc<dyn HostingProvider>,
    source: Arc<dyn ListSource>,
    progress: ProgressBar,
}

impl Coordinator {
    /// Create a coordinator over a hosting provider and a list source
    pub fn new(
        config: CoordinatorConfig,
        hosting: Arc<dyn HostingProvider>,
        source: Arc<dyn ListSource>,
    ) -> Self {
        Self {
            config,
            hosting,
            source,
            progress: ProgressBar::hidden(),
        }
    }

    /// Show title resolution progress on this bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run the complete generation
    ///
    /// # Errors
    ///
    /// Fails when the reference repository or its forks cannot be loaded,
    /// when no manifest survives, or when the index cannot be written.
    /// Problems with single repositories, files or URLs are logged only.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary {
            output_path: self.config.output_path.clone(),
            ..Default::default()
        };

        let repositories = self.load_repositories().await?;
        summary.repositories_checked = repositories.len();

        let mut manifests = Vec::new();
        if self.config.default_list.enabled {
            if let Some(manifest) = self.default_manifest().await {
                manifests.push(manifest);
            }
        }
        let (walked, used) = self.collect_manifests(&repositories).await;
        summary.repositories_used = used;
        manifests.extend(walked);
        summary.manifests_collected = manifests.len();

        self.save_snapshot(files::RAW_LISTS_SNAPSHOT, &manifests).await?;

        let manifests = deduplicate(manifests);
        summary.manifests_retained = manifests.len();
        info!(
            "Kept {} of {} manifests after removing duplicates",
            summary.manifests_retained, summary.manifests_collected
        );

        self.save_snapshot(files::DEDUPLICATED_LISTS_SNAPSHOT, &manifests)
            .await?;

        if manifests.is_empty() {
            return Err(OutputError::NoLists.into());
        }

        let urls = unique_urls(&manifests);
        summary.unique_urls = urls.len();

        let titles = TitlePool::new(Arc::clone(&self.source), self.config.pool.clone())
            .with_progress(self.progress.clone())
            .enrich(&urls)
            .await;
        summary.titles_resolved = titles
            .values()
            .filter(|title| !title.trim().is_empty())
            .count();

        self.save_snapshot(files::TITLES_SNAPSHOT, &titles).await?;

        let document = present(&manifests, &titles, Utc::now());
        write_output(&self.config.output_path, &document).await?;

        summary.duration = started.elapsed();
        Ok(summary)
    }

    /// Reference repository followed by its forks, most starred first
    async fn load_repositories(&self) -> Result<Vec<Repository>> {
        let (owner, repo) = (self.config.owner.as_str(), self.config.repo.as_str());

        info!("Loading {}/{} from {}", owner, repo, self.hosting.name());
        let main = self.hosting.get_repository(owner, repo).await?;

        let mut forks = self.hosting.list_forks(owner, repo).await?;
        forks.sort_by(|a, b| b.stars.cmp(&a.stars));
        info!("Found {} forks of {}", forks.len(), main.full_name());

        let mut repositories = Vec::with_capacity(forks.len() + 1);
        repositories.push(main);
        repositories.extend(forks);
        Ok(repositories)
    }

    /// Manifests of all eligible repositories and how many contributed
    async fn collect_manifests(&self, repositories: &[Repository]) -> (Vec<Manifest>, usize) {
        let walker = RepositoryWalker::new(
            Arc::clone(&self.hosting),
            Arc::clone(&self.source),
            self.config.walker.clone(),
        );

        let mut manifests = Vec::new();
        let mut used = 0;
        for repo in repositories {
            match walker.walk(repo).await {
                Ok(found) if found.is_empty() => {
                    debug!("{} has no usable lists", repo.full_name());
                }
                Ok(found) => {
                    info!("{}: {} lists", repo.full_name(), found.len());
                    used += 1;
                    manifests.extend(found);
                }
                Err(e) => warn!("Skipping {}: {}", repo.full_name(), e),
            }
        }
        (manifests, used)
    }

    async fn default_manifest(&self) -> Option<Manifest> {
        let list = &self.config.default_list;

        let urls = match self.source.fetch_urls(&list.list_url).await {
            Ok(urls) if !urls.is_empty() => urls,
            Ok(_) => {
                warn!("Default list {} is empty", list.list_url);
                return None;
            }
            Err(e) => {
                warn!("Requesting default list {}: {}", list.list_url, e);
                return None;
            }
        };

        let stars = match self.hosting.get_repository(&list.owner, &list.repo).await {
            Ok(repo) => repo.stars,
            Err(e) => {
                warn!("Loading {}/{} for the default list: {}", list.owner, list.repo, e);
                0
            }
        };

        Some(Manifest {
            name: list.name.clone(),
            filter_file_url: list.filter_file_url.clone(),
            stars,
            repo_owner: list.owner.clone(),
            repo_name: list.repo.clone(),
            list_url: list.list_url.clone(),
            urls,
        })
    }

    async fn save_snapshot<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        if let Some(path) = self.config.snapshot_path(name) {
            save_json(&path, value).await?;
        }
        Ok(())
    }
}

/// Rebuild the index from deduplicated manifest and title snapshots
///
/// Returns the number of lists written.
pub async fn render_snapshots(lists: &Path, titles: &Path, output: &Path) -> Result<usize> {
    let manifests: Vec<Manifest> = load_json(lists).await?;
    let titles: TitleMapping = load_json(titles).await?;

    let document = present(&manifests, &titles, Utc::now());
    write_output(output, &document).await?;
    Ok(document.lists.len())
}
