//! Configuration structures for a generation run

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::enrich::PoolConfig;
use crate::app::walker::WalkerPolicy;
use crate::constants::{default_list, files, repository};

/// Extra manifest that is not published by any fork
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultListConfig {
    /// Include the list in the index
    pub enabled: bool,
    /// Display name
    pub name: String,
    /// Repository whose star count the list is shown with
    pub owner: String,
    pub repo: String,
    /// Manifest to download
    pub list_url: String,
    /// Compiled filter file offered for download
    pub filter_file_url: String,
}

impl Default for DefaultListConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: default_list::NAME.to_string(),
            owner: default_list::OWNER.to_string(),
            repo: default_list::REPO.to_string(),
            list_url: default_list::LIST_URL.to_string(),
            filter_file_url: default_list::FILTER_FILE_URL.to_string(),
        }
    }
}

/// Configuration for the run coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Owner of the reference repository
    pub owner: String,
    /// Name of the reference repository
    pub repo: String,
    /// Repository and file eligibility rules
    pub walker: WalkerPolicy,
    /// Title pool sizing
    pub pool: PoolConfig,
    /// Optional extra manifest
    pub default_list: DefaultListConfig,
    /// Where the JSONP index is written
    pub output_path: PathBuf,
    /// Directory for intermediate JSON snapshots, none to skip them
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            owner: repository::DEFAULT_OWNER.to_string(),
            repo: repository::DEFAULT_NAME.to_string(),
            walker: WalkerPolicy::default(),
            pool: PoolConfig::default(),
            default_list: DefaultListConfig::default(),
            output_path: PathBuf::from(files::DEFAULT_OUTPUT_FILE),
            snapshot_dir: None,
        }
    }
}

impl CoordinatorConfig {
    /// Use a different reference repository
    pub fn with_repository(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.repo = repo.into();
        self
    }

    /// Write the index to `path`
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Save intermediate snapshots in `dir`
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Run the title pool with a fixed number of workers
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.pool.worker_count = Some(count);
        self
    }

    /// Path of the snapshot called `name`, if snapshots are enabled
    pub fn snapshot_path(&self, name: &str) -> Option<PathBuf> {
        self.snapshot_dir.as_ref().map(|dir| dir.join(name))
    }
}
