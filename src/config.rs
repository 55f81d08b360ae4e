//! Configuration management for the filter list index generator
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command line flags. The access token is only
//! ever read from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::coordinator::{CoordinatorConfig, DefaultListConfig};
use crate::app::enrich::PoolConfig;
use crate::app::hosting::GitHubClient;
use crate::app::walker::WalkerPolicy;
use crate::app::ClientConfig;
use crate::constants::{env, files, github, repository};
use crate::errors::{ConfigError, ConfigResult, HostingError, HostingResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Reference repository and API endpoints
    pub github: GitHubConfig,
    /// HTTP client settings for list downloads
    pub client: ClientConfig,
    /// Repository and file eligibility rules
    pub walker: WalkerPolicy,
    /// Title pool settings
    pub pool: PoolConfig,
    /// Optional extra manifest
    pub default_list: DefaultListConfig,
    /// Output locations
    pub output: OutputConfig,
}

/// Reference repository and API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Owner of the reference repository
    pub owner: String,
    /// Name of the reference repository
    pub repo: String,
    /// REST API base URL
    pub api_base: String,
    /// Web base URL used for release download links
    pub web_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: repository::DEFAULT_OWNER.to_string(),
            repo: repository::DEFAULT_NAME.to_string(),
            api_base: github::API_BASE.to_string(),
            web_base: github::WEB_BASE.to_string(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSONP index file
    pub path: PathBuf,
    /// Directory for intermediate JSON snapshots
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(files::DEFAULT_OUTPUT_FILE),
            snapshot_dir: None,
        }
    }
}

/// Command line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub output: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    pub workers: Option<usize>,
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    ///
    /// Command line flags are applied afterwards with [`apply_overrides`](Self::apply_overrides).
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound { path }),
            Some(path) => Some(path),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.apply_environment(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        match Self::default_config_path() {
            Ok(path) => search_paths.push(path),
            Err(e) => debug!("{}", e),
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variables; blank values are ignored
    pub fn apply_environment<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(owner) = present(env::REPO_OWNER) {
            self.github.owner = owner;
        }
        if let Some(repo) = present(env::REPO_NAME) {
            self.github.repo = repo;
        }
        if let Some(output) = present(env::OUTPUT_FILE) {
            self.output.path = PathBuf::from(output);
        }
    }

    /// Apply command line flags
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(owner) = overrides.owner {
            self.github.owner = owner;
        }
        if let Some(repo) = overrides.repo {
            self.github.repo = repo;
        }
        if let Some(output) = overrides.output {
            self.output.path = output;
        }
        if overrides.snapshot_dir.is_some() {
            self.output.snapshot_dir = overrides.snapshot_dir;
        }
        if overrides.workers.is_some() {
            self.pool.worker_count = overrides.workers;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("github.api_base", &self.github.api_base),
            ("github.web_base", &self.github.web_base),
        ] {
            Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        if self.github.owner.trim().is_empty() || self.github.repo.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "github.owner/github.repo".to_string(),
                value: format!("{}/{}", self.github.owner, self.github.repo),
                reason: "Reference repository must be named".to_string(),
            });
        }

        self.pool.validate()
    }

    /// Runtime configuration for the coordinator
    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            owner: self.github.owner.clone(),
            repo: self.github.repo.clone(),
            walker: self.walker.clone(),
            pool: self.pool.clone(),
            default_list: self.default_list.clone(),
            output_path: self.output.path.clone(),
            snapshot_dir: self.output.snapshot_dir.clone(),
        }
    }

    /// GitHub client against the configured endpoints
    pub fn github_client(&self, token: &str) -> HostingResult<GitHubClient> {
        let web_base = Url::parse(&self.github.web_base).map_err(|e| {
            HostingError::Transport(format!("invalid web base: {}", e))
        })?;
        GitHubClient::with_bases(token, self.github.api_base.as_str(), web_base)
    }
}

/// Read the access token from the environment
pub fn token_from_env() -> ConfigResult<String> {
    token_from(|name| std::env::var(name).ok())
}

/// Read the access token through `lookup`; blank counts as missing
pub fn token_from<F>(lookup: F) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(env::TOKEN)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::MissingToken { var: env::TOKEN })
}
