//! Prelude module for the filter list index library
//!
//! Re-exports the items most integrations need, so that a single
//! `use filterlist_index::prelude::*;` is enough for typical usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use filterlist_index::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let hosting = Arc::new(config.github_client(&token_from_env()?)?);
//!     let source = Arc::new(ListClient::with_config(&config.client)?);
//!
//!     Coordinator::new(config.to_coordinator_config(), hosting, source)
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    ClientConfig, Coordinator, CoordinatorConfig, GitHubClient, HostingProvider, ListClient,
    ListSource, Manifest, MockHosting, OutputDocument, PoolConfig, Repository, RunSummary,
    TitleMapping, TitlePool, WalkerPolicy,
};

// Configuration
pub use crate::config::{token_from_env, AppConfig};

// Commonly used constants
pub use crate::constants::{DEFAULT_OUTPUT_FILE, ENV_TOKEN, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;
