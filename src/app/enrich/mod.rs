//! Title enrichment
//!
//! Every distinct filter list URL gets a display title. Titles come from
//! the list itself when it declares one and from the URL otherwise.
//!
//! - `config`: pool sizing
//! - `pool`: fixed-size worker pool resolving titles concurrently

use std::collections::BTreeMap;

use tracing::debug;

use crate::app::client::ListSource;
use crate::app::title::fallback_title;

pub mod config;
pub mod pool;

pub use config::PoolConfig;
pub use pool::TitlePool;

/// Filter list URL to display title
pub type TitleMapping = BTreeMap<String, String>;

/// Resolve the title of one filter list
///
/// Returns `None` only when the list declares no title and the URL does not
/// yield one either.
pub async fn resolve_title(source: &dyn ListSource, url: &str) -> Option<String> {
    match source.fetch_title(url).await {
        Ok(title) => Some(title),
        Err(e) => {
            debug!("No title for {}: {}", url, e);
            fallback_title(url)
        }
    }
}
