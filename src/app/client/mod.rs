//! HTTP client for list manifests and filter files
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `http`: rate limited GET requests with status checking
//!
//! [`ListSource`] is the seam the repository walker and the title pool use
//! to reach the network; [`ListClient`] is its HTTP implementation.

use async_trait::async_trait;

use crate::app::manifest::parse_list_with_stats;
use crate::app::title::TitleScanner;
use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Remote access to list manifests and filter files
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Download a list manifest and return its sorted unique URLs
    async fn fetch_urls(&self, url: &str) -> FetchResult<Vec<String>>;

    /// Download the head of a filter file and return its declared title
    ///
    /// Returns `FetchError::NoTitle` when the file declares none.
    async fn fetch_title(&self, url: &str) -> FetchResult<String>;
}

/// HTTP client for downloading manifests and filter files
#[derive(Debug)]
pub struct ListClient {
    http_handler: HttpHandler,
}

impl ListClient {
    /// Creates a client with the default configuration
    pub fn new() -> FetchResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with a custom configuration
    pub fn with_config(config: &ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self {
            http_handler: HttpHandler::new(client, config.rate_limit_rps),
        })
    }
}

#[async_trait]
impl ListSource for ListClient {
    async fn fetch_urls(&self, url: &str) -> FetchResult<Vec<String>> {
        let url = HttpHandler::parse_url(url)?;
        let text = self.http_handler.get_text(&url).await?;

        let (urls, stats) = parse_list_with_stats(&text);
        tracing::debug!(
            "Parsed {}: {} URLs, {} lines skipped",
            url,
            urls.len(),
            stats.total_skipped()
        );
        Ok(urls)
    }

    async fn fetch_title(&self, url: &str) -> FetchResult<String> {
        let url = HttpHandler::parse_url(url)?;
        let mut response = self.http_handler.get_response(&url).await?;

        let mut scanner = TitleScanner::new();
        while let Some(chunk) = response.chunk().await? {
            if let Some(title) = scanner.feed(&chunk) {
                return Ok(title);
            }
        }

        scanner.finish().ok_or(FetchError::NoTitle)
    }
}
