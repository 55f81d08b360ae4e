//! Core HTTP operations with rate limiting
//!
//! Requests are plain GETs; a failed request is reported to the caller and
//! never retried.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::{Client, Response};
use url::Url;

use crate::errors::{FetchError, FetchResult};

/// Rate limiter type shared by all requests of one handler
type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: Option<DirectRateLimiter>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limit
    ///
    /// A rate limit of zero disables rate limiting.
    pub fn new(client: Client, rate_limit_rps: u32) -> Self {
        let rate_limiter = NonZeroU32::new(rate_limit_rps)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));
        Self {
            client,
            rate_limiter,
        }
    }

    /// Parses a URL string, mapping failures to `FetchError::InvalidUrl`
    pub fn parse_url(url: &str) -> FetchResult<Url> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })
    }

    /// Sends a GET request and checks the response status
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails or the server answers with
    /// a non-success status
    pub async fn get_response(&self, url: &Url) -> FetchResult<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
                .await;
        }

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::trace!("Fetched response: {}", url);
        Ok(response)
    }

    /// Fetches the whole body as text
    pub async fn get_text(&self, url: &Url) -> FetchResult<String> {
        let response = self.get_response(url).await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::config::ClientConfig;

    #[test]
    fn test_parse_url() {
        assert!(HttpHandler::parse_url("https://example.com/list.txt").is_ok());
        assert!(matches!(
            HttpHandler::parse_url("nope"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_handler_creation() {
        let client = ClientConfig::default().build_http_client().unwrap();
        let handler = HttpHandler::new(client.clone(), 5);
        assert!(handler.rate_limiter.is_some());

        let unlimited = HttpHandler::new(client, 0);
        assert!(unlimited.rate_limiter.is_none());
    }
}
