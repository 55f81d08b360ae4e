//! GitHub implementation of [`HostingProvider`] using the REST API.
//!
//! # Authentication
//!
//! Every request carries the caller-supplied token as a bearer token. The
//! token is never refreshed and never logged.
//!
//! # Pagination
//!
//! Fork listings are requested 100 per page and followed through the
//! `Link` header until no `rel="next"` page remains. The whole listing is
//! bounded by a fixed deadline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{ContentEntry, Contents, EntryKind, HostingProvider, Release, ReleaseAsset, Repository};
use crate::constants::{github, http};
use crate::errors::{HostingError, HostingResult};

/// GitHub REST client
pub struct GitHubClient {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token
    token: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
    /// Web base URL for release download links
    web_base: Url,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base.as_str())
            .finish()
    }
}

impl GitHubClient {
    /// Create a client for github.com
    pub fn new(token: impl Into<String>) -> HostingResult<Self> {
        let web_base = Url::parse(github::WEB_BASE)
            .map_err(|e| HostingError::Transport(format!("invalid web base: {}", e)))?;
        Self::with_bases(token, github::API_BASE, web_base)
    }

    /// Create a client against custom API and web base URLs
    pub fn with_bases(
        token: impl Into<String>,
        api_base: impl Into<String>,
        web_base: Url,
    ) -> HostingResult<Self> {
        let client = Client::builder()
            .timeout(http::DEFAULT_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            web_base,
        })
    }

    /// Build common headers for API requests.
    fn headers(&self) -> HostingResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| HostingError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(github::ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(http::USER_AGENT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(github::API_VERSION),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, owner: &str, name: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_base, owner, name)
        } else {
            format!("{}/repos/{}/{}/{}", self.api_base, owner, name, path)
        }
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> HostingResult<Response> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, status).await)
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> HostingResult<T> {
        let response = self.get(url, &[]).await?;
        let status = response.status();
        response.json().await.map_err(|e| HostingError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Map an error response from the API.
    async fn error_from_response(response: Response, status: StatusCode) -> HostingError {
        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false);

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => HostingError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limit_exhausted => HostingError::RateLimited,
            StatusCode::FORBIDDEN => HostingError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => HostingError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => HostingError::RateLimited,
            _ => HostingError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn list_forks_paginated(&self, owner: &str, name: &str) -> HostingResult<Vec<Repository>> {
        let url = self.repo_url(owner, name, "forks");
        let mut forks = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .get(
                    &url,
                    &[
                        ("per_page", github::PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await
                .map_err(|e| match e {
                    HostingError::Transport(msg) => {
                        HostingError::Transport(format!("loading fork page {}: {}", page, msg))
                    }
                    other => other,
                })?;

            let more = has_next_page(
                response
                    .headers()
                    .get(LINK)
                    .and_then(|v| v.to_str().ok()),
            );

            let batch: Vec<GitHubRepository> =
                response.json().await.map_err(|e| HostingError::Api {
                    status: 200,
                    message: format!("Failed to parse fork page {}: {}", page, e),
                })?;

            tracing::debug!("Fork page {} of {}/{}: {} entries", page, owner, name, batch.len());
            forks.extend(batch.into_iter().map(Repository::from));

            if !more {
                break;
            }
            page += 1;
        }

        Ok(forks)
    }
}

/// Whether a `Link` header advertises a next page
fn has_next_page(link: Option<&str>) -> bool {
    link.map(|value| {
        value
            .split(',')
            .any(|part| part.split(';').skip(1).any(|param| param.trim() == "rel=\"next\""))
    })
    .unwrap_or(false)
}

#[async_trait]
impl HostingProvider for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_repository(&self, owner: &str, name: &str) -> HostingResult<Repository> {
        let repo: GitHubRepository = self.get_json(&self.repo_url(owner, name, "")).await?;
        Ok(repo.into())
    }

    async fn list_forks(&self, owner: &str, name: &str) -> HostingResult<Vec<Repository>> {
        match tokio::time::timeout(
            github::FORK_LISTING_TIMEOUT,
            self.list_forks_paginated(owner, name),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(HostingError::Timeout {
                seconds: github::FORK_LISTING_TIMEOUT.as_secs(),
            }),
        }
    }

    async fn get_contents(&self, owner: &str, name: &str, path: &str) -> HostingResult<Contents> {
        let url = self.repo_url(owner, name, &format!("contents/{}", path.trim_matches('/')));
        let contents: GitHubContents = self.get_json(&url).await?;
        Ok(match contents {
            GitHubContents::Directory(entries) => {
                Contents::Directory(entries.into_iter().map(ContentEntry::from).collect())
            }
            GitHubContents::File(entry) => Contents::File(entry.into()),
        })
    }

    async fn get_latest_release(&self, owner: &str, name: &str) -> HostingResult<Release> {
        let release: GitHubRelease = self
            .get_json(&self.repo_url(owner, name, "releases/latest"))
            .await?;
        Ok(release.into())
    }

    fn release_download_url(&self, owner: &str, name: &str, asset: &str) -> String {
        let mut url = self.web_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([owner, name, "releases", "latest", "download", asset]);
        }
        url.to_string()
    }
}

// ============================================================================
// GitHub API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubLicense {
    spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    owner: GitHubOwner,
    license: Option<GitHubLicense>,
    #[serde(default)]
    stargazers_count: u64,
    created_at: Option<DateTime<Utc>>,
}

impl From<GitHubRepository> for Repository {
    fn from(gh: GitHubRepository) -> Self {
        Self {
            owner: gh.owner.login,
            name: gh.name,
            license: gh.license.and_then(|l| l.spdx_id),
            stars: gh.stargazers_count,
            created_at: gh.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GitHubContents {
    Directory(Vec<GitHubContentEntry>),
    File(GitHubContentEntry),
}

#[derive(Debug, Deserialize)]
struct GitHubContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    size: u64,
    download_url: Option<String>,
}

impl From<GitHubContentEntry> for ContentEntry {
    fn from(gh: GitHubContentEntry) -> Self {
        Self {
            name: gh.name,
            kind: gh.kind,
            size: gh.size,
            download_url: gh.download_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<GitHubAsset>,
}

#[derive(Debug, Deserialize)]
struct GitHubAsset {
    name: String,
    size: u64,
    updated_at: DateTime<Utc>,
}

impl From<GitHubRelease> for Release {
    fn from(gh: GitHubRelease) -> Self {
        Self {
            tag_name: gh.tag_name,
            assets: gh
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    name: a.name,
                    size: a.size,
                    updated_at: a.updated_at,
                })
                .collect(),
        }
    }
}
