// src/github/client.rs
// =============================================================================
// Outbound reads against the GitHub REST API.
//
// Three reads are needed per analysis:
//   - GET /repos/{owner}/{repo}            (metadata, must succeed)
//   - GET /repos/{owner}/{repo}/contents   (root listing, may fail)
//   - GET {download_url}                   (package.json, .env.example)
//
// The analysis pipeline only talks to the RepoSource trait, so tests can
// swap the real client for an in-memory one.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::types::{ContentEntry, RepoMetadata};
use super::repo_url::RepoRef;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Sent on every request; GitHub rejects API calls without a User-Agent
pub const USER_AGENT: &str = concat!("codeunbox/", env!("CARGO_PKG_VERSION"));

/// Why a single outbound call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Upstream answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),
    /// No answer within the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Connection, DNS or TLS failure
    #[error("request failed: {0}")]
    Transport(String),
    /// Answered, but the body was not what we expected
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_decode() {
            FetchError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

/// Read-only access to a hosted repository
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Repository metadata (primary language)
    async fn repository(&self, repo: &RepoRef) -> Result<RepoMetadata, FetchError>;

    /// First page of the root directory listing
    async fn contents(&self, repo: &RepoRef) -> Result<Vec<ContentEntry>, FetchError>;

    /// Raw text of a file, addressed by its download_url
    async fn raw_file(&self, url: &str) -> Result<String, FetchError>;
}

/// Settings for the GitHub client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (overridable for GitHub Enterprise or tests)
    pub api_url: Url,
    /// Upper bound on each individual request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default GitHub API URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// RepoSource backed by the public GitHub REST API (unauthenticated)
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: Url,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url,
        })
    }

    // Builds {api_url}/repos/{owner}/{repo}[/extra...]
    //
    // path_segments_mut percent-encodes each segment, so an odd owner or
    // repo name can never escape its slot in the path.
    fn repo_endpoint(&self, repo: &RepoRef, extra: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("unusable API base URL {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str()])
            .extend(extra);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "GitHub API request");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn repository(&self, repo: &RepoRef) -> Result<RepoMetadata, FetchError> {
        let url = self.repo_endpoint(repo, &[])?;
        self.get_json(url).await
    }

    async fn contents(&self, repo: &RepoRef) -> Result<Vec<ContentEntry>, FetchError> {
        let url = self.repo_endpoint(repo, &["contents"])?;
        self.get_json(url).await
    }

    async fn raw_file(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "raw file request");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
