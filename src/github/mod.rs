// src/github/mod.rs
// =============================================================================
// Everything that talks to (or about) GitHub.
//
// - repo_url: parse "https://github.com/owner/repo..." into a RepoRef
// - types: the parts of GitHub's JSON responses we read
// - client: the RepoSource trait and its reqwest implementation
// =============================================================================

mod client;
mod types;
mod repo_url;

pub use client::{
    ClientConfig, FetchError, GitHubClient, RepoSource, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
};
pub use types::{find_entry, ContentEntry, EntryType, RepoMetadata};
pub use repo_url::{parse_github_url, InvalidUrlError, RepoRef};
