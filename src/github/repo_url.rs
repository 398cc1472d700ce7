// src/github/repo_url.rs
// =============================================================================
// Turns a user-supplied GitHub URL into an owner/repo pair.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - https://github.com/owner/repo.git/tree/main/src
//   - github.com/owner/repo?tab=readme
//
// Anything that is not shaped like github.com/{owner}/{repo} is rejected
// before a single network request is made.
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not look like a GitHub repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid GitHub URL: {0}")]
pub struct InvalidUrlError(pub String);

/// The owner/repo pair extracted from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// Parses a GitHub URL to extract owner and repository name
//
// Example:
//   "https://github.com/rust-lang/rust.git/tree/master" -> rust-lang / rust
pub fn parse_github_url(input: &str) -> Result<RepoRef, InvalidUrlError> {
    let invalid = || InvalidUrlError(input.to_string());

    // Remove common prefixes
    let url = input
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    let path = url.strip_prefix("github.com/").ok_or_else(invalid)?;

    // owner/repo[/anything...]
    let mut segments = path.split('/');
    let owner = segments.next().unwrap_or_default();
    let repo = segments.next().unwrap_or_default();

    // "repo?tab=readme" and "repo#install" still name the repo
    let repo = repo
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || repo.is_empty() {
        return Err(invalid());
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}
