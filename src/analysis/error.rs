// src/analysis/error.rs
// =============================================================================
// Failures that abort an analysis.
//
// Only these reach the caller. Anything that merely degrades the result
// (no listing, unreadable package.json or .env.example) is logged and
// absorbed inside the pipeline instead.
// =============================================================================

use thiserror::Error;

use crate::github::{FetchError, InvalidUrlError, RepoRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The input does not look like github.com/{owner}/{repo}
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrlError),

    /// GitHub answered 404: the repository does not exist or is private
    #[error("Repository not found or private: {0}")]
    RepositoryNotFound(RepoRef),

    /// GitHub answered the metadata request with another error status
    #[error("GitHub API error for {repo}: HTTP {status}")]
    RepositoryApi { repo: RepoRef, status: u16 },

    /// Network failure, timeout or garbled metadata
    #[error("Unexpected error while reading {repo}: {reason}")]
    Unexpected { repo: RepoRef, reason: String },
}

impl AnalysisError {
    /// Classifies a failed metadata request
    pub fn from_metadata_failure(repo: RepoRef, error: FetchError) -> Self {
        match error {
            FetchError::Status(404) => AnalysisError::RepositoryNotFound(repo),
            FetchError::Status(status) => AnalysisError::RepositoryApi { repo, status },
            other => AnalysisError::Unexpected {
                repo,
                reason: other.to_string(),
            },
        }
    }
}
