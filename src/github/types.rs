// src/github/types.rs
// =============================================================================
// The small slice of GitHub's REST API responses this tool reads.
//
// GitHub returns many more fields than we care about. serde ignores any
// field not declared here, so these structs only name what the analysis
// actually looks at.
// =============================================================================

use serde::{Deserialize, Serialize};

/// GET /repos/{owner}/{repo}
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoMetadata {
    /// Primary language as computed by GitHub (null for empty repos)
    #[serde(default)]
    pub language: Option<String>,
}

/// Kind of an entry in a contents listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One element of GET /repos/{owner}/{repo}/contents
///
/// Serialized back out with GitHub's own field names, since the listing is
/// handed to callers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Finds the first entry with exactly this name
pub fn find_entry<'a>(listing: &'a [ContentEntry], name: &str) -> Option<&'a ContentEntry> {
    listing.iter().find(|entry| entry.name == name)
}
