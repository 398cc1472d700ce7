// src/analysis/framework.rs
// =============================================================================
// Guesses what kind of project a repository is from its root listing.
//
// Checks run in this order, first match wins:
//   1. package.json        -> JS framework from its dependencies
//   2. requirements.txt    -> Python
//   3. Dockerfile          -> Docker
//   4. .html / .js / .css  -> Static Website
//   5. GitHub's own language for the repository
//
// Every Node project is reported as TypeScript, even a plain JavaScript
// one. Callers rely on that label, so it stays.
// =============================================================================

use std::collections::HashMap;

use serde::Deserialize;

use crate::github::{find_entry, ContentEntry};

pub const UNKNOWN: &str = "Unknown";
pub const STATIC_WEBSITE: &str = "Static Website";

/// Dependency name -> framework label, checked top to bottom.
/// next sits above react because every Next.js app also depends on react.
const NODE_FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "Next.js"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("express", "Express.js"),
    ("svelte", "Svelte"),
];

const STATIC_EXTENSIONS: &[&str] = &[".html", ".js", ".css"];

/// The only part of package.json we look at
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub dependencies: Option<HashMap<String, serde_json::Value>>,
}

/// What we know about the repository's package.json
#[derive(Debug, Clone)]
pub enum PackageManifest {
    /// No package.json in the root listing
    Missing,
    /// Listed, but it could not be downloaded or parsed
    Unreadable,
    Parsed(PackageJson),
}

impl PackageManifest {
    /// Parses raw package.json text, degrading to Unreadable on bad JSON
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<PackageJson>(text) {
            Ok(package) => PackageManifest::Parsed(package),
            Err(e) => {
                tracing::warn!(error = %e, "package.json is not valid JSON");
                PackageManifest::Unreadable
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub framework: String,
    pub language: String,
}

impl Detection {
    fn new(framework: &str, language: &str) -> Self {
        Self {
            framework: framework.to_string(),
            language: language.to_string(),
        }
    }
}

/// Classifies a repository from its listing, its package.json (if any) and
/// the primary language GitHub reports for it.
pub fn detect_framework(
    listing: &[ContentEntry],
    manifest: &PackageManifest,
    metadata_language: Option<&str>,
) -> Detection {
    let fallback_language = metadata_language.unwrap_or(UNKNOWN);

    match manifest {
        PackageManifest::Parsed(package) => {
            return Detection::new(node_framework(package), "TypeScript");
        }
        // A package.json we can't read still says "this is a Node project"
        PackageManifest::Unreadable => return Detection::new("Node.js", fallback_language),
        PackageManifest::Missing => {}
    }

    if find_entry(listing, "requirements.txt").is_some() {
        return Detection::new("Python", "Python");
    }

    if find_entry(listing, "Dockerfile").is_some() {
        return Detection::new("Docker", fallback_language);
    }

    if listing.iter().any(is_static_asset) {
        return Detection::new(STATIC_WEBSITE, "JavaScript");
    }

    Detection::new(fallback_language, fallback_language)
}

fn node_framework(package: &PackageJson) -> &'static str {
    let Some(dependencies) = &package.dependencies else {
        return UNKNOWN;
    };

    NODE_FRAMEWORKS
        .iter()
        .find(|(dependency, _)| dependencies.contains_key(*dependency))
        .map(|(_, framework)| *framework)
        .unwrap_or(UNKNOWN)
}

fn is_static_asset(entry: &ContentEntry) -> bool {
    entry.is_file()
        && STATIC_EXTENSIONS
            .iter()
            .any(|extension| entry.name.ends_with(extension))
}
