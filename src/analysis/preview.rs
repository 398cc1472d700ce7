// src/analysis/preview.rs
// =============================================================================
// Suggests external services that can preview a repository.
//
// Nothing is built or hosted here: each option is just a URL template
// filled in with the owner and repo. Which templates apply depends on the
// detected framework:
//
//   "Unknown"         -> nothing to suggest
//   "Static Website"  -> static hosting (GitHub Pages first)
//   anything else     -> online sandboxes (StackBlitz first)
// =============================================================================

use serde::{Deserialize, Serialize};

use super::framework::{STATIC_WEBSITE, UNKNOWN};
use crate::github::RepoRef;

/// A preview URL offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOption {
    pub name: String,
    pub url: String,
    pub is_primary: bool,
}

/// Placeholders: {owner}, {owner_lower}, {repo}
struct PreviewTemplate {
    name: &'static str,
    url: &'static str,
}

const SANDBOXES: &[PreviewTemplate] = &[
    PreviewTemplate {
        name: "StackBlitz",
        url: "https://stackblitz.com/github/{owner}/{repo}",
    },
    PreviewTemplate {
        name: "CodeSandbox",
        url: "https://codesandbox.io/p/github/{owner}/{repo}",
    },
    PreviewTemplate {
        name: "Gitpod",
        url: "https://gitpod.io/#https://github.com/{owner}/{repo}",
    },
];

const STATIC_HOSTS: &[PreviewTemplate] = &[
    PreviewTemplate {
        name: "GitHub Pages",
        url: "https://{owner_lower}.github.io/{repo}/",
    },
    PreviewTemplate {
        name: "raw.githack",
        url: "https://raw.githack.com/{owner}/{repo}/HEAD/index.html",
    },
    PreviewTemplate {
        name: "HTML Preview",
        url: "https://htmlpreview.github.io/?https://github.com/{owner}/{repo}/blob/HEAD/index.html",
    },
];

fn templates_for(framework: &str) -> &'static [PreviewTemplate] {
    match framework {
        UNKNOWN => &[],
        STATIC_WEBSITE => STATIC_HOSTS,
        _ => SANDBOXES,
    }
}

/// All preview options for a framework, primary first
pub fn preview_options(framework: &str, repo: &RepoRef) -> Vec<PreviewOption> {
    templates_for(framework)
        .iter()
        .enumerate()
        .map(|(index, template)| PreviewOption {
            name: template.name.to_string(),
            url: template
                .url
                .replace("{owner_lower}", &repo.owner.to_lowercase())
                .replace("{owner}", &repo.owner)
                .replace("{repo}", &repo.repo),
            is_primary: index == 0,
        })
        .collect()
}

/// URL of the primary option, if the framework has any
pub fn primary_preview_url(framework: &str, repo: &RepoRef) -> Option<String> {
    preview_options(framework, repo)
        .into_iter()
        .find(|option| option.is_primary)
        .map(|option| option.url)
}
