// src/analysis/mod.rs
// =============================================================================
// The repository inspection pipeline.
//
// One call to analyze_repo() does, in order:
//   1. parse the URL into owner/repo        (bad URL -> error, no network)
//   2. read repository metadata             (failure -> error)
//   3. read the root listing                (failure -> empty listing)
//   4. read package.json and .env.example   (concurrently, if listed)
//   5. detect framework, extract env vars, pick a preview link
//   6. assemble the AnalysisResult
//
// Nothing is kept between calls, so analyzing the same unchanged
// repository twice gives the same result.
//
// Submodules:
// - framework: project type / language heuristics
// - env: .env.example parsing
// - preview: external preview link table
// - error: the fatal error type
// =============================================================================

mod env;
mod error;
mod framework;
mod preview;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::github::{find_entry, parse_github_url, ContentEntry, FetchError, RepoSource};

pub use env::extract_env_vars;
pub use error::AnalysisError;
pub use framework::{detect_framework, Detection, PackageJson, PackageManifest};
pub use preview::{preview_options, primary_preview_url, PreviewOption};

/// At most this many listing entries are returned to the caller
pub const MAX_LISTED_FILES: usize = 10;

/// Lifecycle of an analysis as shown to the user.
///
/// analyze_repo() itself only ever produces Success; Pending and Building
/// are the states a client shows while waiting, Error the one it shows
/// when the request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Pending,
    Building,
    Success,
    Error,
}

/// Summary of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub name: String,
    pub framework: String,
    pub language: String,
    /// A literal `.env` file is committed to the repository root
    pub has_env_file: bool,
    /// Variable names declared in `.env.example`
    pub env_vars_needed: Vec<String>,
    pub build_status: BuildStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// First entries of the root listing
    pub files: Vec<ContentEntry>,
}

impl AnalysisResult {
    /// The record shown in place of a result when analysis fails
    pub fn failed() -> Self {
        Self {
            name: "Analysis Failed".to_string(),
            framework: "Error".to_string(),
            language: "Error".to_string(),
            has_env_file: false,
            env_vars_needed: Vec::new(),
            build_status: BuildStatus::Error,
            preview_url: None,
            files: Vec::new(),
        }
    }
}

/// Analyzes the GitHub repository behind `repo_url`.
pub async fn analyze_repo(
    source: &dyn RepoSource,
    repo_url: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let repo = parse_github_url(repo_url)?;
    info!(%repo, "analyzing repository");

    let metadata = source
        .repository(&repo)
        .await
        .map_err(|e| AnalysisError::from_metadata_failure(repo.clone(), e))?;

    let listing = match source.contents(&repo).await {
        Ok(listing) => listing,
        Err(e) => {
            warn!(%repo, error = %e, "could not list repository contents, continuing without them");
            Vec::new()
        }
    };

    let (manifest, env_vars_needed) = futures::join!(
        read_manifest(source, find_entry(&listing, "package.json")),
        read_env_example(source, find_entry(&listing, ".env.example"))
    );

    let Detection {
        framework,
        language,
    } = detect_framework(&listing, &manifest, metadata.language.as_deref());
    let preview_url = primary_preview_url(&framework, &repo);
    let has_env_file = find_entry(&listing, ".env").is_some();

    info!(%repo, %framework, %language, "analysis complete");

    Ok(AnalysisResult {
        name: repo.repo,
        framework,
        language,
        has_env_file,
        env_vars_needed,
        build_status: BuildStatus::Success,
        preview_url,
        files: listing.into_iter().take(MAX_LISTED_FILES).collect(),
    })
}

/// Parses a repository URL and lists every preview option for the
/// framework it was detected as. Used by the CLI to show alternatives to
/// the primary link.
pub fn preview_options_for(repo_url: &str, framework: &str) -> Vec<PreviewOption> {
    match parse_github_url(repo_url) {
        Ok(repo) => preview_options(framework, &repo),
        Err(_) => Vec::new(),
    }
}

async fn read_manifest(source: &dyn RepoSource, entry: Option<&ContentEntry>) -> PackageManifest {
    let Some(entry) = entry else {
        return PackageManifest::Missing;
    };

    match read_listed_file(source, entry).await {
        Ok(text) => PackageManifest::from_text(&text),
        Err(e) => {
            warn!(error = %e, "could not download package.json");
            PackageManifest::Unreadable
        }
    }
}

async fn read_env_example(source: &dyn RepoSource, entry: Option<&ContentEntry>) -> Vec<String> {
    let Some(entry) = entry else {
        return Vec::new();
    };

    match read_listed_file(source, entry).await {
        Ok(text) => extract_env_vars(&text),
        Err(e) => {
            warn!(error = %e, "could not download .env.example");
            Vec::new()
        }
    }
}

async fn read_listed_file(
    source: &dyn RepoSource,
    entry: &ContentEntry,
) -> Result<String, FetchError> {
    let url = entry
        .download_url
        .as_deref()
        .ok_or_else(|| FetchError::Decode(format!("{} has no download_url", entry.name)))?;
    source.raw_file(url).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::github::{EntryType, RepoMetadata, RepoRef};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory RepoSource for pipeline and server tests
    pub(crate) struct FakeSource {
        pub metadata: Result<RepoMetadata, FetchError>,
        pub contents: Result<Vec<ContentEntry>, FetchError>,
        pub files: HashMap<String, Result<String, FetchError>>,
        pub calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn new(language: Option<&str>) -> Self {
            Self {
                metadata: Ok(RepoMetadata {
                    language: language.map(str::to_string),
                }),
                contents: Ok(Vec::new()),
                files: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_file(mut self, name: &str, body: &str) -> Self {
            self.push_entry(name);
            self.files.insert(raw_url(name), Ok(body.to_string()));
            self
        }

        pub fn with_failing_file(mut self, name: &str, error: FetchError) -> Self {
            self.push_entry(name);
            self.files.insert(raw_url(name), Err(error));
            self
        }

        pub fn with_listed(mut self, name: &str) -> Self {
            self.push_entry(name);
            self
        }

        fn push_entry(&mut self, name: &str) {
            if let Ok(listing) = &mut self.contents {
                listing.push(file_entry(name));
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub(crate) fn raw_url(name: &str) -> String {
        format!("https://raw.example/{name}")
    }

    pub(crate) fn file_entry(name: &str) -> ContentEntry {
        ContentEntry {
            name: name.to_string(),
            entry_type: EntryType::File,
            size: Some(42),
            download_url: Some(raw_url(name)),
            html_url: Some(format!("https://github.com/octo/demo/blob/main/{name}")),
        }
    }

    #[async_trait]
    impl RepoSource for FakeSource {
        async fn repository(&self, _repo: &RepoRef) -> Result<RepoMetadata, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.metadata.clone()
        }

        async fn contents(&self, _repo: &RepoRef) -> Result<Vec<ContentEntry>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.contents.clone()
        }

        async fn raw_file(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        }
    }

    const URL: &str = "https://github.com/octo/demo.git";

    #[tokio::test]
    async fn test_next_app_with_env_files() {
        let source = FakeSource::new(Some("JavaScript"))
            .with_file(
                "package.json",
                r#"{"dependencies": {"next": "14.0.0", "react": "18.2.0"}}"#,
            )
            .with_file(".env.example", "A=1\n# comment\nB=2\nBADLINE\n")
            .with_listed(".env");

        let result = analyze_repo(&source, URL).await.unwrap();

        assert_eq!(result.name, "demo");
        assert_eq!(result.framework, "Next.js");
        assert_eq!(result.language, "TypeScript");
        assert!(result.has_env_file);
        assert_eq!(result.env_vars_needed, vec!["A", "B"]);
        assert_eq!(result.build_status, BuildStatus::Success);
        assert_eq!(
            result.preview_url.as_deref(),
            Some("https://stackblitz.com/github/octo/demo")
        );
        assert_eq!(result.files.len(), 3);
    }

    #[tokio::test]
    async fn test_vue_only() {
        let source = FakeSource::new(None)
            .with_file("package.json", r#"{"dependencies": {"vue": "^3.4.0"}}"#);

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.framework, "Vue.js");
        assert_eq!(result.language, "TypeScript");
        assert!(!result.has_env_file);
        assert!(result.env_vars_needed.is_empty());
    }

    #[tokio::test]
    async fn test_static_site() {
        let source = FakeSource::new(Some("HTML"))
            .with_listed("index.html")
            .with_listed("style.css");

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.framework, "Static Website");
        assert_eq!(result.language, "JavaScript");
        assert_eq!(
            result.preview_url.as_deref(),
            Some("https://octo.github.io/demo/")
        );
    }

    #[tokio::test]
    async fn test_env_example_without_dot_env() {
        let source = FakeSource::new(Some("Rust")).with_file(".env.example", "TOKEN=\n");

        let result = analyze_repo(&source, URL).await.unwrap();
        assert!(!result.has_env_file);
        assert_eq!(result.env_vars_needed, vec!["TOKEN"]);
    }

    #[tokio::test]
    async fn test_unreadable_optional_files_degrade() {
        let source = FakeSource::new(Some("TypeScript"))
            .with_failing_file("package.json", FetchError::Timeout)
            .with_failing_file(".env.example", FetchError::Status(500));

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.framework, "Node.js");
        assert_eq!(result.language, "TypeScript");
        assert!(result.env_vars_needed.is_empty());
        assert_eq!(result.build_status, BuildStatus::Success);
    }

    #[tokio::test]
    async fn test_invalid_package_json_is_node() {
        let source = FakeSource::new(Some("JavaScript")).with_file("package.json", "{oops");

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.framework, "Node.js");
        assert_eq!(result.language, "JavaScript");
    }

    #[tokio::test]
    async fn test_contents_failure_falls_back_to_metadata() {
        let mut source = FakeSource::new(Some("Go"));
        source.contents = Err(FetchError::Status(403));

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.build_status, BuildStatus::Success);
        assert!(result.files.is_empty());
        assert_eq!(result.framework, "Go");
        assert_eq!(result.language, "Go");
    }

    #[tokio::test]
    async fn test_unknown_repo_has_no_preview() {
        let mut source = FakeSource::new(None);
        source.contents = Err(FetchError::Timeout);

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.framework, "Unknown");
        assert_eq!(result.language, "Unknown");
        assert_eq!(result.preview_url, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("previewUrl").is_none());
    }

    #[tokio::test]
    async fn test_files_capped_at_ten() {
        let mut source = FakeSource::new(Some("C"));
        for i in 0..25 {
            source = source.with_listed(&format!("file{i}.c"));
        }

        let result = analyze_repo(&source, URL).await.unwrap();
        assert_eq!(result.files.len(), MAX_LISTED_FILES);
        assert_eq!(result.files[0].name, "file0.c");
        assert_eq!(result.files[9].name, "file9.c");
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_calls() {
        let source = FakeSource::new(Some("Rust"));

        for url in ["https://gitlab.com/octo/demo", "https://github.com/octo", "demo"] {
            let err = analyze_repo(&source, url).await.unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidUrl(_)), "got {err:?}");
        }
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_failures_are_fatal() {
        let mut source = FakeSource::new(None);
        source.metadata = Err(FetchError::Status(404));
        let err = analyze_repo(&source, URL).await.unwrap_err();
        assert!(matches!(err, AnalysisError::RepositoryNotFound(_)));
        // the listing is never requested once metadata has failed
        assert_eq!(source.calls(), 1);

        source.metadata = Err(FetchError::Status(502));
        let err = analyze_repo(&source, URL).await.unwrap_err();
        assert!(matches!(err, AnalysisError::RepositoryApi { status: 502, .. }));

        source.metadata = Err(FetchError::Transport("connection refused".to_string()));
        let err = analyze_repo(&source, URL).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Unexpected { .. }));
    }

    #[tokio::test]
    async fn test_same_input_same_result() {
        let source = FakeSource::new(Some("JavaScript"))
            .with_file("package.json", r#"{"dependencies": {"express": "4"}}"#)
            .with_file(".env.example", "PORT=3000\nDB=\n");

        let first = analyze_repo(&source, URL).await.unwrap();
        let second = analyze_repo(&source, "https://github.com/octo/demo").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.framework, "Express.js");
    }

    #[test]
    fn test_result_json_shape() {
        let result = AnalysisResult {
            name: "demo".to_string(),
            framework: "React".to_string(),
            language: "TypeScript".to_string(),
            has_env_file: true,
            env_vars_needed: vec!["A".to_string()],
            build_status: BuildStatus::Success,
            preview_url: Some("https://stackblitz.com/github/octo/demo".to_string()),
            files: vec![file_entry("package.json")],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["hasEnvFile"], true);
        assert_eq!(json["envVarsNeeded"][0], "A");
        assert_eq!(json["buildStatus"], "success");
        assert_eq!(json["previewUrl"], "https://stackblitz.com/github/octo/demo");
        assert_eq!(json["files"][0]["type"], "file");
        assert_eq!(json["files"][0]["download_url"], "https://raw.example/package.json");
    }

    #[test]
    fn test_failed_record() {
        let failed = AnalysisResult::failed();
        assert_eq!(failed.build_status, BuildStatus::Error);
        assert_eq!(failed.framework, "Error");
        assert!(failed.files.is_empty());
    }

    #[test]
    fn test_preview_options_for() {
        let options = preview_options_for(URL, "Static Website");
        assert_eq!(options.len(), 3);
        assert!(preview_options_for("nope", "React").is_empty());
    }
}
