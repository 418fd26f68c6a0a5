//! Run configuration
//!
//! Both stages take an explicit config struct instead of reading the console,
//! so the library can be driven from tests. The binaries fill these from
//! flags, an optional JSON settings file and interactive prompts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{Result, StarError};
use super::store::starred_repos_filename;

/// Default GitHub REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Media type that adds `starred_at` to each entry
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// Pinned REST API version
pub const API_VERSION: &str = "2022-11-28";

// =============================================================================
// Fetch
// =============================================================================

/// Configuration for the fetch stage
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// GitHub login whose stars are listed
    pub username: String,
    /// Personal access token, sent as `Authorization: token <pat>`
    pub token: String,
    /// API root, overridable for tests and GitHub Enterprise
    pub api_base: String,
    /// Directory the JSON file is written to
    pub output_dir: PathBuf,
    /// GitHub rejects requests without a User-Agent
    pub user_agent: String,
}

impl FetchConfig {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from("."),
            user_agent: format!("stargazer/{}", crate::VERSION),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Username and token are both required.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.token.trim().is_empty() {
            return Err(StarError::invalid_config("Username and PAT are required."));
        }
        Ok(())
    }

    /// First page of the starred collection
    pub fn starred_url(&self) -> String {
        format!(
            "{}/users/{}/starred",
            self.api_base.trim_end_matches('/'),
            self.username.trim()
        )
    }

    /// Where the fetched records are saved
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(starred_repos_filename(self.username.trim()))
    }
}

// =============================================================================
// Analyze
// =============================================================================

/// Configuration for the clustering stage
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// JSON file produced by the fetch stage
    pub input: PathBuf,
    /// Number of k-means clusters
    pub n_clusters: usize,
    /// Ignore terms present in more than this fraction of documents
    pub max_df: f64,
    /// Ignore terms present in fewer than this many documents
    pub min_df: usize,
    /// Representative terms reported per cluster
    pub top_terms: usize,
    /// K-means RNG seed
    pub seed: u64,
    /// Independent k-means restarts; the lowest inertia wins
    pub n_init: usize,
    /// Lloyd iterations per restart
    pub max_iter: usize,
    /// Relative convergence tolerance
    pub tolerance: f32,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            n_clusters: 5,
            max_df: 0.85,
            min_df: 2,
            top_terms: 5,
            seed: 42,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

impl AnalyzeConfig {
    pub fn new(input: impl Into<PathBuf>, n_clusters: usize) -> Self {
        Self {
            input: input.into(),
            n_clusters,
            ..Default::default()
        }
    }

    /// Config for the file the fetch stage wrote for `username` in `dir`
    pub fn for_user(dir: &Path, username: &str, n_clusters: usize) -> Self {
        Self::new(dir.join(starred_repos_filename(username.trim())), n_clusters)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(StarError::invalid_config("cluster count must be at least 1"));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(StarError::invalid_config(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.min_df == 0 {
            return Err(StarError::invalid_config("min_df must be at least 1"));
        }
        if self.top_terms == 0 {
            return Err(StarError::invalid_config("top_terms must be at least 1"));
        }
        if self.n_init == 0 || self.max_iter == 0 {
            return Err(StarError::invalid_config(
                "n_init and max_iter must be at least 1",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Settings File
// =============================================================================

/// Optional JSON settings file shared by both binaries.
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub n_clusters: Option<usize>,
    #[serde(default)]
    pub max_df: Option<f64>,
    #[serde(default)]
    pub min_df: Option<usize>,
    #[serde(default)]
    pub top_terms: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StarError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlay these settings onto an analysis config
    pub fn apply_to_analyze(&self, config: &mut AnalyzeConfig) {
        if let Some(n) = self.n_clusters {
            config.n_clusters = n;
        }
        if let Some(max_df) = self.max_df {
            config.max_df = max_df;
        }
        if let Some(min_df) = self.min_df {
            config.min_df = min_df;
        }
        if let Some(top) = self.top_terms {
            config.top_terms = top;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_config_requires_credentials() {
        assert!(FetchConfig::new("octocat", "ghp_x").validate().is_ok());

        let err = FetchConfig::new("", "ghp_x").validate().unwrap_err();
        assert!(err.to_string().contains("Username and PAT are required."));
        assert!(FetchConfig::new("octocat", "  ").validate().is_err());
    }

    #[test]
    fn test_starred_url() {
        let config = FetchConfig::new("octocat", "t");
        assert_eq!(
            config.starred_url(),
            "https://api.github.com/users/octocat/starred"
        );

        let config = config.with_api_base("http://127.0.0.1:1234/");
        assert_eq!(config.starred_url(), "http://127.0.0.1:1234/users/octocat/starred");
    }

    #[test]
    fn test_output_path() {
        let config = FetchConfig::new("octocat", "t").with_output_dir("/tmp/out");
        assert_eq!(
            config.output_path(),
            PathBuf::from("/tmp/out/octocat_starred_repos.json")
        );
    }

    #[test]
    fn test_analyze_defaults() {
        let config = AnalyzeConfig::default();
        assert_eq!(config.max_df, 0.85);
        assert_eq!(config.min_df, 2);
        assert_eq!(config.top_terms, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_init, 10);
        assert_eq!(config.max_iter, 300);
    }

    #[test]
    fn test_analyze_validation() {
        assert!(AnalyzeConfig::new("x.json", 3).validate().is_ok());
        assert!(AnalyzeConfig::new("x.json", 0).validate().is_err());

        let mut config = AnalyzeConfig::new("x.json", 3);
        config.max_df = 1.5;
        assert!(config.validate().is_err());

        let mut config = AnalyzeConfig::new("x.json", 3);
        config.min_df = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_user() {
        let config = AnalyzeConfig::for_user(Path::new("data"), "octocat", 4);
        assert_eq!(config.input, PathBuf::from("data/octocat_starred_repos.json"));
        assert_eq!(config.n_clusters, 4);
    }

    #[test]
    fn test_settings_load_and_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stargazer.json");
        std::fs::write(&path, r#"{"n_clusters": 7, "seed": 1, "api_base": "http://x"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.api_base.as_deref(), Some("http://x"));

        let mut config = AnalyzeConfig::new("x.json", 3);
        settings.apply_to_analyze(&mut config);
        assert_eq!(config.n_clusters, 7);
        assert_eq!(config.seed, 1);
        assert_eq!(config.max_df, 0.85);
    }

    #[test]
    fn test_settings_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stargazer.json");
        std::fs::write(&path, r#"{"clusters": 7}"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(StarError::Json(_))));
    }

    #[test]
    fn test_settings_missing_file() {
        let result = Settings::load(Path::new("/nonexistent/stargazer.json"));
        assert!(matches!(result, Err(StarError::FileNotFound { .. })));
    }
}
