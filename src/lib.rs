//! stargazer - Topic clustering for a GitHub user's starred repositories
//!
//! Two offline stages joined by a JSON file on disk:
//!
//! 1. **Fetch** ([`github::fetch_starred`]): walk the paginated
//!    `/users/{username}/starred` endpoint and save every record to
//!    `<username>_starred_repos.json`.
//! 2. **Analyze** ([`analysis::analyze`]): TF-IDF over each repository's
//!    topics, k-means, and a report in `clustering_analysis_<prefix>.txt`.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic driven by explicit config structs
//! - **bin/star_fetch.rs**, **bin/star_cluster.rs**: Thin wrappers that
//!   prompt for missing values, set up logging and call the library

pub mod analysis;
pub mod core;
pub mod github;
pub mod prompt;

pub use analysis::{analyze, AnalysisReport, ClusterSummary};
pub use crate::core::{
    AnalyzeConfig, FetchConfig, RepoInfo, Result, Settings, StarError, StarRecord,
};
pub use github::{fetch_starred, format_star_summary};

/// Crate version, shown by `--version` and sent in the User-Agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `tracing` subscriber used by both binaries.
///
/// The level comes from the command line only; no environment variables
/// are consulted. Events from this library and from both binaries' own
/// targets pass the filter.
pub fn init_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::new(log_directives(verbose));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter directives covering the library and the `star-fetch` and
/// `star-cluster` binary targets
fn log_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    ["stargazer", "star_fetch", "star_cluster"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_log_directives_cover_binaries() {
        assert_eq!(
            log_directives(false),
            "stargazer=info,star_fetch=info,star_cluster=info"
        );
        assert!(log_directives(true).contains("star_cluster=debug"));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
    }
}
