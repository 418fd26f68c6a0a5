//! Core module for stargazer
//!
//! Types shared by the fetch and cluster stages.
//!
//! # Architecture
//!
//! - `models`: Star records as returned by the GitHub API
//! - `error`: Error types using thiserror
//! - `config`: Explicit run configuration for both stages
//! - `store`: JSON persistence and file naming

pub mod models;
pub mod error;
pub mod config;
pub mod store;

// Re-export commonly used types
pub use models::{StarRecord, RepoInfo};
pub use error::{StarError, Result, ResultExt};
pub use config::{FetchConfig, AnalyzeConfig, Settings, DEFAULT_API_BASE};
pub use store::{load_records, save_records, starred_repos_filename, report_filename};
