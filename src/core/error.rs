//! Error types for stargazer
//!
//! This module provides structured error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::algorithms::ClusteringError;

/// Result type alias for stargazer operations
pub type Result<T> = std::result::Result<T, StarError>;

/// Errors that can occur while fetching or analyzing starred repositories
#[derive(Error, Debug)]
pub enum StarError {
    /// The API answered with a non-success status
    #[error("HTTP Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS or protocol failure before a status was received
    #[error("An error occurred: {0}")]
    Transport(String),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input file not found
    #[error("The file '{}' was not found. Please run star-fetch first to create it.", path.display())]
    FileNotFound { path: PathBuf },

    /// Nothing left to cluster after dropping repositories without topics
    #[error("No repositories with topics were found in the data. Clustering cannot be performed.")]
    NoTopics,

    /// Vectorizer could not build a usable vocabulary
    #[error("Vectorization failed: {message}")]
    Vectorize { message: String },

    /// K-means rejected its input
    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StarError>,
    },
}

impl StarError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StarError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        StarError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a vectorizer error
    pub fn vectorize(message: impl Into<String>) -> Self {
        StarError::Vectorize {
            message: message.into(),
        }
    }

    /// Strip context wrappers to reach the originating error
    pub fn root(&self) -> &StarError {
        match self {
            StarError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for StarError {
    fn from(err: reqwest::Error) -> Self {
        StarError::Transport(err.to_string())
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
