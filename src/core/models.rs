//! Core data structures for stargazer
//!
//! Records mirror the `application/vnd.github.v3.star+json` representation of
//! the starred endpoint. Fields the pipeline does not read are kept in `extra`
//! so a fetched page survives a save/load cycle unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Keep an explicit `null` as `Some(Value::Null)`; only an absent key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// One entry returned by the starred endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// When the user starred the repository (ISO-8601 string as sent by the API)
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub starred_at: Option<Value>,
    /// The starred repository
    pub repo: RepoInfo,
    /// Any other top-level fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Repository attributes used downstream.
///
/// Fields are raw JSON so that `null` and absent keys both survive a
/// save/load cycle; the accessors give the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    /// `owner/name`, unique per repository
    pub full_name: String,
    /// Primary language, `null` when GitHub could not detect one
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub language: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stargazers_count: Option<Value>,
    /// Topic tags; hand-edited files may carry `null` or a non-array here
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub topics: Option<Value>,
    /// Any other repository fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepoInfo {
    /// Create a repository with just a name and topics
    pub fn new(full_name: impl Into<String>, topics: &[&str]) -> Self {
        Self {
            full_name: full_name.into(),
            language: None,
            stargazers_count: None,
            topics: Some(Value::Array(
                topics.iter().map(|t| Value::String(t.to_string())).collect(),
            )),
            extra: Map::new(),
        }
    }

    pub fn language_name(&self) -> Option<&str> {
        self.language.as_ref().and_then(Value::as_str)
    }

    pub fn star_count(&self) -> Option<u64> {
        self.stargazers_count.as_ref().and_then(Value::as_u64)
    }

    /// Normalized topic tags.
    ///
    /// An absent or non-array `topics` value yields an empty list; non-string
    /// array elements are skipped.
    pub fn topic_list(&self) -> Vec<String> {
        match &self.topics {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl StarRecord {
    /// Wrap a repository into a record starred at the given timestamp
    pub fn new(repo: RepoInfo, starred_at: impl Into<String>) -> Self {
        Self {
            starred_at: Some(Value::String(starred_at.into())),
            repo,
            extra: Map::new(),
        }
    }

    pub fn starred_at_str(&self) -> Option<&str> {
        self.starred_at.as_ref().and_then(Value::as_str)
    }
}
