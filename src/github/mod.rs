//! GitHub starred-repository fetcher
//!
//! Walks `GET /users/{username}/starred` page by page using the `star+json`
//! media type, so every entry carries its `starred_at` timestamp.
//!
//! Failure is all-or-nothing: if any page fails, the pages already read are
//! dropped and the error is returned. `Ok(vec![])` means the user really has
//! no stars.

pub mod client;
pub mod pagination;
pub mod summary;

pub use client::StarredClient;
pub use pagination::{parse_next_link, Page, PageFetcher, StarPages};
pub use summary::format_star_summary;

use crate::core::config::FetchConfig;
use crate::core::error::Result;
use crate::core::models::StarRecord;

/// Fetch every starred repository for `config.username`.
///
/// # Errors
///
/// * `InvalidConfig` - username or token missing
/// * `Http` - any page answered with a non-2xx status
/// * `Transport` - connection or protocol failure
/// * `Json` - a page body was not a list of star records
pub fn fetch_starred(config: &FetchConfig) -> Result<Vec<StarRecord>> {
    let client = StarredClient::new(config)?;
    let records = client.fetch_all()?;
    tracing::info!(
        username = %config.username,
        count = records.len(),
        "fetched starred repositories"
    );
    Ok(records)
}
