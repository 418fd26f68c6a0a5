//! Link-header pagination
//!
//! GitHub paginates list endpoints with an RFC 8288 `Link` header:
//!
//! ```text
//! <https://api.github.com/user/1/starred?page=2>; rel="next", <https://api.github.com/user/1/starred?page=9>; rel="last"
//! ```
//!
//! [`StarPages`] follows `rel="next"` until it disappears.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::Result;
use crate::core::models::StarRecord;

lazy_static! {
    // One `<url>; param; param` entry. URLs never contain `>`.
    static ref LINK_ENTRY: Regex = Regex::new(r"<([^>]*)>([^<]*)").unwrap();
    static ref REL_PARAM: Regex = Regex::new(r#"(?i)\brel\s*=\s*(?:"([^"]*)"|([^\s;,]+))"#).unwrap();
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// A `rel` may hold several space-separated relation types
/// (`rel="next last"`); any of them matching `next` counts.
pub fn parse_next_link(header: &str) -> Option<String> {
    LINK_ENTRY.captures_iter(header).find_map(|entry| {
        let url = entry.get(1)?.as_str().trim();
        let params = entry.get(2).map(|m| m.as_str()).unwrap_or("");

        let is_next = REL_PARAM.captures_iter(params).any(|rel| {
            rel.get(1)
                .or_else(|| rel.get(2))
                .map(|v| v.as_str().split_whitespace().any(|r| r.eq_ignore_ascii_case("next")))
                .unwrap_or(false)
        });

        if is_next && !url.is_empty() {
            Some(url.to_string())
        } else {
            None
        }
    })
}

// =============================================================================
// Page Iteration
// =============================================================================

/// One decoded page of the starred collection
#[derive(Debug, Clone)]
pub struct Page {
    /// URL this page was fetched from
    pub url: String,
    /// Records on this page, in API order
    pub items: Vec<StarRecord>,
    /// Continuation target, `None` on the last page
    pub next: Option<String>,
}

/// Anything that can turn a page URL into a decoded page.
///
/// Implemented by the HTTP client; tests substitute canned pages.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> Result<Page>;
}

/// Lazy, finite sequence of pages.
///
/// Yields pages in follow order and ends after the first page without a
/// `next` link. The first error is yielded once and ends the sequence.
pub struct StarPages<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    next: Option<String>,
}

impl<'a, F: PageFetcher + ?Sized> StarPages<'a, F> {
    pub fn new(fetcher: &'a F, first_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            next: Some(first_url.into()),
        }
    }

    /// Concatenate every page.
    ///
    /// All-or-nothing: a failure on any page discards the pages already read.
    pub fn collect_all(self) -> Result<Vec<StarRecord>> {
        let mut records = Vec::new();
        for page in self {
            records.extend(page?.items);
        }
        Ok(records)
    }
}

impl<F: PageFetcher + ?Sized> Iterator for StarPages<'_, F> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next.take()?;
        match self.fetcher.fetch_page(&url) {
            Ok(page) => {
                self.next = page.next.clone();
                Some(Ok(page))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl<F: PageFetcher + ?Sized> std::iter::FusedIterator for StarPages<'_, F> {}
