//! Blocking HTTP client for the starred endpoint

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, LINK};

use crate::core::config::{FetchConfig, API_VERSION, STAR_MEDIA_TYPE};
use crate::core::error::{Result, StarError};
use crate::core::models::StarRecord;

use super::pagination::{parse_next_link, Page, PageFetcher, StarPages};

/// Authenticated client for `GET /users/{username}/starred`
pub struct StarredClient {
    client: Client,
    first_url: String,
}

impl StarredClient {
    /// Build a client carrying the auth, media-type and version headers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for missing credentials or a token that is not
    /// a valid header value, `Transport` if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("token {}", config.token.trim()))
            .map_err(|_| StarError::invalid_config("token contains characters not allowed in a header"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(STAR_MEDIA_TYPE));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            first_url: config.starred_url(),
        })
    }

    /// Lazily walk every page, starting at the collection root
    pub fn pages(&self) -> StarPages<'_, Self> {
        StarPages::new(self, self.first_url.clone())
    }

    /// Fetch all pages; any failure discards what was read so far
    pub fn fetch_all(&self) -> Result<Vec<StarRecord>> {
        self.pages().collect_all()
    }
}

impl PageFetcher for StarredClient {
    fn fetch_page(&self, url: &str) -> Result<Page> {
        tracing::info!("Fetching from: {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = status.as_u16(), "starred request rejected");
            return Err(StarError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);

        let body = response.text()?;
        let items: Vec<StarRecord> = serde_json::from_str(&body)?;
        tracing::debug!(count = items.len(), has_next = next.is_some(), "page decoded");

        Ok(Page {
            url: url.to_string(),
            items,
            next,
        })
    }
}
