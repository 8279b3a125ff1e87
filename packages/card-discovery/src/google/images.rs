//! Google Custom Search adapter for the `ImageSearcher` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{DiscoveryError, Result};
use crate::security::SecretString;
use crate::traits::images::ImageSearcher;
use crate::types::card::join_tokens;

const CUSTOM_SEARCH_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Image search backed by a Google Programmable Search engine.
#[derive(Clone)]
pub struct GoogleImageSearch {
    client: Client,
    api_key: SecretString,
    engine_id: String,
    base_url: String,
    /// Images requested per key (Google caps this at 10).
    pub limit: u8,
}

impl GoogleImageSearch {
    /// Create an image searcher for the given API key and engine id.
    pub fn new(api_key: impl Into<SecretString>, engine_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            base_url: CUSTOM_SEARCH_API_URL.to_string(),
            limit: 4,
        }
    }

    /// Create from `GOOGLE_SEARCH_API_KEY` and `GOOGLE_SEARCH_ENGINE_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = SecretString::from_env("GOOGLE_SEARCH_API_KEY")?;
        let engine_id = std::env::var("GOOGLE_SEARCH_ENGINE_ID").map_err(|_| {
            DiscoveryError::Configuration("GOOGLE_SEARCH_ENGINE_ID not set".into())
        })?;
        Ok(Self::new(api_key, engine_id))
    }

    /// Set how many images to fetch per key (clamped to 1..=10).
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.clamp(1, 10);
        self
    }

    /// Point at a different search endpoint (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl std::fmt::Debug for GoogleImageSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleImageSearch")
            .field("api_key", &self.api_key)
            .field("engine_id", &self.engine_id)
            .field("limit", &self.limit)
            .finish()
    }
}

#[async_trait]
impl ImageSearcher for GoogleImageSearch {
    #[instrument(skip(self))]
    async fn links_for(&self, key: &str) -> Result<String> {
        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.expose()),
                ("cx", self.engine_id.as_str()),
                ("q", key),
                ("searchType", "image"),
                ("num", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DiscoveryError::ImageSearch(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::ImageSearch(
                format!("Google Custom Search error ({}): {}", status, error_text).into(),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::ImageSearch(Box::new(e)))?;

        let links = links_from_response(body);
        debug!(link_count = links.len(), "Image search completed");
        Ok(join_tokens(&links))
    }
}

/// Image URLs from a search response, without blanks or pipes.
fn links_from_response(body: SearchResponse) -> Vec<String> {
    body.items
        .into_iter()
        .map(|item| item.link)
        .filter(|link| !link.trim().is_empty() && !link.contains('|'))
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}
