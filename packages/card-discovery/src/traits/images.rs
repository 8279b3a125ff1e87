//! Image search trait for enriching generated cards with pictures.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{DiscoveryError, Result};

/// Finds images of a place.
///
/// # Implementations
///
/// - `GoogleImageSearch` - Google Custom Search (`google` feature)
/// - `MockImageSearcher` - For testing
#[async_trait]
pub trait ImageSearcher: Send + Sync {
    /// Image URLs for `key` (e.g. `"Louvre Paris"`), pipe-delimited.
    async fn links_for(&self, key: &str) -> Result<String>;
}

/// Mock image searcher for testing.
///
/// Returns one predictable link per key unless told otherwise.
#[derive(Default)]
pub struct MockImageSearcher {
    links: RwLock<HashMap<String, String>>,
    failing: RwLock<HashSet<String>>,
}

impl MockImageSearcher {
    /// Create a new mock image searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these links for `key`.
    pub fn with_links(self, key: &str, links: &[&str]) -> Self {
        self.links
            .write()
            .unwrap()
            .insert(key.to_string(), links.join("|"));
        self
    }

    /// Make searches for `key` fail.
    pub fn fail_key(self, key: &str) -> Self {
        self.failing.write().unwrap().insert(key.to_string());
        self
    }
}

#[async_trait]
impl ImageSearcher for MockImageSearcher {
    async fn links_for(&self, key: &str) -> Result<String> {
        if self.failing.read().unwrap().contains(key) {
            return Err(DiscoveryError::ImageSearch(
                format!("image search unavailable for '{}'", key).into(),
            ));
        }

        Ok(self
            .links
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| {
                format!(
                    "https://images.example.com/{}.jpg",
                    key.to_lowercase().replace(' ', "-")
                )
            }))
    }
}
