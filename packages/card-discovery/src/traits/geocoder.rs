//! Geocoder trait for turning place names into coordinates.
//!
//! Generated candidates are only persisted once the geocoder has placed
//! them; a lookup that lands on (0, 0) means "not found" and the candidate
//! is dropped. The same port resolves the search origin for distance
//! annotation.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::geo::Coordinates;

/// Where a place is and how to link to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub map_link: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(map_link: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            map_link: map_link.into(),
            latitude,
            longitude,
        }
    }

    /// A lookup that found nothing.
    pub fn unresolved(map_link: impl Into<String>) -> Self {
        Self::new(map_link, 0.0, 0.0)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Both coordinates exactly zero.
    pub fn is_unresolved(&self) -> bool {
        self.coordinates().is_unresolved()
    }
}

/// Geocoding lookups.
///
/// # Implementations
///
/// - `GoogleGeocoder` - Google Geocoding API (`google` feature)
/// - `MockGeocoder` - For testing
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Locate a free-text key such as `"Louvre Paris"`.
    ///
    /// An unknown place is not an error: it comes back unresolved.
    async fn by_name(&self, key: &str) -> Result<GeoLocation>;

    /// Locate a shared short map link.
    async fn by_short_url(&self, url: &str) -> Result<GeoLocation>;
}

/// Mock geocoder for testing.
///
/// Unknown keys resolve to (0, 0) the way a real geocoder reports a miss.
#[derive(Default)]
pub struct MockGeocoder {
    locations: RwLock<HashMap<String, GeoLocation>>,
    failing: RwLock<HashSet<String>>,
    lookups: RwLock<Vec<String>>,
}

impl MockGeocoder {
    /// Create a new mock geocoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `key` (or short URL) to the given coordinates.
    pub fn with_location(self, key: &str, latitude: f64, longitude: f64) -> Self {
        let location = GeoLocation::new(map_link_for(key), latitude, longitude);
        self.locations
            .write()
            .unwrap()
            .insert(key.to_string(), location);
        self
    }

    /// Make lookups for `key` fail with a geocoding error.
    pub fn fail_key(self, key: &str) -> Self {
        self.failing.write().unwrap().insert(key.to_string());
        self
    }

    /// Every key looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.read().unwrap().clone()
    }

    fn lookup(&self, key: &str) -> Result<GeoLocation> {
        self.lookups.write().unwrap().push(key.to_string());

        if self.failing.read().unwrap().contains(key) {
            return Err(DiscoveryError::Geocoding(
                format!("geocoding unavailable for '{}'", key).into(),
            ));
        }

        Ok(self
            .locations
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| GeoLocation::unresolved(map_link_for(key))))
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn by_name(&self, key: &str) -> Result<GeoLocation> {
        self.lookup(key)
    }

    async fn by_short_url(&self, url: &str) -> Result<GeoLocation> {
        self.lookup(url)
    }
}

/// Google Maps search link for a free-text key.
pub fn map_link_for(key: &str) -> String {
    format!(
        "https://maps.google.com/maps?q={}",
        key.split_whitespace().collect::<Vec<_>>().join("+")
    )
}
