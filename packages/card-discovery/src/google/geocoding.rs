//! Google Geocoding adapter for the `Geocoder` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{DiscoveryError, Result};
use crate::geo::truncate_coordinate;
use crate::security::SecretString;
use crate::traits::geocoder::{map_link_for, GeoLocation, Geocoder};

const GEOCODING_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocoder backed by the Google Geocoding API.
///
/// Coordinates are floored to six decimal places. A key Google cannot place
/// comes back unresolved at (0, 0) rather than as an error.
#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl GoogleGeocoder {
    /// Create a geocoder with the given Maps API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GEOCODING_API_URL.to_string(),
        }
    }

    /// Create from environment variable `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SecretString::from_env("GOOGLE_MAPS_API_KEY")?))
    }

    /// Point at a different geocoding endpoint (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Follow a short link to the long map URL it redirects to.
    async fn expand_short_url(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DiscoveryError::Geocoding(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Geocoding(
                format!("short link '{}' answered {}", url, response.status()).into(),
            ));
        }

        Ok(response.url().to_string())
    }
}

impl std::fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn by_name(&self, key: &str) -> Result<GeoLocation> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("address", key), ("key", self.api_key.expose())])
            .send()
            .await
            .map_err(|e| DiscoveryError::Geocoding(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Geocoding(
                format!("Google Geocoding API error: {}", response.status()).into(),
            ));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Geocoding(Box::new(e)))?;

        location_from_response(key, body)
    }

    #[instrument(skip(self))]
    async fn by_short_url(&self, url: &str) -> Result<GeoLocation> {
        let long_url = self.expand_short_url(url).await?;
        debug!(long_url = %long_url, "Expanded short map link");

        let (latitude, longitude) = parse_map_url(&long_url).ok_or_else(|| {
            DiscoveryError::Geocoding(
                format!("no coordinates in map link '{}'", long_url).into(),
            )
        })?;

        Ok(GeoLocation::new(
            long_url,
            truncate_coordinate(latitude),
            truncate_coordinate(longitude),
        ))
    }
}

fn location_from_response(key: &str, body: GeocodeResponse) -> Result<GeoLocation> {
    match body.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        other => {
            return Err(DiscoveryError::Geocoding(
                format!(
                    "Google Geocoding status {}: {}",
                    other,
                    body.error_message.unwrap_or_default()
                )
                .into(),
            ))
        }
    }

    let map_link = map_link_for(key);
    match body.results.into_iter().next() {
        Some(result) => Ok(GeoLocation::new(
            map_link,
            truncate_coordinate(result.geometry.location.lat),
            truncate_coordinate(result.geometry.location.lng),
        )),
        None => {
            warn!(key, "Google could not place key");
            Ok(GeoLocation::unresolved(map_link))
        }
    }
}

/// Coordinates from a long Google Maps URL.
///
/// Understands the `.../@48.8583,2.2944,17z/...` form and the
/// `.../maps/search/48.8583,+2.2944?...` form.
pub fn parse_map_url(url: &str) -> Option<(f64, f64)> {
    let at_form = regex::Regex::new(r"@(-?\d+(?:\.\d+)?),\+?(-?\d+(?:\.\d+)?)").ok()?;
    let search_form =
        regex::Regex::new(r"/search/(-?\d+(?:\.\d+)?),\+?(-?\d+(?:\.\d+)?)").ok()?;

    let captures = at_form
        .captures(url)
        .or_else(|| search_form.captures(url))?;
    let latitude = captures.get(1)?.as_str().parse().ok()?;
    let longitude = captures.get(2)?.as_str().parse().ok()?;
    Some((latitude, longitude))
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
