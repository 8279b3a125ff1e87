//! Destination cards and the pipe-delimited fields they carry.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::geo::Coordinates;

/// Author recorded on generated cards.
pub const AI_AUTHOR: &str = "AI";

/// Separator used by every multi-valued card field.
pub const DIVIDER: char = '|';

/// A persisted destination card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,

    /// Pseudonym of the human author, or `"AI"`
    pub author: String,

    /// `location|locality|region|country|continent`, unique in the catalog
    pub full_name: String,

    /// Pipe-delimited trip types
    pub trip_types: String,

    /// Single climate token
    pub climate: String,

    /// Pipe-delimited special requirements
    pub special_requirements: String,

    pub description: String,

    /// Pipe-delimited short reasons
    pub why_this_place: String,

    /// Pipe-delimited image URLs
    pub image_links: String,

    pub map_link: String,
    pub latitude: f64,
    pub longitude: f64,
    pub likes: i64,
    pub shown: bool,
}

impl Card {
    /// Build the persisted form of a new card.
    pub fn from_new(id: i64, card: NewCard) -> Self {
        Self {
            id,
            author: card.author,
            full_name: card.full_name,
            trip_types: card.trip_types,
            climate: card.climate,
            special_requirements: card.special_requirements,
            description: card.description,
            why_this_place: card.why_this_place,
            image_links: card.image_links,
            map_link: card.map_link,
            latitude: card.latitude,
            longitude: card.longitude,
            likes: card.likes,
            shown: card.shown,
        }
    }

    /// `"name (locality)"` from the first two full-name segments.
    ///
    /// Works on partial names too; `None` if fewer than two segments.
    pub fn exclusion_label(&self) -> Option<String> {
        let mut segments = self.full_name.split(DIVIDER).map(str::trim);
        match (segments.next(), segments.next()) {
            (Some(name), Some(locality)) if !name.is_empty() && !locality.is_empty() => {
                Some(format!("{} ({})", name, locality))
            }
            _ => None,
        }
    }
}

/// A card ready to be persisted (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub author: String,
    pub full_name: String,
    pub trip_types: String,
    pub climate: String,
    pub special_requirements: String,
    pub description: String,
    pub why_this_place: String,
    pub image_links: String,
    pub map_link: String,
    pub latitude: f64,
    pub longitude: f64,
    pub likes: i64,
    pub shown: bool,
}

impl NewCard {
    /// Create a visible card with empty descriptive fields.
    pub fn new(author: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            full_name: full_name.into(),
            trip_types: String::new(),
            climate: String::new(),
            special_requirements: String::new(),
            description: String::new(),
            why_this_place: String::new(),
            image_links: String::new(),
            map_link: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            likes: 0,
            shown: true,
        }
    }

    /// Set trip types from a list.
    pub fn with_trip_types(mut self, types: &[&str]) -> Self {
        self.trip_types = join_tokens(types);
        self
    }

    /// Set the climate.
    pub fn with_climate(mut self, climate: impl Into<String>) -> Self {
        self.climate = climate.into();
        self
    }

    /// Set special requirements from a list.
    pub fn with_special_requirements(mut self, requirements: &[&str]) -> Self {
        self.special_requirements = join_tokens(requirements);
        self
    }

    /// Set coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set visibility.
    pub fn with_shown(mut self, shown: bool) -> Self {
        self.shown = shown;
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Catalogs refuse cards still at the (0, 0) sentinel.
    pub fn ensure_located(&self) -> Result<()> {
        if self.coordinates().is_unresolved() {
            return Err(DiscoveryError::UnresolvedLocation {
                full_name: self.full_name.clone(),
            });
        }
        Ok(())
    }
}

impl From<GeneratedCandidate> for NewCard {
    fn from(candidate: GeneratedCandidate) -> Self {
        Self {
            author: AI_AUTHOR.to_string(),
            full_name: candidate.full_name,
            trip_types: candidate.trip_types,
            climate: candidate.climate,
            special_requirements: candidate.special_requirements,
            description: candidate.description,
            why_this_place: candidate.why_this_place,
            image_links: candidate.image_links,
            map_link: candidate.map_link,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            likes: 0,
            shown: true,
        }
    }
}

/// A candidate synthesized by the generation pipeline.
///
/// Lives only inside the pipeline: it is either converted into a
/// [`NewCard`] or dropped when a validation step fails.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCandidate {
    pub full_name: String,
    pub trip_types: String,
    pub climate: String,
    pub special_requirements: String,
    pub description: String,
    pub why_this_place: String,
    pub image_links: String,
    pub map_link: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The five segments of a card's full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationName {
    pub name: String,
    pub locality: String,
    pub region: String,
    pub country: String,
    pub continent: String,
}

impl LocationName {
    /// Parse `name|locality|region|country|continent`.
    ///
    /// Returns `None` unless there are exactly five non-empty segments.
    pub fn parse(full_name: &str) -> Option<Self> {
        let parts: Vec<&str> = full_name.split(DIVIDER).map(str::trim).collect();
        if parts.len() != 5 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self {
            name: parts[0].to_string(),
            locality: parts[1].to_string(),
            region: parts[2].to_string(),
            country: parts[3].to_string(),
            continent: parts[4].to_string(),
        })
    }

    /// `"name (locality)"`, the form used in exclusion lists.
    pub fn exclusion_label(&self) -> String {
        format!("{} ({})", self.name, self.locality)
    }

    /// `"name locality"`, the key sent to geocoding and image search.
    pub fn search_key(&self) -> String {
        format!("{} {}", self.name, self.locality)
    }

    /// Everything after the name, comma separated.
    pub fn where_is(&self) -> String {
        [
            self.locality.as_str(),
            self.region.as_str(),
            self.country.as_str(),
            self.continent.as_str(),
        ]
        .join(", ")
    }
}

/// Split a pipe-delimited field into trimmed, non-empty tokens.
pub fn split_tokens(field: &str) -> Vec<String> {
    field
        .split(DIVIDER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tokens with the pipe divider.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join("|")
}

/// Append `token` to a pipe-delimited field unless already present.
pub fn append_token(field: &str, token: &str) -> String {
    if split_tokens(field).iter().any(|t| t == token) {
        return field.to_string();
    }
    if field.trim().is_empty() {
        token.to_string()
    } else {
        format!("{}{}{}", field, DIVIDER, token)
    }
}
