//! Search criteria and pagination.

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::types::card::AI_AUTHOR;

/// Author filter token selecting human-authored cards.
pub const USER_AUTHOR_FILTER: &str = "User";

/// What the caller is looking for.
///
/// Immutable once built; resolving the travel scope produces a new value
/// via [`SearchCriteria::with_travel_scope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// `"place, country"`
    pub start_location: String,

    #[serde(default)]
    pub trip_types: Vec<String>,

    #[serde(default)]
    pub climate: Vec<String>,

    #[serde(default)]
    pub special_requirements: Vec<String>,

    /// One scope token: a symbolic granularity before resolution, a place
    /// name (or empty string) after.
    #[serde(default, alias = "travelDistance")]
    pub travel_scope: Vec<String>,

    /// Empty = any author, `["AI"]` = generated only, `["User"]` = human only,
    /// anything else = that exact author.
    #[serde(default, alias = "author")]
    pub author_filter: Vec<String>,
}

impl SearchCriteria {
    /// Create criteria for a start location with no filters.
    pub fn new(start_location: impl Into<String>) -> Self {
        Self {
            start_location: start_location.into(),
            ..Default::default()
        }
    }

    /// Filter by trip types (any of).
    pub fn with_trip_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.trip_types = types.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Filter by climates.
    pub fn with_climate(mut self, climate: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.climate = climate.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Filter by special requirements (all of).
    pub fn with_special_requirements(
        mut self,
        requirements: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.special_requirements = requirements.into_iter().map(|r| r.into()).collect();
        self
    }

    /// Replace the travel scope with a single token.
    pub fn with_travel_scope(mut self, scope: impl Into<String>) -> Self {
        self.travel_scope = vec![scope.into()];
        self
    }

    /// Filter by author.
    pub fn with_author_filter(mut self, authors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.author_filter = authors.into_iter().map(|a| a.into()).collect();
        self
    }

    /// First scope token, or `""` when absent.
    pub fn scope(&self) -> &str {
        self.travel_scope.first().map(String::as_str).unwrap_or("")
    }

    /// Generation is only allowed when the caller asked for AI cards.
    pub fn allows_generation(&self) -> bool {
        self.author_filter.iter().any(|a| a == AI_AUTHOR)
    }

    /// Comma-separated component of the start location, trimmed.
    pub fn start_location_part(&self, index: usize) -> Result<String> {
        self.start_location
            .split(',')
            .nth(index)
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .ok_or_else(|| DiscoveryError::InvalidCriteria {
                reason: format!(
                    "start location '{}' has no component {}",
                    self.start_location, index
                ),
            })
    }
}

/// Requested page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page number
    #[serde(alias = "page")]
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// First index of this page.
    pub fn offset(&self) -> usize {
        self.number.saturating_mul(self.size)
    }

    /// Cards needed to fill every page up to and including this one.
    ///
    /// Saturates at `usize::MAX` for absurd page numbers.
    pub fn required(&self) -> usize {
        self.size.saturating_mul(self.number.saturating_add(1))
    }

    /// Slice this page out of `items`, clamped to its length.
    pub fn window<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.size).min(items.len());
        items[start..end].to_vec()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: 0, size: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_is_cumulative() {
        assert_eq!(PageRequest::new(0, 8).required(), 8);
        assert_eq!(PageRequest::new(3, 8).required(), 32);
    }

    #[test]
    fn test_window_clamps() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(PageRequest::new(0, 8).window(&items), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageRequest::new(1, 3).window(&items), vec![3, 4]);
        assert!(PageRequest::new(4, 3).window(&items).is_empty());
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let page = PageRequest::new(usize::MAX / 2, 8);
        assert_eq!(page.offset(), usize::MAX);
        assert_eq!(page.required(), usize::MAX);
        assert!(page.window(&[1, 2, 3]).is_empty());

        let last = PageRequest::new(usize::MAX, 1);
        assert_eq!(last.required(), usize::MAX);
    }

    #[test]
    fn test_allows_generation_needs_exact_ai_token() {
        let criteria = SearchCriteria::new("Paris,France");
        assert!(!criteria.allows_generation());
        assert!(criteria.clone().with_author_filter(["AI"]).allows_generation());
        assert!(!criteria.clone().with_author_filter(["User"]).allows_generation());
        assert!(!criteria.with_author_filter(["MAIN"]).allows_generation());
    }

    #[test]
    fn test_start_location_part() {
        let criteria = SearchCriteria::new("Paris, France");
        assert_eq!(criteria.start_location_part(0).unwrap(), "Paris");
        assert_eq!(criteria.start_location_part(1).unwrap(), "France");
        assert!(criteria.start_location_part(2).is_err());
    }

    #[test]
    fn test_deserialize_accepts_legacy_names() {
        let json = r#"{
            "startLocation": "Tokyo, Japan",
            "tripTypes": ["Nature"],
            "travelDistance": ["Kanto"],
            "author": ["AI"]
        }"#;
        let criteria: SearchCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.scope(), "Kanto");
        assert!(criteria.allows_generation());
        assert!(criteria.climate.is_empty());
    }
}
