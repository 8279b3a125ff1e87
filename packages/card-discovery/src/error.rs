//! Typed errors for the discovery engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while searching for or generating cards.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The generator returned text that does not satisfy the JSON contract
    /// of a pipeline stage (or did not answer in time).
    #[error("generator broke the {stage} contract: {reason}; raw response: {raw}")]
    GenerationContract {
        stage: GenerationStage,
        reason: String,
        raw: String,
    },

    /// Nothing matched, even after the generation rounds.
    #[error("card search failed: {reason}")]
    CardSearch { reason: String },

    /// Unknown filter key or malformed configuration value
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Criteria cannot be resolved (e.g. start location lacks a country)
    #[error("invalid search criteria: {reason}")]
    InvalidCriteria { reason: String },

    /// A card still at (0, 0) cannot be stored
    #[error("card has no resolved location: {full_name}")]
    UnresolvedLocation { full_name: String },

    /// A card with this full name already exists
    #[error("duplicate card: {full_name}")]
    DuplicateCard { full_name: String },

    /// Catalog operation failed
    #[error("catalog error: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Generator unavailable or failed
    #[error("generator error: {0}")]
    Generator(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Geocoding lookup failed
    #[error("geocoding error: {0}")]
    Geocoding(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Image search failed
    #[error("image search error: {0}")]
    ImageSearch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,
}

impl DiscoveryError {
    /// Build a contract error for a stage.
    pub fn contract(
        stage: GenerationStage,
        reason: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self::GenerationContract {
            stage,
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// The "nothing found" terminal failure.
    pub fn nothing_found() -> Self {
        Self::CardSearch {
            reason: "could not find or generate matching cards".to_string(),
        }
    }

    /// True for uniqueness violations on save.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateCard { .. })
    }
}

/// Which generator call produced a contract failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Travel-scope resolution to a region
    Region,
    /// Travel-scope resolution to a continent
    Continent,
    /// Initial candidate list
    List,
    /// Duplicate removal against the exclusion set
    Dedup,
    /// Existence and placement correction
    Correction,
    /// Per-location detail expansion
    Detail,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Region => "region",
            Self::Continent => "continent",
            Self::List => "list",
            Self::Dedup => "dedup",
            Self::Correction => "correction",
            Self::Detail => "detail",
        };
        f.write_str(name)
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
