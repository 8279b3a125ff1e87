//! Destination Card Discovery Library
//!
//! Finds travel destination cards that match a traveller's criteria and,
//! when the catalog cannot fill the requested page, asks a language model to
//! propose new destinations, enriches them with coordinates and images, and
//! stores them for the next search.
//!
//! # Design Philosophy
//!
//! **"Serve first, generate on miss"**
//!
//! - The catalog is the source of truth; generation only fills gaps
//! - Every model answer has a JSON contract, checked at the stage boundary
//! - A bad candidate is dropped, a broken contract aborts the round
//! - Ports for the catalog, model, geocoder and images; the library owns the flow
//!
//! # Usage
//!
//! ```rust,ignore
//! use card_discovery::{DiscoveryEngine, MemoryCatalog, PageRequest, SearchCriteria};
//! use card_discovery::testing::generator_for;
//! use card_discovery::{MockGeocoder, MockImageSearcher};
//!
//! let engine = DiscoveryEngine::new(
//!     MemoryCatalog::new(),
//!     generator_for(&["Louvre|Paris|Ile-de-France|France|Europe"], "Culture"),
//!     MockGeocoder::new().with_location("Louvre Paris", 48.8606, 2.3376),
//!     MockImageSearcher::new(),
//! );
//!
//! let criteria = SearchCriteria::new("Paris,France")
//!     .with_trip_types(["Culture"])
//!     .with_travel_scope("Populated locality")
//!     .with_author_filter(["AI"]);
//! let page = engine.search(criteria, PageRequest::default()).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Port abstractions (Catalog, TextGenerator, Geocoder, ImageSearcher)
//! - [`types`] - Cards, criteria, configuration and result views
//! - [`predicate`] - Per-field search predicates and the provider registry
//! - [`pipeline`] - Scope resolution, generation stages and the search engine
//! - [`geo`] - Haversine distance
//! - [`stores`] - Catalog implementations (MemoryCatalog, PostgresCatalog)
//! - [`security`] - Credential handling
//! - [`testing`] - Mock generator and fixtures for testing

pub mod error;
pub mod geo;
pub mod pipeline;
pub mod predicate;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

#[cfg(feature = "google")]
pub mod google;

// Re-export core types at crate root
pub use error::{DiscoveryError, GenerationStage, Result};
pub use geo::{distance_km, truncate_coordinate, with_distances, Coordinates};
pub use traits::{
    catalog::Catalog,
    generator::TextGenerator,
    geocoder::{map_link_for, GeoLocation, Geocoder, MockGeocoder},
    images::{ImageSearcher, MockImageSearcher},
};
pub use types::{
    card::{Card, GeneratedCandidate, LocationName, NewCard, AI_AUTHOR},
    config::{DiscoveryConfig, Vocabulary},
    criteria::{PageRequest, SearchCriteria, USER_AUTHOR_FILTER},
    view::{CardView, SearchPage},
};

// Re-export the engine and its pipeline components
pub use pipeline::{
    DiscoveryEngine, ExclusionIndex, GenerationPipeline, Prompts, TravelScopeResolver,
    SCOPE_CONTINENT, SCOPE_COUNTRY, SCOPE_LOCALITY, SCOPE_REGION,
};

// Re-export predicates
pub use predicate::{
    CardField, CardPredicate, PredicateProvider, PredicateProviderRegistry,
    SearchPredicateBuilder,
};

// Re-export stores
pub use stores::MemoryCatalog;

#[cfg(feature = "postgres")]
pub use stores::PostgresCatalog;

// Re-export adapters
#[cfg(feature = "openai")]
pub use ai::OpenAI;

#[cfg(feature = "google")]
pub use google::{GoogleGeocoder, GoogleImageSearch};

// Re-export testing utilities
pub use testing::MockGenerator;
