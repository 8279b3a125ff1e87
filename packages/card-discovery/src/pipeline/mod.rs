//! Discovery pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Travel-scope resolution (locality/country/region/continent)
//! - Catalog search with the predicate registry
//! - Bounded generate-or-serve rounds
//! - Multi-stage generation (list → dedup → correction → detail)
//! - Enrichment with geocoding and image links

pub mod contract;
pub mod exclusion;
pub mod generation;
pub mod orchestrator;
pub mod prompts;
pub mod scope;

pub use contract::{parse_stage, strip_code_fence, LocationDetails, LocationList};
pub use exclusion::ExclusionIndex;
pub use generation::GenerationPipeline;
pub use orchestrator::DiscoveryEngine;
pub use prompts::{
    ListRequest, Prompts, CONTINENT_PROMPT, CORRECTION_PROMPT, DEDUP_PROMPT, DETAIL_PROMPT,
    LIST_PROMPT, REGION_PROMPT,
};
pub use scope::{
    TravelScopeResolver, SCOPE_CONTINENT, SCOPE_COUNTRY, SCOPE_LOCALITY, SCOPE_REGION,
};
