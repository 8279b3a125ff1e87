//! Travel-scope resolution.
//!
//! A search arrives with a symbolic granularity in `travel_scope`. Before
//! predicates are built it is replaced by a concrete place name that card
//! full names can be matched against:
//!
//! | token                | becomes                                   |
//! |----------------------|-------------------------------------------|
//! | `Populated locality` | first part of the start location          |
//! | `Country`            | second part of the start location         |
//! | `Region`             | region name, asked from the generator     |
//! | `Continent`          | continent name, asked from the generator  |
//! | anything else        | `""` (matches every card)                 |

use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::{DiscoveryError, GenerationStage, Result};
use crate::pipeline::contract::{complete_within, parse_stage};
use crate::pipeline::prompts::Prompts;
use crate::traits::generator::TextGenerator;
use crate::types::criteria::SearchCriteria;

/// Symbolic scope: the start locality.
pub const SCOPE_LOCALITY: &str = "Populated locality";
/// Symbolic scope: the start country.
pub const SCOPE_COUNTRY: &str = "Country";
/// Symbolic scope: the start region, generator-resolved.
pub const SCOPE_REGION: &str = "Region";
/// Symbolic scope: the start continent, generator-resolved.
pub const SCOPE_CONTINENT: &str = "Continent";

/// Resolves symbolic travel scopes into place names.
pub struct TravelScopeResolver<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
    prompts: &'a Prompts,
    timeout: Duration,
}

impl<'a, G: TextGenerator + ?Sized> TravelScopeResolver<'a, G> {
    pub fn new(generator: &'a G, prompts: &'a Prompts, timeout: Duration) -> Self {
        Self {
            generator,
            prompts,
            timeout,
        }
    }

    /// Return `criteria` with its scope replaced by a concrete token.
    ///
    /// Generator failures propagate; the search cannot continue with an
    /// unresolved scope.
    #[instrument(skip(self, criteria), fields(scope = %criteria.scope()))]
    pub async fn resolve(&self, criteria: SearchCriteria) -> Result<SearchCriteria> {
        let resolved = match criteria.scope() {
            SCOPE_LOCALITY => criteria.start_location_part(0)?,
            SCOPE_COUNTRY => criteria.start_location_part(1)?,
            SCOPE_REGION => self.ask(GenerationStage::Region, &criteria).await?,
            SCOPE_CONTINENT => self.ask(GenerationStage::Continent, &criteria).await?,
            _ => String::new(),
        };

        debug!(resolved = %resolved, "Resolved travel scope");
        Ok(criteria.with_travel_scope(resolved))
    }

    async fn ask(&self, stage: GenerationStage, criteria: &SearchCriteria) -> Result<String> {
        let criteria_json = serde_json::to_string_pretty(criteria)
            .map_err(|e| DiscoveryError::InvalidCriteria {
                reason: e.to_string(),
            })?;

        let prompt = match stage {
            GenerationStage::Continent => self.prompts.format_continent(&criteria_json),
            _ => self.prompts.format_region(&criteria_json),
        };

        let raw = complete_within(self.generator, &prompt, stage, self.timeout).await?;
        let echoed: SearchCriteria = parse_stage(stage, &raw)?;

        match echoed.travel_scope.as_slice() {
            [scope] if !scope.trim().is_empty() => Ok(scope.trim().to_string()),
            other => Err(DiscoveryError::contract(
                stage,
                format!("expected exactly one travelScope element, got {}", other.len()),
                raw,
            )),
        }
    }
}
