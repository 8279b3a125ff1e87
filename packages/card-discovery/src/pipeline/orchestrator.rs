//! The generate-or-serve search loop.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::{DiscoveryError, Result};
use crate::geo::with_distances;
use crate::pipeline::exclusion::ExclusionIndex;
use crate::pipeline::generation::GenerationPipeline;
use crate::pipeline::prompts::Prompts;
use crate::pipeline::scope::TravelScopeResolver;
use crate::predicate::{CardPredicate, SearchPredicateBuilder};
use crate::traits::{
    catalog::Catalog, generator::TextGenerator, geocoder::Geocoder, images::ImageSearcher,
};
use crate::types::card::{Card, NewCard};
use crate::types::config::DiscoveryConfig;
use crate::types::criteria::{PageRequest, SearchCriteria};
use crate::types::view::SearchPage;

/// The main entry point: searches the catalog and fills it on demand.
///
/// # Example
///
/// ```rust,ignore
/// let engine = DiscoveryEngine::new(catalog, OpenAI::from_env()?, geocoder, images);
///
/// let criteria = SearchCriteria::new("Paris, France")
///     .with_trip_types(["Culture"])
///     .with_travel_scope("Country")
///     .with_author_filter(["AI"]);
///
/// let page = engine.search(criteria, PageRequest::new(0, 8)).await?;
/// for card in page.cards {
///     println!("{} ({} km)", card.name, card.distance);
/// }
/// ```
pub struct DiscoveryEngine<C, G, Geo, I>
where
    C: Catalog,
    G: TextGenerator,
    Geo: Geocoder,
    I: ImageSearcher,
{
    catalog: C,
    generator: G,
    geocoder: Geo,
    images: I,
    config: DiscoveryConfig,
    prompts: Prompts,
    predicates: SearchPredicateBuilder,
}

impl<C, G, Geo, I> DiscoveryEngine<C, G, Geo, I>
where
    C: Catalog,
    G: TextGenerator,
    Geo: Geocoder,
    I: ImageSearcher,
{
    /// Create an engine with default configuration and prompts.
    pub fn new(catalog: C, generator: G, geocoder: Geo, images: I) -> Self {
        Self {
            catalog,
            generator,
            geocoder,
            images,
            config: DiscoveryConfig::default(),
            prompts: Prompts::default(),
            predicates: SearchPredicateBuilder::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the prompt templates.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Get a reference to the catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Find one page of cards matching `criteria`, generating new cards
    /// when the catalog is short and the caller asked for AI cards.
    ///
    /// Fails with `CardSearch` when nothing matches even after generation.
    #[instrument(skip(self, criteria, page), fields(start = %criteria.start_location, page_number = page.number, page_size = page.size))]
    pub async fn search(&self, criteria: SearchCriteria, page: PageRequest) -> Result<SearchPage> {
        let criteria = self.resolve_scope(criteria).await?;
        let predicate = self.predicates.build(&criteria);

        let cards = self.find_or_generate(&criteria, &predicate, page).await?;

        let origin = self.geocoder.by_name(&criteria.start_location).await?;
        if origin.is_unresolved() {
            warn!(start = %criteria.start_location, "Start location could not be geocoded");
        }

        Ok(SearchPage {
            page: page.number,
            cards: with_distances(origin.coordinates(), &cards),
        })
    }

    /// Search with cancellation support.
    pub async fn search_with_cancel(
        &self,
        criteria: SearchCriteria,
        page: PageRequest,
        cancel: CancellationToken,
    ) -> Result<SearchPage> {
        tokio::select! {
            result = self.search(criteria, page) => result,
            _ = cancel.cancelled() => Err(DiscoveryError::Cancelled),
        }
    }

    /// Replace the symbolic travel scope with a place name.
    pub async fn resolve_scope(&self, criteria: SearchCriteria) -> Result<SearchCriteria> {
        TravelScopeResolver::new(&self.generator, &self.prompts, self.config.call_timeout())
            .resolve(criteria)
            .await
    }

    /// Query, and while short of `page.required()` with rounds left, run one
    /// generation round and query again. Returns the requested window.
    async fn find_or_generate(
        &self,
        criteria: &SearchCriteria,
        predicate: &CardPredicate,
        page: PageRequest,
    ) -> Result<Vec<Card>> {
        let required = page.required();
        let mut found = self.find_shown(predicate).await?;

        for round in 0..self.config.max_generation_rounds {
            if found.len() >= required || !criteria.allows_generation() {
                break;
            }

            info!(round, found = found.len(), required, "Catalog short of cards, generating");
            let exclusions = ExclusionIndex::build(&criteria.trip_types, &found);
            let generated = GenerationPipeline::new(
                &self.catalog,
                &self.generator,
                &self.geocoder,
                &self.images,
                &self.prompts,
                &self.config,
            )
            .generate(criteria, &exclusions)
            .await?;

            let saved = self.persist(&generated).await;
            info!(round, generated = generated.len(), saved, "Generation round persisted");

            found = self.find_shown(predicate).await?;
        }

        if found.is_empty() {
            return Err(DiscoveryError::nothing_found());
        }

        debug!(found = found.len(), offset = page.offset(), "Slicing result page");
        Ok(page.window(&found))
    }

    async fn find_shown(&self, predicate: &CardPredicate) -> Result<Vec<Card>> {
        let mut cards = self.catalog.find_matching(predicate).await?;
        cards.retain(|card| card.shown);
        Ok(cards)
    }

    /// Save each card on its own; failures only lose that card.
    async fn persist(&self, cards: &[NewCard]) -> usize {
        let mut saved = 0;
        for card in cards {
            match self.catalog.save(card).await {
                Ok(_) => saved += 1,
                Err(e) if e.is_duplicate() => {
                    debug!(full_name = %card.full_name, "Skipping duplicate card");
                }
                Err(e) => {
                    warn!(full_name = %card.full_name, error = %e, "Failed to save generated card");
                }
            }
        }
        saved
    }
}
