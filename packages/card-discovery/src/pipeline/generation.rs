//! Multi-stage synthesis of new cards.
//!
//! Per requested trip type:
//!
//! 1. **List**: ask for candidate full names, excluding known locations
//! 2. **Dedup**: ask the generator to drop names close to any known one
//! 3. **Correction**: ask it to drop invented places and fix placements
//! 4. Drop names still in the exclusion set or not in 5-part form
//! 5. **Detail**: one call per surviving name for tags and descriptions
//! 6. Make sure the requested trip type and special requirements are tagged
//!
//! Then, for every detailed candidate: scope re-check, catalog name check,
//! geocoding and image enrichment. A contract failure at any generator call
//! aborts the round; a failed lookup only drops its own candidate.

use futures::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info, instrument, warn};

use crate::error::{GenerationStage, Result};
use crate::pipeline::contract::{complete_within, parse_stage, LocationDetails, LocationList};
use crate::pipeline::exclusion::ExclusionIndex;
use crate::pipeline::prompts::{ListRequest, Prompts};
use crate::traits::{
    catalog::Catalog, generator::TextGenerator, geocoder::Geocoder, images::ImageSearcher,
};
use crate::types::card::{append_token, split_tokens, GeneratedCandidate, LocationName, NewCard};
use crate::types::config::DiscoveryConfig;
use crate::types::criteria::SearchCriteria;

/// One generation round over borrowed ports.
pub struct GenerationPipeline<'a, C, G, Geo, I>
where
    C: Catalog + ?Sized,
    G: TextGenerator + ?Sized,
    Geo: Geocoder + ?Sized,
    I: ImageSearcher + ?Sized,
{
    catalog: &'a C,
    generator: &'a G,
    geocoder: &'a Geo,
    images: &'a I,
    prompts: &'a Prompts,
    config: &'a DiscoveryConfig,
}

impl<'a, C, G, Geo, I> GenerationPipeline<'a, C, G, Geo, I>
where
    C: Catalog + ?Sized,
    G: TextGenerator + ?Sized,
    Geo: Geocoder + ?Sized,
    I: ImageSearcher + ?Sized,
{
    pub fn new(
        catalog: &'a C,
        generator: &'a G,
        geocoder: &'a Geo,
        images: &'a I,
        prompts: &'a Prompts,
        config: &'a DiscoveryConfig,
    ) -> Self {
        Self {
            catalog,
            generator,
            geocoder,
            images,
            prompts,
            config,
        }
    }

    /// Synthesize ready-to-save cards for every trip type in `exclusions`.
    ///
    /// `criteria` must already have a resolved scope. The result may be
    /// empty when every candidate was dropped.
    #[instrument(skip(self, criteria, exclusions), fields(trip_types = exclusions.len(), scope = %criteria.scope()))]
    pub async fn generate(
        &self,
        criteria: &SearchCriteria,
        exclusions: &ExclusionIndex,
    ) -> Result<Vec<NewCard>> {
        let all_labels = exclusions.all_labels();
        let amount = self.config.names_per_trip_type(exclusions.len());

        let per_type = if self.config.parallel_trip_types {
            try_join_all(exclusions.trip_types().map(|trip_type| {
                self.details_for_trip_type(criteria, trip_type, exclusions, &all_labels, amount)
            }))
            .await?
        } else {
            let mut per_type = Vec::with_capacity(exclusions.len());
            for trip_type in exclusions.trip_types() {
                per_type.push(
                    self.details_for_trip_type(criteria, trip_type, exclusions, &all_labels, amount)
                        .await?,
                );
            }
            per_type
        };

        let details = merge_by_full_name(per_type.into_iter().flatten());
        let detailed = details.len();

        let mut cards = Vec::with_capacity(detailed);
        for details in details {
            if !details.full_name.contains(criteria.scope()) {
                debug!(full_name = %details.full_name, "Dropping candidate outside travel scope");
                continue;
            }
            if let Some(card) = self.enrich(details).await {
                cards.push(card);
            }
        }

        info!(detailed, ready = cards.len(), "Generation round finished");
        Ok(cards)
    }

    /// Stages 1-6 for one trip type.
    #[instrument(skip(self, criteria, exclusions, all_labels), fields(trip_type = %trip_type))]
    async fn details_for_trip_type(
        &self,
        criteria: &SearchCriteria,
        trip_type: &str,
        exclusions: &ExclusionIndex,
        all_labels: &str,
        amount: usize,
    ) -> Result<Vec<LocationDetails>> {
        let names = self
            .location_names(criteria, trip_type, exclusions, all_labels, amount)
            .await?;
        debug!(names = names.len(), "Candidate names after checks");

        let mut details = Vec::with_capacity(names.len());
        for name in &names {
            let prompt = self.prompts.format_detail(name, &self.config.vocabulary);
            let raw = self.ask(&prompt, GenerationStage::Detail).await?;
            let mut detail: LocationDetails = parse_stage(GenerationStage::Detail, &raw)?;

            detail.trip_types = append_token(&detail.trip_types, trip_type);
            for requirement in &criteria.special_requirements {
                detail.special_requirements =
                    append_token(&detail.special_requirements, requirement);
            }
            details.push(detail);
        }

        Ok(details)
    }

    /// Stages 1-4: list, dedup, correction, local exclusion check.
    async fn location_names(
        &self,
        criteria: &SearchCriteria,
        trip_type: &str,
        exclusions: &ExclusionIndex,
        all_labels: &str,
        amount: usize,
    ) -> Result<IndexSet<String>> {
        let prompt = self.prompts.format_list(&ListRequest {
            start_location: &criteria.start_location,
            trip_type,
            climate: &criteria.climate,
            special_requirements: &criteria.special_requirements,
            scope: criteria.scope(),
            exclusions: exclusions.labels_for(trip_type),
            amount,
        });
        let raw = self.ask(&prompt, GenerationStage::List).await?;
        let listed: LocationList = parse_stage(GenerationStage::List, &raw)?;

        let prompt = self.prompts.format_dedup(&listed.to_json(), all_labels);
        let raw = self.ask(&prompt, GenerationStage::Dedup).await?;
        let deduped: LocationList = parse_stage(GenerationStage::Dedup, &raw)?;

        let prompt = self.prompts.format_correction(&deduped.to_json());
        let raw = self.ask(&prompt, GenerationStage::Correction).await?;
        let corrected: LocationList = parse_stage(GenerationStage::Correction, &raw)?;

        Ok(corrected
            .location_names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| match LocationName::parse(name) {
                Some(location) if exclusions.contains_label(&location.exclusion_label()) => {
                    debug!(name = %name, "Dropping already known location");
                    false
                }
                Some(_) => true,
                None => {
                    debug!(name = %name, "Dropping malformed location name");
                    false
                }
            })
            .collect())
    }

    /// Stages 7-9 for one candidate. `None` means dropped.
    async fn enrich(&self, details: LocationDetails) -> Option<NewCard> {
        let full_name = details.full_name.trim().to_string();
        let Some(location) = LocationName::parse(&full_name) else {
            debug!(full_name = %full_name, "Dropping detail with malformed full name");
            return None;
        };

        match self.catalog.exists_by_full_name(&full_name).await {
            Ok(false) => {}
            Ok(true) => {
                debug!(full_name = %full_name, "Dropping candidate already in catalog");
                return None;
            }
            Err(e) => {
                warn!(full_name = %full_name, error = %e, "Catalog name check failed");
                return None;
            }
        }

        let key = location.search_key();
        let geo = match self.geocoder.by_name(&key).await {
            Ok(geo) if geo.is_unresolved() => {
                debug!(key = %key, "Dropping candidate the geocoder could not place");
                return None;
            }
            Ok(geo) => geo,
            Err(e) => {
                warn!(key = %key, error = %e, "Geocoding failed");
                return None;
            }
        };

        let image_links = match self.images.links_for(&key).await {
            Ok(links) => links,
            Err(e) => {
                warn!(key = %key, error = %e, "Image search failed");
                return None;
            }
        };

        Some(NewCard::from(GeneratedCandidate {
            full_name,
            trip_types: details.trip_types,
            climate: details.climate,
            special_requirements: details.special_requirements,
            description: details.description,
            why_this_place: details.why_this_place,
            image_links,
            map_link: geo.map_link,
            latitude: geo.latitude,
            longitude: geo.longitude,
        }))
    }

    async fn ask(&self, prompt: &str, stage: GenerationStage) -> Result<String> {
        complete_within(self.generator, prompt, stage, self.config.call_timeout()).await
    }
}

/// Collapse details that name the same place under several trip types,
/// keeping the first and merging trip types into it.
fn merge_by_full_name(details: impl Iterator<Item = LocationDetails>) -> Vec<LocationDetails> {
    let mut merged: IndexMap<String, LocationDetails> = IndexMap::new();
    for detail in details {
        let key = detail.full_name.trim().to_string();
        match merged.get_mut(&key) {
            Some(existing) => {
                for trip_type in split_tokens(&detail.trip_types) {
                    existing.trip_types = append_token(&existing.trip_types, &trip_type);
                }
            }
            None => {
                merged.insert(key, detail);
            }
        }
    }
    merged.into_values().collect()
}
