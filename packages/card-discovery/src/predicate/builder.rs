//! Composes the per-field predicates for a set of criteria.

use tracing::debug;

use crate::predicate::expr::{CardField, CardPredicate};
use crate::predicate::providers::PredicateProviderRegistry;
use crate::types::criteria::SearchCriteria;

/// Builds one combined predicate from [`SearchCriteria`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchPredicateBuilder {
    registry: PredicateProviderRegistry,
}

impl SearchPredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: PredicateProviderRegistry) -> Self {
        Self { registry }
    }

    /// AND together the predicates of every non-empty criterion.
    ///
    /// Order: trip types, climate, special requirements, location scope,
    /// author. Empty criteria contribute nothing.
    pub fn build(&self, criteria: &SearchCriteria) -> CardPredicate {
        let fields: [(CardField, &[String]); 5] = [
            (CardField::TripTypes, criteria.trip_types.as_slice()),
            (CardField::Climate, criteria.climate.as_slice()),
            (CardField::SpecialRequirements, criteria.special_requirements.as_slice()),
            (CardField::FullName, criteria.travel_scope.as_slice()),
            (CardField::Author, criteria.author_filter.as_slice()),
        ];

        let predicate = fields
            .into_iter()
            .filter(|(_, params)| !params.is_empty())
            .fold(CardPredicate::Always, |acc, (field, params)| {
                acc.and(self.registry.provider(field).predicate(params))
            });

        debug!(fields = ?predicate.fields(), "Built search predicate");
        predicate
    }
}
