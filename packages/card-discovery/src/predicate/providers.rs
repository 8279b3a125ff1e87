//! One predicate provider per filterable field.

use crate::error::Result;
use crate::predicate::expr::{CardField, CardPredicate};
use crate::types::card::AI_AUTHOR;
use crate::types::criteria::USER_AUTHOR_FILTER;

/// Turns raw filter tokens into a predicate for one field.
///
/// Providers are pure and stateless.
pub trait PredicateProvider: Send + Sync {
    /// The field this provider filters on.
    fn field(&self) -> CardField;

    /// Build the predicate for the given tokens.
    fn predicate(&self, params: &[String]) -> CardPredicate;
}

/// Card matches if it has ANY of the requested trip types.
#[derive(Debug, Default, Clone, Copy)]
pub struct TripTypesProvider;

impl PredicateProvider for TripTypesProvider {
    fn field(&self) -> CardField {
        CardField::TripTypes
    }

    fn predicate(&self, params: &[String]) -> CardPredicate {
        CardPredicate::Any(
            params
                .iter()
                .map(|p| CardPredicate::contains(CardField::TripTypes, p.as_str()))
                .collect(),
        )
    }
}

/// Card matches if its climate is ANY of the requested ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClimateProvider;

impl PredicateProvider for ClimateProvider {
    fn field(&self) -> CardField {
        CardField::Climate
    }

    fn predicate(&self, params: &[String]) -> CardPredicate {
        CardPredicate::Any(
            params
                .iter()
                .map(|p| CardPredicate::contains(CardField::Climate, p.as_str()))
                .collect(),
        )
    }
}

/// Card matches only if it satisfies ALL requested special requirements.
///
/// Unlike [`TripTypesProvider`] this is an AND.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpecialRequirementsProvider;

impl PredicateProvider for SpecialRequirementsProvider {
    fn field(&self) -> CardField {
        CardField::SpecialRequirements
    }

    fn predicate(&self, params: &[String]) -> CardPredicate {
        CardPredicate::All(
            params
                .iter()
                .map(|p| CardPredicate::contains(CardField::SpecialRequirements, p.as_str()))
                .collect(),
        )
    }
}

/// Full name contains the resolved scope token. An empty token matches all.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationScopeProvider;

impl PredicateProvider for LocationScopeProvider {
    fn field(&self) -> CardField {
        CardField::FullName
    }

    fn predicate(&self, params: &[String]) -> CardPredicate {
        match params.first() {
            Some(scope) if !scope.is_empty() => {
                CardPredicate::contains(CardField::FullName, scope.as_str())
            }
            _ => CardPredicate::Always,
        }
    }
}

/// `"AI"` = generated, `"User"` = anything but generated, otherwise that
/// exact author. Only the first token is consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorProvider;

impl PredicateProvider for AuthorProvider {
    fn field(&self) -> CardField {
        CardField::Author
    }

    fn predicate(&self, params: &[String]) -> CardPredicate {
        match params.first().map(String::as_str) {
            None => CardPredicate::Always,
            Some(AI_AUTHOR) => CardPredicate::equals(CardField::Author, AI_AUTHOR),
            Some(USER_AUTHOR_FILTER) => CardPredicate::not_equals(CardField::Author, AI_AUTHOR),
            Some(author) => CardPredicate::equals(CardField::Author, author),
        }
    }
}

/// Lookup from field to provider.
///
/// Keyed by [`CardField`], so lookups by field cannot fail. String keys
/// coming from outside go through [`PredicateProviderRegistry::provider_for_key`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PredicateProviderRegistry {
    trip_types: TripTypesProvider,
    climate: ClimateProvider,
    special_requirements: SpecialRequirementsProvider,
    location_scope: LocationScopeProvider,
    author: AuthorProvider,
}

impl PredicateProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider for a field.
    pub fn provider(&self, field: CardField) -> &dyn PredicateProvider {
        match field {
            CardField::TripTypes => &self.trip_types,
            CardField::Climate => &self.climate,
            CardField::SpecialRequirements => &self.special_requirements,
            CardField::FullName => &self.location_scope,
            CardField::Author => &self.author,
        }
    }

    /// Provider for a string key such as `"tripTypes"`.
    ///
    /// Fails with `Configuration` for keys no provider is registered under.
    pub fn provider_for_key(&self, key: &str) -> Result<&dyn PredicateProvider> {
        let field: CardField = key.parse()?;
        Ok(self.provider(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::{Card, NewCard};

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn card(author: &str, trip_types: &[&str], requirements: &[&str]) -> Card {
        Card::from_new(
            1,
            NewCard::new(author, "Central park|New York|New York state|USA|North America")
                .with_trip_types(trip_types)
                .with_special_requirements(requirements)
                .with_climate("Temperate"),
        )
    }

    #[test]
    fn test_trip_types_is_or() {
        let p = TripTypesProvider.predicate(&tokens(&["Party", "Nature"]));
        assert!(p.matches(&card("AI", &["Nature"], &[])));
        assert!(!p.matches(&card("AI", &["Shopping"], &[])));
    }

    #[test]
    fn test_special_requirements_is_and() {
        let p = SpecialRequirementsProvider.predicate(&tokens(&["With pets", "With kids"]));
        assert!(p.matches(&card("AI", &[], &["With kids", "With pets"])));
        assert!(!p.matches(&card("AI", &[], &["With pets"])));
    }

    #[test]
    fn test_climate_is_or() {
        let p = ClimateProvider.predicate(&tokens(&["Polar", "Temperate"]));
        assert!(p.matches(&card("AI", &[], &[])));
    }

    #[test]
    fn test_author_three_way() {
        let ai = card("AI", &[], &[]);
        let human = card("wanderer42", &[], &[]);

        let only_ai = AuthorProvider.predicate(&tokens(&["AI"]));
        assert!(only_ai.matches(&ai));
        assert!(!only_ai.matches(&human));

        let only_users = AuthorProvider.predicate(&tokens(&["User"]));
        assert!(!only_users.matches(&ai));
        assert!(only_users.matches(&human));

        let named = AuthorProvider.predicate(&tokens(&["wanderer42", "AI"]));
        assert!(named.matches(&human));
        assert!(!named.matches(&ai));
    }

    #[test]
    fn test_empty_scope_matches_everything() {
        let p = LocationScopeProvider.predicate(&tokens(&[""]));
        assert_eq!(p, CardPredicate::Always);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = PredicateProviderRegistry::new();
        for field in CardField::ALL {
            assert_eq!(registry.provider(field).field(), field);
        }
        assert_eq!(
            registry.provider_for_key("fullName").unwrap().field(),
            CardField::FullName
        );
        assert!(registry.provider_for_key("likes").is_err());
    }
}
