//! Search predicates: per-field providers and their composition.

pub mod builder;
pub mod expr;
pub mod providers;

pub use builder::SearchPredicateBuilder;
pub use expr::{CardField, CardPredicate};
pub use providers::{
    AuthorProvider, ClimateProvider, LocationScopeProvider, PredicateProvider,
    PredicateProviderRegistry, SpecialRequirementsProvider, TripTypesProvider,
};
