//! Per-trip-type lists of locations the generator must not suggest again.

use indexmap::IndexMap;

use crate::types::card::Card;

/// Trip type to the `"name (locality)"` labels already in the catalog.
///
/// Built once per generation round from the cards found so far and
/// read-only afterwards. Keys keep the order the trip types were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    by_trip_type: IndexMap<String, Vec<String>>,
}

impl ExclusionIndex {
    /// Group `found` under each requested trip type its `trip_types` field
    /// mentions. Every requested trip type gets an entry, possibly empty.
    pub fn build(trip_types: &[String], found: &[Card]) -> Self {
        let by_trip_type = trip_types
            .iter()
            .map(|trip_type| {
                let labels = found
                    .iter()
                    .filter(|card| card.trip_types.contains(trip_type.as_str()))
                    .filter_map(Card::exclusion_label)
                    .collect();
                (trip_type.clone(), labels)
            })
            .collect();

        Self { by_trip_type }
    }

    /// Trip types in request order.
    pub fn trip_types(&self) -> impl Iterator<Item = &str> {
        self.by_trip_type.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_trip_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_trip_type.is_empty()
    }

    /// Labels to exclude for one trip type.
    pub fn labels_for(&self, trip_type: &str) -> &[String] {
        self.by_trip_type
            .get(trip_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any trip type already lists `label`.
    pub fn contains_label(&self, label: &str) -> bool {
        self.by_trip_type.values().flatten().any(|known| known == label)
    }

    /// Every label across all trip types, comma separated.
    pub fn all_labels(&self) -> String {
        self.by_trip_type
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
