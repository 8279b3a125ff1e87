//! Card predicates as data.
//!
//! A predicate is a small expression tree rather than a closure so that the
//! same filter can be evaluated in memory or rendered to SQL by a catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;
use crate::types::card::Card;

/// A filterable card column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardField {
    TripTypes,
    Climate,
    SpecialRequirements,
    FullName,
    Author,
}

impl CardField {
    /// All fields, in the order the builder applies them.
    pub const ALL: [CardField; 5] = [
        CardField::TripTypes,
        CardField::Climate,
        CardField::SpecialRequirements,
        CardField::FullName,
        CardField::Author,
    ];

    /// The field's key as used by callers and in the catalog schema.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TripTypes => "tripTypes",
            Self::Climate => "climate",
            Self::SpecialRequirements => "specialRequirements",
            Self::FullName => "fullName",
            Self::Author => "author",
        }
    }

    /// SQL column name.
    pub fn column(&self) -> &'static str {
        match self {
            Self::TripTypes => "trip_types",
            Self::Climate => "climate",
            Self::SpecialRequirements => "special_requirements",
            Self::FullName => "full_name",
            Self::Author => "author",
        }
    }

    /// Read the field from a card.
    pub fn value<'a>(&self, card: &'a Card) -> &'a str {
        match self {
            Self::TripTypes => &card.trip_types,
            Self::Climate => &card.climate,
            Self::SpecialRequirements => &card.special_requirements,
            Self::FullName => &card.full_name,
            Self::Author => &card.author,
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CardField {
    type Err = DiscoveryError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| DiscoveryError::Configuration(format!("no predicate provider for key '{}'", key)))
    }
}

/// Boolean filter over cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardPredicate {
    /// Matches every card
    Always,
    /// Field contains the needle as a substring
    Contains { field: CardField, needle: String },
    /// Field equals the value
    Equals { field: CardField, value: String },
    /// Field differs from the value
    NotEquals { field: CardField, value: String },
    /// Every child matches (empty = true)
    All(Vec<CardPredicate>),
    /// Some child matches (empty = false)
    Any(Vec<CardPredicate>),
}

impl CardPredicate {
    pub fn contains(field: CardField, needle: impl Into<String>) -> Self {
        Self::Contains {
            field,
            needle: needle.into(),
        }
    }

    pub fn equals(field: CardField, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn not_equals(field: CardField, value: impl Into<String>) -> Self {
        Self::NotEquals {
            field,
            value: value.into(),
        }
    }

    /// Conjunction, flattening nested `All` and dropping `Always`.
    pub fn and(self, other: CardPredicate) -> Self {
        let mut parts = match self {
            Self::Always => Vec::new(),
            Self::All(parts) => parts,
            single => vec![single],
        };
        match other {
            Self::Always => {}
            Self::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        match parts.len() {
            0 => Self::Always,
            1 => parts.remove(0),
            _ => Self::All(parts),
        }
    }

    /// Evaluate against a card.
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::Always => true,
            Self::Contains { field, needle } => field.value(card).contains(needle.as_str()),
            Self::Equals { field, value } => field.value(card) == value,
            Self::NotEquals { field, value } => field.value(card) != value,
            Self::All(parts) => parts.iter().all(|p| p.matches(card)),
            Self::Any(parts) => parts.iter().any(|p| p.matches(card)),
        }
    }

    /// Fields this predicate inspects.
    pub fn fields(&self) -> Vec<CardField> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<CardField>) {
        match self {
            Self::Always => {}
            Self::Contains { field, .. }
            | Self::Equals { field, .. }
            | Self::NotEquals { field, .. } => {
                if !out.contains(field) {
                    out.push(*field);
                }
            }
            Self::All(parts) | Self::Any(parts) => {
                for part in parts {
                    part.collect_fields(out);
                }
            }
        }
    }
}

impl Default for CardPredicate {
    fn default() -> Self {
        Self::Always
    }
}
