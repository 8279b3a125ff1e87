//! Result shapes handed back to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::types::card::{split_tokens, Card, DIVIDER};

/// A card as returned by a search, annotated with its distance from the
/// search origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub trip_types: Vec<String>,
    pub climate: String,
    pub special_requirements: Vec<String>,
    /// Locality, region, country, continent
    pub where_is: String,
    pub description: String,
    pub why_this_place: Vec<String>,
    pub image_links: Vec<String>,
    pub map_link: String,
    /// Whole kilometres from the search origin
    pub distance: i64,
    pub likes: i64,
    pub shown: bool,
}

impl CardView {
    /// Project a card, attaching the precomputed distance.
    pub fn from_card(card: &Card, distance: i64) -> Self {
        let mut segments = card.full_name.split(DIVIDER).map(str::trim);
        let name = segments.next().unwrap_or_default().to_string();
        let where_is = segments.collect::<Vec<_>>().join(", ");

        Self {
            id: card.id,
            name,
            author: card.author.clone(),
            trip_types: split_tokens(&card.trip_types),
            climate: card.climate.clone(),
            special_requirements: split_tokens(&card.special_requirements),
            where_is,
            description: card.description.clone(),
            why_this_place: split_tokens(&card.why_this_place),
            image_links: split_tokens(&card.image_links),
            map_link: card.map_link.clone(),
            distance,
            likes: card.likes,
            shown: card.shown,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// The requested page number
    pub page: usize,
    pub cards: Vec<CardView>,
}

impl SearchPage {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
