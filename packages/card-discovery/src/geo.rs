//! Great-circle distance between coordinates.

use serde::{Deserialize, Serialize};

use crate::types::card::Card;
use crate::types::view::CardView;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components exactly zero means the location was not found.
    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl From<&Card> for Coordinates {
    fn from(card: &Card) -> Self {
        Self::new(card.latitude, card.longitude)
    }
}

/// Calculate distance between two coordinates in whole kilometers
///
/// Uses the Haversine formula; the result is truncated, not rounded.
pub fn distance_km(origin: Coordinates, point: Coordinates) -> i64 {
    let dlat = (point.latitude - origin.latitude).to_radians();
    let dlng = (point.longitude - origin.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + origin.latitude.to_radians().cos()
            * point.latitude.to_radians().cos()
            * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c) as i64
}

/// Project cards to views carrying their distance from `origin`.
///
/// Order is preserved; nothing is sorted by distance.
pub fn with_distances(origin: Coordinates, cards: &[Card]) -> Vec<CardView> {
    cards
        .iter()
        .map(|card| CardView::from_card(card, distance_km(origin, Coordinates::from(card))))
        .collect()
}

/// Floor a coordinate to six decimal places.
pub fn truncate_coordinate(value: f64) -> f64 {
    const SCALE: f64 = 1_000_000.0;
    (value * SCALE).floor() / SCALE
}
