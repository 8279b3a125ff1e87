//! Core trait abstractions for the discovery engine.
//!
//! These traits are the ports applications implement to provide the card
//! catalog, the language model, geocoding and image search.

pub mod catalog;
pub mod generator;
pub mod geocoder;
pub mod images;
