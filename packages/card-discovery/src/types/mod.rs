//! Data types for the discovery engine.

pub mod card;
pub mod config;
pub mod criteria;
pub mod view;
