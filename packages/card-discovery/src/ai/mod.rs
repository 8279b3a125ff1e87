//! Language-model implementations for the discovery engine.
//!
//! This module provides reference implementations of the `TextGenerator`
//! trait. Users can use these directly or implement their own.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAI;
