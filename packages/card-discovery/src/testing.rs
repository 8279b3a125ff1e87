//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the discovery engine
//! without making real language-model calls.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{DiscoveryError, GenerationStage, Result};
use crate::traits::generator::TextGenerator;
use crate::types::card::NewCard;

/// A mock text generator for testing.
///
/// Answers prompts from canned rules: the first rule whose marker occurs in
/// the prompt wins. Stage rules recognise the default prompt templates;
/// detail rules also match the location name. A prompt no rule matches is
/// a `Generator` error.
#[derive(Default, Clone)]
pub struct MockGenerator {
    /// (marker, response) in registration order
    rules: Arc<RwLock<Vec<(String, String)>>>,

    /// Simulated latency per call
    delay: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockGeneratorCall>>>,
}

/// Record of a call made to the mock generator.
#[derive(Debug, Clone)]
pub struct MockGeneratorCall {
    pub stage: Option<GenerationStage>,
    pub prompt: String,
}

impl MockGenerator {
    /// Create a new mock generator with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `response` whenever the prompt contains `marker`.
    pub fn on_prompt(self, marker: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((marker.into(), response.into()));
        self
    }

    /// Answer every prompt of `stage` with `response`.
    pub fn on_stage(self, stage: GenerationStage, response: impl Into<String>) -> Self {
        self.on_prompt(stage_marker(stage), response)
    }

    /// Answer the detail prompt for `full_name` with `response`.
    pub fn on_detail(self, full_name: &str, response: impl Into<String>) -> Self {
        self.on_prompt(format!("this location: {}\n", full_name), response)
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockGeneratorCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Number of calls made for one stage.
    pub fn stage_calls(&self, stage: GenerationStage) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| call.stage == Some(stage))
            .count()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .map(|call| call.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.write().unwrap().push(MockGeneratorCall {
            stage: detect_stage(prompt),
            prompt: prompt.to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let rules = self.rules.read().unwrap();
        rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| {
                let head: String = prompt.chars().take(60).collect();
                DiscoveryError::Generator(format!("no canned response for prompt '{}'", head).into())
            })
    }
}

/// Text that identifies each default prompt template.
pub fn stage_marker(stage: GenerationStage) -> &'static str {
    match stage {
        GenerationStage::List => "I am in ",
        GenerationStage::Dedup => "I have two lists of locations",
        GenerationStage::Correction => "I have this list of locations",
        GenerationStage::Detail => "I want to know more about this location",
        GenerationStage::Region => "Define the region",
        GenerationStage::Continent => "Define the continent",
    }
}

fn detect_stage(prompt: &str) -> Option<GenerationStage> {
    [
        GenerationStage::Region,
        GenerationStage::Continent,
        GenerationStage::Dedup,
        GenerationStage::Correction,
        GenerationStage::Detail,
        GenerationStage::List,
    ]
    .into_iter()
    .find(|stage| prompt.contains(stage_marker(*stage)))
}

/// A `{"locationNames": [...]}` answer.
pub fn list_json(names: &[&str]) -> String {
    serde_json::json!({ "locationNames": names }).to_string()
}

/// A detail answer for `full_name`.
pub fn detail_json(full_name: &str, trip_types: &str, climate: &str) -> String {
    serde_json::json!({
        "fullName": full_name,
        "tripTypes": trip_types,
        "climate": climate,
        "specialRequirements": "",
        "description": format!("A well-known place: {}.", full_name),
        "whyThisPlace": "Iconic views|Rich history|Easy to reach",
    })
    .to_string()
}

/// A generator that answers every stage for `names`, each detailed as
/// `trip_type` with a temperate climate.
pub fn generator_for(names: &[&str], trip_type: &str) -> MockGenerator {
    let mut generator = MockGenerator::new()
        .on_stage(GenerationStage::List, list_json(names))
        .on_stage(GenerationStage::Dedup, list_json(names))
        .on_stage(GenerationStage::Correction, list_json(names));
    for name in names {
        generator = generator.on_detail(name, detail_json(name, trip_type, "Temperate"));
    }
    generator
}

/// A shown card with coordinates, ready to seed a catalog.
pub fn seed_card(
    author: &str,
    full_name: &str,
    trip_types: &[&str],
    latitude: f64,
    longitude: f64,
) -> NewCard {
    NewCard::new(author, full_name)
        .with_trip_types(trip_types)
        .with_climate("Temperate")
        .with_coordinates(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let generator = MockGenerator::new()
            .on_prompt("Paris", "first")
            .on_prompt("Paris", "second");

        assert_eq!(generator.complete("Tell me about Paris").await.unwrap(), "first");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_prompt_is_generator_error() {
        let generator = MockGenerator::new();
        let err = generator.complete("hello").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Generator(_)));
        assert_eq!(generator.prompts(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_stage_detection() {
        let generator = MockGenerator::new().on_stage(GenerationStage::Correction, "{}");
        generator
            .complete("I have this list of locations in json:\n{}")
            .await
            .unwrap();
        assert_eq!(generator.stage_calls(GenerationStage::Correction), 1);
        assert_eq!(generator.stage_calls(GenerationStage::Dedup), 0);

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].stage, Some(GenerationStage::Correction));
    }

    #[test]
    fn test_list_json_shape() {
        let json = list_json(&["Louvre|Paris|Ile-de-France|France|Europe"]);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["locationNames"][0], "Louvre|Paris|Ile-de-France|France|Europe");
    }
}
