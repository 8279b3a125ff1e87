//! JSON shapes the generator must answer with, and their parsing.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, GenerationStage, Result};
use crate::traits::generator::TextGenerator;

/// `{"locationNames": [...]}`, answered by the list, dedup and correction
/// stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationList {
    pub location_names: Vec<String>,
}

impl LocationList {
    /// Serialize for embedding in the next prompt.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"locationNames":[]}"#))
    }
}

/// Answer of the detail stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    pub full_name: String,
    #[serde(default)]
    pub trip_types: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub special_requirements: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub why_this_place: String,
}

/// Parse a generator answer for `stage`.
///
/// Tolerates surrounding whitespace and a markdown code fence; anything else
/// that is not the expected JSON is a `GenerationContract` error carrying
/// the raw text.
pub fn parse_stage<T: DeserializeOwned>(stage: GenerationStage, raw: &str) -> Result<T> {
    serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(strip_code_fence(raw)))
        .map_err(|e| DiscoveryError::contract(stage, e.to_string(), raw))
}

/// Call the generator for `stage`, giving up after `timeout`.
///
/// An expired call is reported as a contract failure of that stage.
pub async fn complete_within<G: TextGenerator + ?Sized>(
    generator: &G,
    prompt: &str,
    stage: GenerationStage,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, generator.complete(prompt)).await {
        Ok(answer) => answer,
        Err(_) => Err(DiscoveryError::contract(
            stage,
            format!("timed out after {}s", timeout.as_secs()),
            "",
        )),
    }
}

/// Remove a surrounding ```` ```json ```` fence.
pub fn strip_code_fence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
