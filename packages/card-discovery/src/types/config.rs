//! Configuration for the discovery engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Configuration for searching and generating cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// How many generate-then-requery rounds a search may run.
    ///
    /// Default: 1 (try once more, then accept whatever exists).
    pub max_generation_rounds: usize,

    /// Candidate names requested per round, split across trip types.
    ///
    /// Default: 30.
    pub total_target: usize,

    /// Upper bound on a single generator call, in seconds.
    ///
    /// A call that exceeds it counts as a contract failure. Default: 60.
    pub call_timeout_secs: u64,

    /// Run the per-trip-type generation branches concurrently.
    ///
    /// Default: true.
    pub parallel_trip_types: bool,

    /// Fixed tag vocabularies offered to the generator.
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_generation_rounds: 1,
            total_target: 30,
            call_timeout_secs: 60,
            parallel_trip_types: true,
            vocabulary: Vocabulary::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `DISCOVERY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each
    /// `DISCOVERY_*` key. Malformed values and a zero timeout are
    /// `Configuration` errors.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(rounds) = parse_var(&lookup, "DISCOVERY_MAX_GENERATION_ROUNDS")? {
            config.max_generation_rounds = rounds;
        }
        if let Some(target) = parse_var(&lookup, "DISCOVERY_TOTAL_TARGET")? {
            config.total_target = target;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DISCOVERY_CALL_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(DiscoveryError::Configuration(
                    "DISCOVERY_CALL_TIMEOUT_SECS must be at least 1".into(),
                ));
            }
            config.call_timeout_secs = secs;
        }
        if let Some(parallel) = parse_var(&lookup, "DISCOVERY_PARALLEL_TRIP_TYPES")? {
            config.parallel_trip_types = parallel;
        }
        Ok(config)
    }

    /// Set the number of generation rounds.
    pub fn with_max_generation_rounds(mut self, rounds: usize) -> Self {
        self.max_generation_rounds = rounds;
        self
    }

    /// Set the per-round candidate target.
    pub fn with_total_target(mut self, target: usize) -> Self {
        self.total_target = target;
        self
    }

    /// Set the generator call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Toggle concurrent trip-type generation.
    pub fn with_parallel_trip_types(mut self, parallel: bool) -> Self {
        self.parallel_trip_types = parallel;
        self
    }

    /// Generator call timeout as a `Duration`, never below one second.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs.max(1))
    }

    /// Names to request per trip type: `ceil(total_target / trip_types)`.
    pub fn names_per_trip_type(&self, trip_types: usize) -> usize {
        if trip_types == 0 {
            return self.total_target;
        }
        self.total_target.div_ceil(trip_types)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DiscoveryError::Configuration(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}

/// Tag vocabularies the generator must choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub trip_types: Vec<String>,
    pub climates: Vec<String>,
    pub special_requirements: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            trip_types: owned(&[
                "Active",
                "Chill",
                "Native culture",
                "Family",
                "Culture",
                "Spiritual",
                "Extreme",
                "Corporate",
                "Nature",
                "Shopping",
                "Romantic",
                "Party",
            ]),
            climates: owned(&["Tropical", "Polar", "Temperate"]),
            special_requirements: owned(&["With pets", "With kids", "LGBTQ friendly", "Disability"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_per_trip_type_rounds_up() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.names_per_trip_type(1), 30);
        assert_eq!(config.names_per_trip_type(4), 8);
        assert_eq!(config.names_per_trip_type(7), 5);
        assert_eq!(config.names_per_trip_type(0), 30);
    }

    #[test]
    fn test_builder() {
        let config = DiscoveryConfig::new()
            .with_total_target(12)
            .with_call_timeout(Duration::from_secs(5))
            .with_parallel_trip_types(false);

        assert_eq!(config.total_target, 12);
        assert_eq!(config.call_timeout(), Duration::from_secs(5));
        assert!(!config.parallel_trip_types);
        assert_eq!(config.max_generation_rounds, 1);
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_vars_overlays_defaults() {
        let config = DiscoveryConfig::from_vars(vars(&[
            ("DISCOVERY_TOTAL_TARGET", " 12 "),
            ("DISCOVERY_PARALLEL_TRIP_TYPES", "false"),
        ]))
        .unwrap();

        assert_eq!(config.total_target, 12);
        assert!(!config.parallel_trip_types);
        assert_eq!(config.call_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_malformed_value_is_configuration_error() {
        let err = DiscoveryConfig::from_vars(vars(&[("DISCOVERY_MAX_GENERATION_ROUNDS", "many")]))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));
        assert!(err.to_string().contains("DISCOVERY_MAX_GENERATION_ROUNDS"));
    }

    #[test]
    fn test_zero_timeout_is_configuration_error() {
        let err = DiscoveryConfig::from_vars(vars(&[("DISCOVERY_CALL_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));

        let config = DiscoveryConfig::new().with_call_timeout(Duration::ZERO);
        assert_eq!(config.call_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_deserialize_without_vocabulary() {
        let json = r#"{
            "max_generation_rounds": 2,
            "total_target": 10,
            "call_timeout_secs": 15,
            "parallel_trip_types": false
        }"#;
        let config: DiscoveryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_generation_rounds, 2);
        assert_eq!(config.vocabulary.climates.len(), 3);
    }
}
