//! LLM prompts for scope resolution and card generation.
//!
//! Templates use `{placeholder}` markers filled by the `format_*` methods on
//! [`Prompts`]. Every template asks for strict JSON so that each stage can
//! be validated before the next one runs.

use serde::{Deserialize, Serialize};

use crate::types::config::Vocabulary;

/// Prompt for the initial list of candidate locations.
pub const LIST_PROMPT: &str = r#"I am in {start_location}
Find me {amount} locations, where to travel by this requirements:
Trip type: {trip_type}
Climate: {climate}
Special requirements: {special_requirements}
The result should not contain these locations: {exclusions}
Locations must be within: {scope}. Collect locations from different parts of it. It is very important to fill the list with locations all around {scope}.
It is very important to find specific locations. Examples: square, museum, market, mall, park, certain mountain, bridge, theater, lake, embankment, castle etc.
Result should contain at least {amount} locations. Better find more than {amount}.
It is important that the locations exist. I will be in danger if travel to non-existing location.
Give me the list of locations. Return information as json object. Use this format:
{
"locationNames": ["location name 1|populated locality|region|country|continent", "location name 2|populated locality|region|country|continent", ect.]
}"#;

/// Prompt for removing already-known and near-duplicate locations.
pub const DEDUP_PROMPT: &str = r#"I have two lists of locations. The first here:
{exclusions}
The second text is a json file with locations, that has been generated by AI. Here:
{list}
I need you delete duplicates from the second list by this algorithm:
1. Delete locations that are present in the first list. Remove the same names and the names, that are very similar (if the first list is empty, skip this step).
2. If the location has several names and one of them is in the first list, remove this location from the second list (if the first list is empty, skip this step).
3. Use rules above to also delete duplicates, that the second list contains.
Return the second list in the same json format, in which you received it."#;

/// Prompt for dropping non-existent locations and fixing their placement.
pub const CORRECTION_PROMPT: &str = r#"I have this list of locations in json:
{list}
I need you to fix mistakes in this list of locations by next algorithm:
1. If the location doesn't exist remove it from the list.
2. Locations are coupled with places in which they situated. Carefully check is each location really situated in this place. If not, fix the mistake.
3. Every entry must keep the format "location name|populated locality|region|country|continent".
Return the result in the same json format."#;

/// Prompt for the details of one location.
pub const DETAIL_PROMPT: &str = r#"I want to know more about this location: {name}
Give me answer strictly as a json object. Use this format:
{
"fullName": "location name|populated locality|region|country|continent (Double check this field. Fill in each point. Use | between points. Examples: Central park|New York|New York state|USA|North America, Freedom Square|Kharkiv|Kharkiv Oblast|Ukraine|Europe)",
"tripTypes": "(add several from this list: {trip_types}. Use | between points.)",
"climate": "(one from this list: {climates})",
"specialRequirements": "(add some from this list: {special_requirements}. Use | between points)",
"description": "(2-3 sentences)",
"whyThisPlace": "reason 1|reason 2|reason 3| (3-5 words per reason)"
}"#;

/// Prompt for resolving a "Region" travel scope.
pub const REGION_PROMPT: &str = r#"I have these search parameters in json:
{criteria}
The first part of "startLocation" is a populated locality, the second is its country.
Define the region (state, province, oblast or similar administrative area) this populated locality belongs to.
Replace the single element of "travelScope" with the name of that region and change nothing else.
Return the result strictly in the same json format."#;

/// Prompt for resolving a "Continent" travel scope.
pub const CONTINENT_PROMPT: &str = r#"I have these search parameters in json:
{criteria}
The first part of "startLocation" is a populated locality, the second is its country.
Define the continent this populated locality is on.
Replace the single element of "travelScope" with the name of that continent and change nothing else.
Return the result strictly in the same json format."#;

/// Prompt templates used by the pipeline.
///
/// Defaults come from the constants in this module; callers can swap any
/// template without touching the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompts {
    pub list: String,
    pub dedup: String,
    pub correction: String,
    pub detail: String,
    pub region: String,
    pub continent: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            list: LIST_PROMPT.to_string(),
            dedup: DEDUP_PROMPT.to_string(),
            correction: CORRECTION_PROMPT.to_string(),
            detail: DETAIL_PROMPT.to_string(),
            region: REGION_PROMPT.to_string(),
            continent: CONTINENT_PROMPT.to_string(),
        }
    }
}

/// Inputs of the list prompt.
#[derive(Debug, Clone, Copy)]
pub struct ListRequest<'a> {
    pub start_location: &'a str,
    pub trip_type: &'a str,
    pub climate: &'a [String],
    pub special_requirements: &'a [String],
    pub scope: &'a str,
    pub exclusions: &'a [String],
    pub amount: usize,
}

impl Prompts {
    /// Replace the list template.
    pub fn with_list(mut self, template: impl Into<String>) -> Self {
        self.list = template.into();
        self
    }

    /// Replace the detail template.
    pub fn with_detail(mut self, template: impl Into<String>) -> Self {
        self.detail = template.into();
        self
    }

    /// Format the list prompt.
    pub fn format_list(&self, request: &ListRequest<'_>) -> String {
        self.list
            .replace("{start_location}", request.start_location)
            .replace("{amount}", &request.amount.to_string())
            .replace("{trip_type}", request.trip_type)
            .replace("{climate}", &request.climate.join(", "))
            .replace("{special_requirements}", &request.special_requirements.join(", "))
            .replace("{exclusions}", &format!("[{}]", request.exclusions.join(", ")))
            .replace("{scope}", request.scope)
    }

    /// Format the dedup prompt against every known label.
    pub fn format_dedup(&self, list: &str, all_exclusions: &str) -> String {
        self.dedup
            .replace("{exclusions}", all_exclusions)
            .replace("{list}", list)
    }

    /// Format the correction prompt.
    pub fn format_correction(&self, list: &str) -> String {
        self.correction.replace("{list}", list)
    }

    /// Format the detail prompt for one full name.
    pub fn format_detail(&self, name: &str, vocabulary: &Vocabulary) -> String {
        self.detail
            .replace("{name}", name)
            .replace("{trip_types}", &vocabulary.trip_types.join("|"))
            .replace("{climates}", &vocabulary.climates.join("|"))
            .replace("{special_requirements}", &vocabulary.special_requirements.join("|"))
    }

    /// Format the region prompt around serialized criteria.
    pub fn format_region(&self, criteria_json: &str) -> String {
        self.region.replace("{criteria}", criteria_json)
    }

    /// Format the continent prompt around serialized criteria.
    pub fn format_continent(&self, criteria_json: &str) -> String {
        self.continent.replace("{criteria}", criteria_json)
    }
}
