//! Integration tests for the discovery engine.
//!
//! These drive full searches against an in-memory catalog:
//! 1. Resolve the travel scope
//! 2. Query the catalog with the composed predicate
//! 3. Generate, enrich and persist when the page cannot be filled
//! 4. Query again and slice the requested page

use card_discovery::{
    testing::{detail_json, generator_for, list_json, seed_card, MockGenerator},
    Catalog, DiscoveryConfig, DiscoveryEngine, DiscoveryError, ExclusionIndex, GenerationPipeline,
    GenerationStage, MemoryCatalog, MockGeocoder, MockImageSearcher, PageRequest, Prompts,
    SearchCriteria,
};

const LOUVRE: &str = "Louvre|Paris|Ile-de-France|France|Europe";
const ORSAY: &str = "Musee d'Orsay|Paris|Ile-de-France|France|Europe";
const MONT_SAINT_MICHEL: &str = "Mont Saint-Michel|Le Mont-Saint-Michel|Normandy|France|Europe";
const PALAIS_DES_PAPES: &str =
    "Palais des Papes|Avignon|Provence-Alpes-Cote d'Azur|France|Europe";
const CHAMBORD: &str = "Chateau de Chambord|Chambord|Centre-Val de Loire|France|Europe";
const PONT_DU_GARD: &str = "Pont du Gard|Vers-Pont-du-Gard|Occitanie|France|Europe";
const CARCASSONNE: &str = "Cite de Carcassonne|Carcassonne|Occitanie|France|Europe";
const PRADO: &str = "Prado|Madrid|Community of Madrid|Spain|Europe";

/// Geocoder that knows the search origin and every place used below.
fn geocoder() -> MockGeocoder {
    MockGeocoder::new()
        .with_location("Paris,France", 48.8566, 2.3522)
        .with_location("Louvre Paris", 48.8606, 2.3376)
        .with_location("Musee d'Orsay Paris", 48.86, 2.3266)
        .with_location("Pont du Gard Vers-Pont-du-Gard", 43.9475, 4.5353)
        .with_location("Cite de Carcassonne Carcassonne", 43.2063, 2.3646)
        .with_location("Prado Madrid", 40.4138, -3.6921)
}

/// Five shown AI culture cards in France.
async fn seed_french_culture(catalog: &MemoryCatalog) {
    let seeds = [
        (LOUVRE, 48.8606, 2.3376),
        (ORSAY, 48.86, 2.3266),
        (MONT_SAINT_MICHEL, 48.6361, -1.5115),
        (PALAIS_DES_PAPES, 43.9508, 4.8075),
        (CHAMBORD, 47.6162, 1.5170),
    ];
    for (full_name, latitude, longitude) in seeds {
        catalog
            .save(&seed_card("AI", full_name, &["Culture"], latitude, longitude))
            .await
            .unwrap();
    }
}

fn ai_culture_in_france() -> SearchCriteria {
    SearchCriteria::new("Paris,France")
        .with_trip_types(["Culture"])
        .with_travel_scope("Country")
        .with_author_filter(["AI"])
}

#[tokio::test]
async fn test_country_scope_resolves_and_filters() {
    let catalog = MemoryCatalog::new();
    catalog
        .save(&seed_card("wanderer42", LOUVRE, &["Culture"], 48.8606, 2.3376))
        .await
        .unwrap();
    catalog
        .save(&seed_card("wanderer42", PRADO, &["Culture"], 40.4138, -3.6921))
        .await
        .unwrap();
    catalog
        .save(&seed_card("wanderer42", ORSAY, &["Romantic"], 48.86, 2.3266))
        .await
        .unwrap();

    let generator = MockGenerator::new();
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    let criteria = SearchCriteria::new("Paris,France")
        .with_trip_types(["Culture"])
        .with_climate(["Temperate"])
        .with_travel_scope("Country");

    let resolved = engine.resolve_scope(criteria.clone()).await.unwrap();
    assert_eq!(resolved.travel_scope, vec!["France".to_string()]);

    let page = engine.search(criteria, PageRequest::default()).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.cards[0].name, "Louvre");
    assert_eq!(page.cards[0].where_is, "Paris, Ile-de-France, France, Europe");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_short_page_runs_exactly_one_generation_round() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let generator = generator_for(&[PONT_DU_GARD, CARCASSONNE], "Culture");
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    let page = engine
        .search(ai_culture_in_france(), PageRequest::new(0, 8))
        .await
        .unwrap();

    assert_eq!(generator.stage_calls(GenerationStage::List), 1);
    assert_eq!(generator.stage_calls(GenerationStage::Detail), 2);
    assert_eq!(engine.catalog().card_count(), 7);
    assert_eq!(page.len(), 7);
}

#[tokio::test]
async fn test_later_page_counts_every_earlier_page() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let generator = generator_for(&[PONT_DU_GARD, CARCASSONNE], "Culture");
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    // Page 0 of size 3 needs 3 cards and five exist.
    let first = engine
        .search(ai_culture_in_france(), PageRequest::new(0, 3))
        .await
        .unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(generator.call_count(), 0);

    // Page 1 needs 6 cards in total, one more than the catalog holds.
    let second = engine
        .search(ai_culture_in_france(), PageRequest::new(1, 3))
        .await
        .unwrap();
    assert_eq!(generator.stage_calls(GenerationStage::List), 1);
    assert_eq!(engine.catalog().card_count(), 7);
    assert_eq!(second.page, 1);
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn test_round_that_adds_nothing_still_serves_what_exists() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    // Neither place can be geocoded, so the round persists nothing.
    let generator = generator_for(&[PONT_DU_GARD, CARCASSONNE], "Culture");
    let engine = DiscoveryEngine::new(
        catalog,
        generator.clone(),
        MockGeocoder::new(),
        MockImageSearcher::new(),
    );

    let page = engine
        .search(ai_culture_in_france(), PageRequest::new(0, 8))
        .await
        .unwrap();

    assert_eq!(generator.stage_calls(GenerationStage::List), 1);
    assert_eq!(page.len(), 5);
}

#[tokio::test]
async fn test_known_locations_are_excluded_from_prompts() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let generator = generator_for(&[PONT_DU_GARD], "Culture");
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    engine
        .search(ai_culture_in_france(), PageRequest::new(0, 8))
        .await
        .unwrap();

    let list_prompt = generator
        .prompts()
        .into_iter()
        .find(|prompt| prompt.starts_with("I am in "))
        .unwrap();
    assert!(list_prompt.contains("Louvre (Paris)"));
    assert!(list_prompt.contains("Chateau de Chambord (Chambord)"));
    assert!(list_prompt.contains("France"));
}

#[tokio::test]
async fn test_user_filter_without_matches_fails_without_generating() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let generator = MockGenerator::new();
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    let criteria = SearchCriteria::new("Paris,France")
        .with_trip_types(["Culture"])
        .with_travel_scope("Populated locality")
        .with_author_filter(["User"]);
    let err = engine
        .search(criteria, PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::CardSearch { .. }));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_author_filter_semantics() {
    let catalog = MemoryCatalog::new();
    catalog
        .save(&seed_card("AI", LOUVRE, &["Culture"], 48.8606, 2.3376))
        .await
        .unwrap();
    catalog
        .save(&seed_card("wanderer42", ORSAY, &["Culture"], 48.86, 2.3266))
        .await
        .unwrap();
    catalog
        .save(&seed_card("globetrotter", PRADO, &["Culture"], 40.4138, -3.6921))
        .await
        .unwrap();

    let engine = DiscoveryEngine::new(catalog, MockGenerator::new(), geocoder(), MockImageSearcher::new());
    let authors_for = |filter: &[&str]| {
        SearchCriteria::new("Paris,France").with_author_filter(filter.iter().copied())
    };

    let generated = engine
        .search(authors_for(&["AI"]), PageRequest::new(0, 1))
        .await
        .unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated.cards[0].author, "AI");

    let exact = engine
        .search(authors_for(&["globetrotter"]), PageRequest::new(0, 8))
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact.cards[0].name, "Prado");

    let human = engine
        .search(authors_for(&["User"]), PageRequest::new(0, 8))
        .await
        .unwrap();
    assert_eq!(human.len(), 2);
    assert!(human.cards.iter().all(|card| card.author != "AI"));

    let all = engine
        .search(authors_for(&[]), PageRequest::new(0, 8))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_unresolved_locations_never_persisted() {
    let generator = generator_for(&[LOUVRE, PONT_DU_GARD], "Culture");
    let geocoder = MockGeocoder::new()
        .with_location("Paris,France", 48.8566, 2.3522)
        .with_location("Louvre Paris", 48.8606, 2.3376);
    let engine = DiscoveryEngine::new(MemoryCatalog::new(), generator, geocoder, MockImageSearcher::new());

    engine
        .search(ai_culture_in_france(), PageRequest::default())
        .await
        .unwrap();

    let stored = engine.catalog().cards();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].full_name, LOUVRE);
    assert!(stored
        .iter()
        .all(|card| !(card.latitude == 0.0 && card.longitude == 0.0)));
}

#[tokio::test]
async fn test_generation_is_idempotent_against_the_catalog() {
    let catalog = MemoryCatalog::new();
    let generator = generator_for(&[LOUVRE, ORSAY], "Culture");
    let geocoder = geocoder();
    let images = MockImageSearcher::new();
    let prompts = Prompts::default();
    let config = DiscoveryConfig::default();
    let criteria = SearchCriteria::new("Paris,France")
        .with_trip_types(["Culture"])
        .with_travel_scope("France")
        .with_author_filter(["AI"]);
    let exclusions = ExclusionIndex::build(&criteria.trip_types, &[]);

    let pipeline = GenerationPipeline::new(&catalog, &generator, &geocoder, &images, &prompts, &config);

    let first = pipeline.generate(&criteria, &exclusions).await.unwrap();
    assert_eq!(first.len(), 2);
    for card in &first {
        catalog.save(card).await.unwrap();
    }

    let second = pipeline.generate(&criteria, &exclusions).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(catalog.card_count(), 2);
}

#[tokio::test]
async fn test_repeated_searches_do_not_duplicate_rows() {
    let generator = generator_for(&[LOUVRE, ORSAY], "Culture");
    let engine = DiscoveryEngine::new(MemoryCatalog::new(), generator.clone(), geocoder(), MockImageSearcher::new());

    for _ in 0..2 {
        let page = engine
            .search(ai_culture_in_france(), PageRequest::new(0, 20))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    assert_eq!(engine.catalog().card_count(), 2);
    assert_eq!(generator.stage_calls(GenerationStage::List), 2);
}

#[tokio::test]
async fn test_contract_violation_propagates() {
    let generator = MockGenerator::new()
        .on_stage(GenerationStage::List, list_json(&[LOUVRE]))
        .on_stage(GenerationStage::Dedup, "Sure! Here are the locations: Louvre");
    let engine = DiscoveryEngine::new(MemoryCatalog::new(), generator, geocoder(), MockImageSearcher::new());

    let err = engine
        .search(ai_culture_in_france(), PageRequest::default())
        .await
        .unwrap_err();

    match err {
        DiscoveryError::GenerationContract { stage, raw, .. } => {
            assert_eq!(stage, GenerationStage::Dedup);
            assert!(raw.contains("Sure!"));
        }
        other => panic!("expected contract error, got {other:?}"),
    }
    assert_eq!(engine.catalog().card_count(), 0);
}

#[tokio::test]
async fn test_region_scope_is_resolved_by_generator() {
    let region_answer = serde_json::json!({
        "startLocation": "Paris,France",
        "tripTypes": ["Culture"],
        "travelScope": ["Ile-de-France"],
        "authorFilter": ["AI"],
    })
    .to_string();
    let generator = generator_for(&[LOUVRE, PONT_DU_GARD], "Culture")
        .on_stage(GenerationStage::Region, region_answer);
    let engine = DiscoveryEngine::new(MemoryCatalog::new(), generator.clone(), geocoder(), MockImageSearcher::new());

    let criteria = SearchCriteria::new("Paris,France")
        .with_trip_types(["Culture"])
        .with_travel_scope("Region")
        .with_author_filter(["AI"]);
    let page = engine.search(criteria, PageRequest::default()).await.unwrap();

    // Pont du Gard is outside Ile-de-France and is dropped before enrichment.
    assert_eq!(generator.stage_calls(GenerationStage::Region), 1);
    assert_eq!(page.len(), 1);
    assert_eq!(page.cards[0].name, "Louvre");
}

#[tokio::test]
async fn test_empty_trip_types_generate_nothing() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let generator = MockGenerator::new();
    let engine = DiscoveryEngine::new(catalog, generator.clone(), geocoder(), MockImageSearcher::new());

    let criteria = SearchCriteria::new("Paris,France")
        .with_travel_scope("Country")
        .with_author_filter(["AI"]);
    let page = engine.search(criteria, PageRequest::new(0, 8)).await.unwrap();

    assert_eq!(page.len(), 5);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let catalog = MemoryCatalog::new();
    seed_french_culture(&catalog).await;

    let engine = DiscoveryEngine::new(catalog, MockGenerator::new(), geocoder(), MockImageSearcher::new());
    let criteria = SearchCriteria::new("Paris,France")
        .with_travel_scope("Country")
        .with_author_filter(["User"]);

    let err = engine
        .search(criteria.clone(), PageRequest::new(3, 8))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscoveryError::CardSearch { .. }));

    let page = engine
        .search(
            criteria.with_author_filter(Vec::<String>::new()),
            PageRequest::new(3, 8),
        )
        .await
        .unwrap();
    assert_eq!(page.page, 3);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_results_carry_distance_from_start() {
    let catalog = MemoryCatalog::new();
    catalog
        .save(&seed_card("AI", PRADO, &["Culture"], 40.4138, -3.6921))
        .await
        .unwrap();

    let engine = DiscoveryEngine::new(catalog, MockGenerator::new(), geocoder(), MockImageSearcher::new());
    let page = engine
        .search(SearchCriteria::new("Paris,France"), PageRequest::default())
        .await
        .unwrap();

    let distance = page.cards[0].distance;
    assert!((1040..=1060).contains(&distance), "Paris to Madrid was {distance} km");
}

#[tokio::test]
async fn test_detail_answers_are_tagged_with_requested_filters() {
    let generator = MockGenerator::new()
        .on_stage(GenerationStage::List, list_json(&[LOUVRE]))
        .on_stage(GenerationStage::Dedup, list_json(&[LOUVRE]))
        .on_stage(GenerationStage::Correction, list_json(&[LOUVRE]))
        .on_detail(LOUVRE, detail_json(LOUVRE, "Romantic", "Temperate"));
    let engine = DiscoveryEngine::new(MemoryCatalog::new(), generator, geocoder(), MockImageSearcher::new());

    let criteria = ai_culture_in_france().with_special_requirements(["With kids"]);
    let page = engine.search(criteria, PageRequest::default()).await.unwrap();

    let card = &page.cards[0];
    assert_eq!(card.trip_types, vec!["Romantic", "Culture"]);
    assert_eq!(card.special_requirements, vec!["With kids"]);
    assert_eq!(card.author, "AI");
    assert_eq!(card.image_links, vec!["https://images.example.com/louvre-paris.jpg"]);
}
