//! Search Demo - End-to-End Discovery
//!
//! Runs one search against an empty in-memory catalog, so every card comes
//! from the generation pipeline: OpenAI proposes places, Google geocodes
//! them and finds pictures.
//!
//! Needs `OPENAI_API_KEY`, `GOOGLE_MAPS_API_KEY`, `GOOGLE_SEARCH_API_KEY` and
//! `GOOGLE_SEARCH_ENGINE_ID` (a `.env` file works).
//!
//! ```bash
//! cargo run --example search_demo --features openai,google -- "Lviv, Ukraine" Culture Country
//! ```

use anyhow::{Context, Result};
use card_discovery::{
    DiscoveryConfig, DiscoveryEngine, GoogleGeocoder, GoogleImageSearch, MemoryCatalog, OpenAI,
    PageRequest, SearchCriteria, AI_AUTHOR,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,card_discovery=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let start = args.next().unwrap_or_else(|| "Paris, France".to_string());
    let trip_type = args.next().unwrap_or_else(|| "Culture".to_string());
    let scope = args.next().unwrap_or_else(|| "Country".to_string());

    let config = DiscoveryConfig::from_env().context("Invalid DISCOVERY_* settings")?;
    let engine = DiscoveryEngine::new(
        MemoryCatalog::new(),
        OpenAI::from_env().context("OpenAI credentials")?,
        GoogleGeocoder::from_env().context("Google Maps credentials")?,
        GoogleImageSearch::from_env().context("Google Search credentials")?,
    )
    .with_config(config);

    let criteria = SearchCriteria::new(&start)
        .with_trip_types([trip_type.as_str()])
        .with_travel_scope(&scope)
        .with_author_filter([AI_AUTHOR]);

    tracing::info!(start = %start, trip_type = %trip_type, scope = %scope, "Searching");
    let page = engine
        .search(criteria, PageRequest::default())
        .await
        .context("Search failed")?;

    println!("Page {} ({} cards)", page.page, page.len());
    for card in &page.cards {
        println!("- {} ({}) {} km", card.name, card.where_is, card.distance);
        println!("  {}", card.description);
        println!("  {}", card.map_link);
    }

    Ok(())
}
