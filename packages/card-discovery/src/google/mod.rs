//! Google adapters for the geocoding and image ports.
//!
//! - `GoogleGeocoder` - Geocoding API lookups and short map link expansion
//! - `GoogleImageSearch` - Custom Search image results

mod geocoding;
mod images;

pub use geocoding::{parse_map_url, GoogleGeocoder};
pub use images::GoogleImageSearch;
