//! Catalog implementations.
//!
//! Available backends:
//! - `MemoryCatalog` - In-memory storage (always available)
//! - `PostgresCatalog` - PostgreSQL storage (requires `postgres` feature)

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryCatalog;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCatalog;
