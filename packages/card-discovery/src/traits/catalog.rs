//! Catalog trait for persisted cards.
//!
//! The catalog is the shared external store the engine queries and enriches.
//! It owns cards once saved; this crate only reads matches, checks names and
//! inserts generated cards one at a time.

use async_trait::async_trait;

use crate::error::Result;
use crate::predicate::CardPredicate;
use crate::types::card::{Card, NewCard};

/// Persistent store of destination cards.
///
/// # Implementations
///
/// - `MemoryCatalog` - In-process, for tests and development
/// - `PostgresCatalog` - sqlx-backed (`postgres` feature)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All non-deleted cards matching the predicate, in catalog order.
    ///
    /// Hidden cards (`shown == false`) are returned too; callers filter.
    async fn find_matching(&self, predicate: &CardPredicate) -> Result<Vec<Card>>;

    /// Insert a card and return it with its assigned id.
    ///
    /// Fails with `DuplicateCard` when the full name is already taken.
    async fn save(&self, card: &NewCard) -> Result<Card>;

    /// Whether a non-deleted card with this full name exists.
    async fn exists_by_full_name(&self, full_name: &str) -> Result<bool>;
}
