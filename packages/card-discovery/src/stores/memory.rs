//! In-memory catalog implementation for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::{DiscoveryError, Result};
use crate::predicate::CardPredicate;
use crate::traits::catalog::Catalog;
use crate::types::card::{Card, NewCard};

/// In-memory card catalog.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryCatalog {
    cards: RwLock<Vec<Card>>,
    next_id: RwLock<i64>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Get the number of stored cards.
    pub fn card_count(&self) -> usize {
        self.cards.read().unwrap().len()
    }

    /// Snapshot of every stored card, in insertion order.
    pub fn cards(&self) -> Vec<Card> {
        self.cards.read().unwrap().clone()
    }

    /// Hide or reveal a card. Returns false if the id is unknown.
    pub fn set_shown(&self, id: i64, shown: bool) -> bool {
        let mut cards = self.cards.write().unwrap();
        match cards.iter_mut().find(|card| card.id == id) {
            Some(card) => {
                card.shown = shown;
                true
            }
            None => false,
        }
    }

    /// Remove a card. Returns false if the id is unknown.
    pub fn remove(&self, id: i64) -> bool {
        let mut cards = self.cards.write().unwrap();
        let before = cards.len();
        cards.retain(|card| card.id != id);
        cards.len() != before
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn find_matching(&self, predicate: &CardPredicate) -> Result<Vec<Card>> {
        Ok(self
            .cards
            .read()
            .unwrap()
            .iter()
            .filter(|card| predicate.matches(card))
            .cloned()
            .collect())
    }

    async fn save(&self, card: &NewCard) -> Result<Card> {
        card.ensure_located()?;

        let mut cards = self.cards.write().unwrap();
        if cards.iter().any(|c| c.full_name == card.full_name) {
            return Err(DiscoveryError::DuplicateCard {
                full_name: card.full_name.clone(),
            });
        }

        let mut next_id = self.next_id.write().unwrap();
        let saved = Card::from_new(*next_id, card.clone());
        *next_id += 1;

        cards.push(saved.clone());
        Ok(saved)
    }

    async fn exists_by_full_name(&self, full_name: &str) -> Result<bool> {
        Ok(self
            .cards
            .read()
            .unwrap()
            .iter()
            .any(|card| card.full_name == full_name))
    }
}
