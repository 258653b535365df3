//! Visited-Set Tracker for QuizDeck.
//!
//! Owns the per-URL visited flag, independent of the visit ledger: a URL can
//! be unmarked while its visit history stays in the ledger. Flags are
//! persisted as a JSON object (`{url: true}`) through the key-value store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::store::KeyValueStore;
use crate::managers::visit_ledger::{VisitLedger, VisitLedgerTrait};

/// Store key holding the visited-flag map.
pub const STORAGE_KEY: &str = "visitedQuizLinks";

/// Trait defining visited-flag operations.
pub trait VisitedTrackerTrait {
    fn is_visited(&self, url: &str) -> bool;
    fn mark_visited(&mut self, url: &str, title: &str, ledger: &mut VisitLedger);
    fn mark_unvisited(&mut self, url: &str);
    fn visited_urls(&self) -> Vec<&str>;
    fn clear(&mut self);
}

/// Visited-flag tracker backed by the key-value store.
pub struct VisitedTracker {
    store: Arc<dyn KeyValueStore>,
    visited: BTreeMap<String, bool>,
}

impl VisitedTracker {
    /// Creates a tracker, loading any previously persisted flags.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let visited = Self::load(store.as_ref());
        Self { store, visited }
    }

    fn load(store: &dyn KeyValueStore) -> BTreeMap<String, bool> {
        match store.get(STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("corrupt visited-links value, starting from empty set: {}", e);
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                log::warn!("failed to load visited links, starting from empty set: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// Sets the flag and persists, without touching the ledger.
    ///
    /// Used for URLs whose title cannot be resolved from the catalog; the
    /// flag is still recorded even though no ledger entry is created.
    pub fn set_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string(), true);
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.visited) {
            Ok(json) => {
                if let Err(e) = self.store.set(STORAGE_KEY, &json) {
                    log::error!("failed to save visited links: {}", e);
                }
            }
            Err(e) => log::error!("failed to serialize visited links: {}", e),
        }
    }
}

impl VisitedTrackerTrait for VisitedTracker {
    fn is_visited(&self, url: &str) -> bool {
        self.visited.get(url).copied().unwrap_or(false)
    }

    /// Flags `url` as visited and records the open in the ledger. The title
    /// is an explicit caller input, resolved from the catalog upstream.
    fn mark_visited(&mut self, url: &str, title: &str, ledger: &mut VisitLedger) {
        self.set_visited(url);
        ledger.record_open(url, title);
    }

    /// Removes the flag. Ledger records for the URL are intentionally kept.
    fn mark_unvisited(&mut self, url: &str) {
        self.visited.remove(url);
        self.persist();
    }

    fn visited_urls(&self) -> Vec<&str> {
        self.visited.keys().map(String::as_str).collect()
    }

    /// Drops all flags and removes the store key.
    fn clear(&mut self) {
        self.visited.clear();
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            log::error!("failed to clear visited links: {}", e);
        }
    }
}
