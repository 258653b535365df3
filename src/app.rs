//! App service object for QuizDeck.
//!
//! Central struct owning the database, the key-value store, the catalog,
//! the visited tracker, and the visit ledger. Explicitly constructed and
//! passed to whatever owns the UI session — there is no module-level state.
//!
//! The one-second session timer is embedder-driven: the owner calls
//! [`App::tick`] on its interval and must stop that interval on teardown
//! (or simply drop the App).

use std::sync::Arc;

use crate::database::connection::Database;
use crate::database::store::{KeyValueStore, SqliteStore};
use crate::managers::visit_ledger::{VisitLedger, VisitLedgerTrait};
use crate::managers::visited_tracker::{VisitedTracker, VisitedTrackerTrait};
use crate::platform;
use crate::services::quiz_catalog::QuizCatalog;
use crate::services::statistics_aggregator;
use crate::types::visit::QuizHistory;

/// Central application struct for one UI session.
pub struct App {
    pub db: Arc<Database>,
    pub catalog: QuizCatalog,
    pub tracker: VisitedTracker,
    pub ledger: VisitLedger,
    store: Arc<dyn KeyValueStore>,
    session_timer_interval_secs: u64,
    session_timer_running: bool,
}

impl App {
    /// Opens an App over the database at `db_path`.
    pub fn open(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_database(Database::open(db_path)?))
    }

    /// Opens an App over the platform data directory (`quizdeck.db`).
    pub fn open_default() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = platform::get_data_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("quizdeck.db");
        Ok(Self::with_database(Database::open(path)?))
    }

    /// Opens an App over an in-memory database; used by tests and the demo.
    pub fn open_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_database(Database::open_in_memory()?))
    }

    fn with_database(db: Database) -> Self {
        let db = Arc::new(db);
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(db.clone()));
        let catalog = QuizCatalog::with_defaults(store.as_ref());
        let tracker = VisitedTracker::new(store.clone());
        let ledger = VisitLedger::new(store.clone());
        Self {
            db,
            catalog,
            tracker,
            ledger,
            store,
            session_timer_interval_secs: 1,
            session_timer_running: true,
        }
    }

    /// Opens a quiz: flags the URL as visited and records the visit with the
    /// title resolved from the catalog (falling back to the store-cached
    /// copy). An unknown URL still gets its flag, but no ledger entry.
    pub fn open_quiz(&mut self, url: &str) {
        self.mark(url);
    }

    /// Closes the in-progress visit for `url`.
    pub fn close_quiz(&mut self, url: &str) {
        self.ledger.record_close(url);
    }

    /// Applies a visited-switch toggle. Toggling on is rejected for a URL
    /// that was never visited — the switch reflects history, it cannot
    /// invent one. Returns whether the toggle was applied.
    pub fn set_visited_switch(&mut self, url: &str, on: bool) -> bool {
        if on {
            if !self.tracker.is_visited(url) {
                return false;
            }
            self.mark(url);
        } else {
            self.tracker.mark_unvisited(url);
        }
        true
    }

    fn mark(&mut self, url: &str) {
        match self.resolve_title(url) {
            Some(title) => self.tracker.mark_visited(url, &title, &mut self.ledger),
            None => {
                log::warn!("no catalog entry for {}, flagging without a ledger record", url);
                self.tracker.set_visited(url);
            }
        }
    }

    fn resolve_title(&self, url: &str) -> Option<String> {
        if let Some(entry) = self.catalog.get_by_url(url) {
            return Some(entry.title.clone());
        }
        QuizCatalog::load_cached(self.store.as_ref())
            .into_iter()
            .find(|q| q.url == url)
            .map(|q| q.title)
    }

    /// The one-second tick callback. No-op once the timer is stopped.
    pub fn tick(&mut self) {
        if self.session_timer_running {
            self.ledger.accumulate_session_time();
        }
    }

    /// Re-enables the session timer after a stop.
    pub fn start_session_timer(&mut self) {
        self.session_timer_running = true;
    }

    /// Stops the session timer; subsequent ticks are ignored. Called on
    /// teardown so a dangling interval cannot keep writing.
    pub fn stop_session_timer(&mut self) {
        self.session_timer_running = false;
    }

    pub fn is_session_timer_running(&self) -> bool {
        self.session_timer_running
    }

    /// The interval, in seconds, the embedder should drive [`App::tick`] at.
    pub fn session_timer_interval_secs(&self) -> u64 {
        self.session_timer_interval_secs
    }

    /// The per-URL grouped visit history for display.
    pub fn build_history(&self) -> Vec<QuizHistory> {
        statistics_aggregator::build_history(self.ledger.visits())
    }

    /// Clears all stored tracking data: visited flags and statistics.
    pub fn clear_all_data(&mut self) {
        self.tracker.clear();
        self.ledger.clear();
    }
}
