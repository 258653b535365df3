//! Visit Ledger for QuizDeck.
//!
//! Owns the ordered list of visit records: creating a record on first open,
//! merging repeat opens into the existing open record, closing visits with a
//! formatted duration, and accumulating session time. Persists the whole
//! [`StatisticsState`] as JSON through the key-value store after every
//! mutation.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::database::store::KeyValueStore;
use crate::types::visit::{StatisticsState, VisitRecord};

/// Store key holding the statistics JSON.
pub const STORAGE_KEY: &str = "quizStatistics";

/// Maximum number of retained visit records. Oldest records beyond the cap
/// are dropped on every persist.
pub const MAX_VISIT_HISTORY: usize = 50;

/// Trait defining visit ledger operations.
pub trait VisitLedgerTrait {
    fn record_open(&mut self, url: &str, title: &str);
    fn record_close(&mut self, url: &str);
    fn accumulate_session_time(&mut self);
    fn visits(&self) -> &[VisitRecord];
    fn total_time_spent(&self) -> i64;
    fn last_visit(&self) -> Option<i64>;
    fn clear(&mut self);
}

/// Visit ledger backed by the key-value store.
///
/// Store failures never surface from ledger operations: reads fall back to
/// an empty default state, writes are logged and dropped.
pub struct VisitLedger {
    store: Arc<dyn KeyValueStore>,
    stats: StatisticsState,
    session_start_ms: i64,
}

impl VisitLedger {
    /// Creates a ledger, loading any previously persisted statistics.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let stats = Self::load(store.as_ref());
        Self {
            store,
            stats,
            session_start_ms: now_ms(),
        }
    }

    fn load(store: &dyn KeyValueStore) -> StatisticsState {
        match store.get(STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!("corrupt statistics value, starting from empty state: {}", e);
                    StatisticsState::default()
                }
            },
            Ok(None) => StatisticsState::default(),
            Err(e) => {
                log::warn!("failed to load statistics, starting from empty state: {}", e);
                StatisticsState::default()
            }
        }
    }

    /// Records an open at an explicit time. See [`VisitLedgerTrait::record_open`].
    pub fn record_open_at(&mut self, url: &str, title: &str, now_ms: i64) {
        // A repeat open while the visit is in progress merges into the open
        // record instead of creating a second one.
        if let Some(open) = self
            .stats
            .visits
            .iter_mut()
            .find(|v| v.url == url && v.end_time.is_none())
        {
            open.count += 1;
            open.last_visit_time = Some(now_ms);
            self.persist();
            return;
        }

        let visit = VisitRecord {
            url: url.to_string(),
            title: title.to_string(),
            timestamp: now_ms,
            start_time: now_ms,
            end_time: None,
            duration: "0s".to_string(),
            count: 1,
            last_visit_time: None,
        };
        self.stats.visits.insert(0, visit);
        self.stats.last_visit = Some(now_ms);
        self.persist();
    }

    /// Closes the open visit for `url` at an explicit time.
    ///
    /// Only the open record is eligible; closed history stays untouched.
    /// No open record for the URL is a no-op.
    pub fn record_close_at(&mut self, url: &str, now_ms: i64) {
        if let Some(open) = self
            .stats
            .visits
            .iter_mut()
            .find(|v| v.url == url && v.end_time.is_none())
        {
            let elapsed_secs = ((now_ms - open.start_time) / 1000).max(0);
            open.duration = format_duration(elapsed_secs);
            open.end_time = Some(now_ms);
            self.persist();
        } else {
            log::debug!("record_close for {} with no open visit, ignoring", url);
        }
    }

    /// Sets `total_time_spent` to the seconds elapsed since construction,
    /// measured against an explicit time, and persists.
    pub fn accumulate_session_time_at(&mut self, now_ms: i64) {
        self.stats.total_time_spent = ((now_ms - self.session_start_ms) / 1000).max(0);
        self.persist();
    }

    /// Returns the open record for `url`, if the visit is in progress.
    pub fn open_record(&self, url: &str) -> Option<&VisitRecord> {
        self.stats
            .visits
            .iter()
            .find(|v| v.url == url && v.end_time.is_none())
    }

    /// Truncates to the cap and writes the statistics JSON to the store.
    /// Failures are logged, never propagated.
    fn persist(&mut self) {
        if self.stats.visits.len() > MAX_VISIT_HISTORY {
            self.stats.visits.truncate(MAX_VISIT_HISTORY);
        }
        match serde_json::to_string(&self.stats) {
            Ok(json) => {
                if let Err(e) = self.store.set(STORAGE_KEY, &json) {
                    log::error!("failed to save statistics: {}", e);
                }
            }
            Err(e) => log::error!("failed to serialize statistics: {}", e),
        }
    }
}

impl VisitLedgerTrait for VisitLedger {
    /// Records an open of `url`. If a visit for the URL is already in
    /// progress, increments its count and stamps `last_visit_time`; otherwise
    /// creates a new record at the front of the ledger.
    fn record_open(&mut self, url: &str, title: &str) {
        self.record_open_at(url, title, now_ms());
    }

    /// Closes the in-progress visit for `url`, setting `end_time` and the
    /// formatted duration.
    fn record_close(&mut self, url: &str) {
        self.record_close_at(url, now_ms());
    }

    /// The one-second tick callback: refreshes the session time counter.
    fn accumulate_session_time(&mut self) {
        self.accumulate_session_time_at(now_ms());
    }

    /// Visit records, most recent first.
    fn visits(&self) -> &[VisitRecord] {
        &self.stats.visits
    }

    fn total_time_spent(&self) -> i64 {
        self.stats.total_time_spent
    }

    fn last_visit(&self) -> Option<i64> {
        self.stats.last_visit
    }

    /// Drops all statistics and removes the store key.
    fn clear(&mut self) {
        self.stats = StatisticsState::default();
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            log::error!("failed to clear statistics: {}", e);
        }
    }
}

/// Formats whole seconds as a human-readable duration.
///
/// `< 60s` → `"45s"`; `< 1h` → `"2m 5s"`; `≥ 1h` → `"1h 2m"` (seconds are
/// dropped once hours are present).
pub fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let minutes = seconds / 60;
    let hours = minutes / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

/// Returns the current UNIX timestamp in milliseconds.
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
