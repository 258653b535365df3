use serde::{Deserialize, Serialize};

/// A single visit to a quiz URL.
///
/// A record with no `end_time` is "open": the visit is still in progress.
/// At most one record per URL may be open at any time. Wire names are
/// camelCase for compatibility with the stored JSON of earlier versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub url: String,
    pub title: String,
    /// Creation time, milliseconds since the UNIX epoch.
    pub timestamp: i64,
    /// Time the visit began, milliseconds since the UNIX epoch.
    pub start_time: i64,
    /// Absent while the visit is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Human-readable elapsed time, e.g. `"3m 12s"`. `"0s"` until closed.
    pub duration: String,
    /// How many times the URL was opened while this record was open.
    pub count: u32,
    /// Set when the URL is re-opened while the record is still open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_time: Option<i64>,
}

impl VisitRecord {
    /// Whether the visit is still in progress.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Persisted statistics: session time, the visit ledger, and the most
/// recent visit creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsState {
    /// Whole seconds spent in the current session. Reset each process start.
    pub total_time_spent: i64,
    /// Visit records, most recent first.
    pub visits: Vec<VisitRecord>,
    /// Timestamp of the most recent visit creation, if any.
    pub last_visit: Option<i64>,
}

impl Default for StatisticsState {
    fn default() -> Self {
        Self {
            total_time_spent: 0,
            visits: Vec::new(),
            last_visit: None,
        }
    }
}

/// One timestamp/duration pair inside a [`QuizHistory`] group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitSummary {
    pub timestamp: i64,
    pub duration: String,
}

/// All visits to one URL, grouped for display. Produced by the
/// statistics aggregator; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizHistory {
    pub url: String,
    pub title: String,
    /// Visits ordered most recent first.
    pub visits: Vec<VisitSummary>,
}
