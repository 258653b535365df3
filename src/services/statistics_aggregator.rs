//! Statistics aggregator for QuizDeck.
//!
//! Derives the per-URL grouped visit history the statistics page renders.
//! Pure over the ledger's records: never mutates anything and is safe to
//! call at any time.

use std::collections::HashMap;

use crate::types::visit::{QuizHistory, VisitRecord, VisitSummary};

/// Groups visit records by URL for display.
///
/// Groups appear in first-seen order; within a group, visits are ordered by
/// timestamp descending (most recent first). The group title is taken from
/// the first-seen record referencing that URL.
pub fn build_history(visits: &[VisitRecord]) -> Vec<QuizHistory> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, QuizHistory> = HashMap::new();

    for visit in visits {
        let group = groups.entry(visit.url.clone()).or_insert_with(|| {
            order.push(visit.url.clone());
            QuizHistory {
                url: visit.url.clone(),
                title: visit.title.clone(),
                visits: Vec::new(),
            }
        });
        group.visits.push(VisitSummary {
            timestamp: visit.timestamp,
            duration: if visit.duration.is_empty() {
                "0s".to_string()
            } else {
                visit.duration.clone()
            },
        });
    }

    let mut history: Vec<QuizHistory> = order
        .into_iter()
        .filter_map(|url| groups.remove(&url))
        .collect();
    for group in &mut history {
        group.visits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
    history
}

/// Formats a millisecond timestamp as `"HH:MM - DD/MM/YYYY"` (UTC).
pub fn format_timestamp(timestamp_ms: i64) -> String {
    let secs = timestamp_ms.div_euclid(1000);
    let days = secs.div_euclid(86400);
    let time_of_day = secs.rem_euclid(86400);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:02}:{:02} - {:02}/{:02}/{}",
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        day,
        month,
        year
    )
}

/// Converts days since the UNIX epoch to a (year, month, day) civil date.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
