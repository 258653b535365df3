//! Quiz catalog for QuizDeck.
//!
//! The ordered, read-only list of quiz links. On construction a JSON copy is
//! written to the store so the statistics page keeps a degraded lookup path
//! when the primary source is unavailable.

use crate::database::store::KeyValueStore;
use crate::types::catalog::QuizEntry;

/// Store key holding the cached catalog copy.
pub const QUIZ_LIST_KEY: &str = "quizListData";

/// Read-only quiz catalog.
pub struct QuizCatalog {
    quizzes: Vec<QuizEntry>,
}

impl QuizCatalog {
    /// Creates a catalog from the given entries and caches a JSON copy in
    /// the store. A failed cache write is logged and otherwise ignored.
    pub fn new(store: &dyn KeyValueStore, quizzes: Vec<QuizEntry>) -> Self {
        match serde_json::to_string(&quizzes) {
            Ok(json) => {
                if let Err(e) = store.set(QUIZ_LIST_KEY, &json) {
                    log::warn!("failed to cache quiz list: {}", e);
                }
            }
            Err(e) => log::warn!("failed to serialize quiz list: {}", e),
        }
        Self { quizzes }
    }

    /// Creates a catalog with the built-in quiz list.
    pub fn with_defaults(store: &dyn KeyValueStore) -> Self {
        Self::new(store, default_quizzes())
    }

    /// All entries, in catalog order.
    pub fn all(&self) -> &[QuizEntry] {
        &self.quizzes
    }

    pub fn get_by_id(&self, id: &str) -> Option<&QuizEntry> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    pub fn get_by_url(&self, url: &str) -> Option<&QuizEntry> {
        self.quizzes.iter().find(|q| q.url == url)
    }

    /// Degraded lookup path: reads the cached catalog copy back out of the
    /// store. Returns an empty list when the copy is missing or unreadable.
    pub fn load_cached(store: &dyn KeyValueStore) -> Vec<QuizEntry> {
        match store.get(QUIZ_LIST_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("corrupt cached quiz list: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to read cached quiz list: {}", e);
                Vec::new()
            }
        }
    }
}

/// The built-in quiz list.
pub fn default_quizzes() -> Vec<QuizEntry> {
    vec![
        QuizEntry {
            id: "quiz1".to_string(),
            url: "https://quizizz.com/join?gc=05773812".to_string(),
            title: "Week 2".to_string(),
            description: "One word at a time, one step closer to fluency.".to_string(),
            tags: Vec::new(),
        },
        QuizEntry {
            id: "quiz2".to_string(),
            url: "https://quizizz.com/join?gc=12408833".to_string(),
            title: "Week 3".to_string(),
            description: "Phrasal verbs and collocations from this week's readings.".to_string(),
            tags: vec!["vocabulary".to_string(), "phrasal-verbs".to_string()],
        },
    ]
}
