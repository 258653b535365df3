use serde::{Deserialize, Serialize};

/// One entry of the quiz catalog: a link plus its display metadata.
///
/// The catalog is read-only to the core; it is only consulted to resolve
/// titles and to render cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
