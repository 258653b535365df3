// QuizDeck core data types
// Plain serde structs for visits, the quiz catalog, cached assets, and the error enums.

pub mod cache;
pub mod catalog;
pub mod errors;
pub mod visit;
