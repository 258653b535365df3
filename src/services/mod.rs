// QuizDeck services
// Stateless and derived functionality: the statistics projection, the quiz
// catalog, and the offline asset cache.

pub mod offline_cache;
pub mod quiz_catalog;
pub mod statistics_aggregator;
