// QuizDeck state managers
// Managers handle stateful operations: the visit ledger and the visited-flag set.

pub mod visit_ledger;
pub mod visited_tracker;
