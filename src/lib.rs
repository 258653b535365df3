//! QuizDeck — offline-capable quiz link tracker core.
//!
//! Tracks which quiz links a user has opened, keeps a ledger of visits with
//! durations and repeat-open merging, derives a grouped statistics view, and
//! maintains a generation-based offline asset cache. This library crate
//! exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
