use std::fmt;

// === StoreError ===

/// Errors from the persistent key-value store.
///
/// Consumers of the store (ledger, tracker, catalog) log these and fall
/// back to empty defaults; they are never surfaced from a tracking
/// operation.
#[derive(Debug)]
pub enum StoreError {
    /// Reading a key failed.
    ReadError(String),
    /// Writing or removing a key failed (e.g. quota / disk error).
    WriteError(String),
    /// A stored value could not be decoded.
    Corrupted(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ReadError(msg) => write!(f, "Store read error: {}", msg),
            StoreError::WriteError(msg) => write!(f, "Store write error: {}", msg),
            StoreError::Corrupted(msg) => write!(f, "Store value corrupted: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === FetchError ===

/// Errors from the network fetch layer of the offline cache.
#[derive(Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, or transfer failure).
    Network(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

// === CacheError ===

/// Errors from the offline cache controller.
#[derive(Debug)]
pub enum CacheError {
    /// Precaching a manifest asset failed; the whole install is rejected.
    PrecacheFailed(String),
    /// A cache table operation failed.
    DatabaseError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::PrecacheFailed(msg) => write!(f, "Precache failed: {}", msg),
            CacheError::DatabaseError(msg) => write!(f, "Cache database error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}
