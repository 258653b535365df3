//! Offline cache controller for QuizDeck.
//!
//! A request-scoped state machine over one named cache generation. Install
//! precaches the static asset manifest (all-or-nothing), activate evicts
//! every superseded generation, and fetch handling runs network-first with
//! cache fallback and a final offline document. No handled request ever
//! errors out to the caller.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::connection::Database;
use crate::database::store::KeyValueStore;
use crate::managers::visit_ledger;
use crate::types::cache::{AssetResponse, FetchOutcome};
use crate::types::errors::{CacheError, FetchError};

/// Path of the offline fallback document inside the manifest.
pub const OFFLINE_FALLBACK_URL: &str = "/offline.html";

/// URL schemes the controller never answers for.
const EXCLUDED_SCHEMES: &[&str] = &["chrome-extension:"];

/// Served when both the network and the cache (including the precached
/// fallback document) come up empty.
const OFFLINE_FALLBACK_BODY: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Offline</title></head>\n<body><h1>You are offline</h1><p>QuizDeck could not reach the network and has no cached copy of this page.</p></body>\n</html>\n";

/// Network fetch abstraction. Production uses [`HttpFetcher`]; tests inject
/// stubs that answer from canned responses.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<AssetResponse, FetchError>;
}

/// Fetcher backed by a blocking `reqwest` client.
///
/// No timeout is applied: a hanging request is indistinguishable from a
/// genuinely slow network, matching the documented limitation.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<AssetResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();
        Ok(AssetResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

/// Controller over the `asset_cache` table, scoped to one generation.
pub struct OfflineCacheController {
    db: Arc<Database>,
    generation: String,
    manifest: Vec<String>,
    fetcher: Box<dyn AssetFetcher>,
}

impl OfflineCacheController {
    pub fn new(
        db: Arc<Database>,
        generation: impl Into<String>,
        manifest: Vec<String>,
        fetcher: Box<dyn AssetFetcher>,
    ) -> Self {
        Self {
            db,
            generation: generation.into(),
            manifest,
            fetcher,
        }
    }

    /// The generation name tied to this build of the static assets.
    pub fn default_generation() -> String {
        format!("quizdeck-v{}", env!("CARGO_PKG_VERSION"))
    }

    /// The fixed manifest of paths precached on install. Must be revisited
    /// whenever the generation identifier changes.
    pub fn default_manifest() -> Vec<String> {
        [
            "/",
            "/index.html",
            "/statistics.html",
            OFFLINE_FALLBACK_URL,
            "/manifest.json",
            "/css/styles.css",
            "/js/app.js",
            "/img/icons/icon-192x192.png",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    /// Install step: precaches every manifest asset into the current
    /// generation. All-or-nothing — every asset is fetched first, and only a
    /// complete set is written (in one transaction). Any fetch error or
    /// non-200 response rejects the install with `PrecacheFailed`; the
    /// caller retries per its own activation policy.
    ///
    /// Returns the number of assets cached.
    pub fn install(&self) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let response = self
                .fetcher
                .fetch(url)
                .map_err(|e| CacheError::PrecacheFailed(format!("{}: {}", url, e)))?;
            if response.status != 200 {
                return Err(CacheError::PrecacheFailed(format!(
                    "{}: status {}",
                    url, response.status
                )));
            }
            fetched.push(response);
        }

        let conn = self.db.connection();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        let now = now_ms();
        for response in &fetched {
            tx.execute(
                "INSERT INTO asset_cache (generation, url, status, content_type, body, fetched_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT(generation, url) DO UPDATE SET \
                 status = excluded.status, content_type = excluded.content_type, \
                 body = excluded.body, fetched_at = excluded.fetched_at",
                params![
                    self.generation,
                    response.url,
                    response.status,
                    response.content_type,
                    response.body,
                    now
                ],
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        log::info!(
            "precached {} assets into generation {}",
            fetched.len(),
            self.generation
        );
        Ok(fetched.len())
    }

    /// Activate step: deletes every cache generation other than the current
    /// one. This is the only mechanism that reclaims space from superseded
    /// versions. Returns the pruned generation names.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT generation FROM asset_cache WHERE generation != ?1 \
                 ORDER BY generation",
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        let stale: Vec<String> = stmt
            .query_map(params![self.generation], |row| row.get(0))
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        for generation in &stale {
            conn.execute(
                "DELETE FROM asset_cache WHERE generation = ?1",
                params![generation],
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
            log::info!("evicted stale cache generation {}", generation);
        }
        Ok(stale)
    }

    /// Handles one intercepted request.
    ///
    /// Non-GET methods and excluded schemes pass through untouched. A GET is
    /// answered network-first: a 200 response is cached into the current
    /// generation and returned; on network failure the newest cached copy
    /// (any generation) is served; failing that, the offline fallback
    /// document.
    pub fn handle_request(&self, method: &str, url: &str) -> FetchOutcome {
        if !method.eq_ignore_ascii_case("GET") || is_excluded(url) {
            return FetchOutcome::Passthrough;
        }

        match self.fetcher.fetch(url) {
            Ok(response) => {
                if response.status == 200 {
                    // A failed cache write must not cost the caller the
                    // response it already has.
                    if let Err(e) = self.cache_put(&response) {
                        log::warn!("failed to cache {}: {}", url, e);
                    }
                }
                FetchOutcome::NetworkServed(response)
            }
            Err(e) => {
                log::debug!("network fetch failed for {}: {}", url, e);
                match self.cache_match(url) {
                    Ok(Some(cached)) => FetchOutcome::CacheServed(cached),
                    Ok(None) => FetchOutcome::OfflineFallback(self.offline_fallback()),
                    Err(e) => {
                        log::error!("cache lookup failed for {}: {}", url, e);
                        FetchOutcome::OfflineFallback(self.offline_fallback())
                    }
                }
            }
        }
    }

    /// Stores a response into the current generation, keyed by URL.
    fn cache_put(&self, response: &AssetResponse) -> Result<(), CacheError> {
        self.db
            .connection()
            .execute(
                "INSERT INTO asset_cache (generation, url, status, content_type, body, fetched_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
                 ON CONFLICT(generation, url) DO UPDATE SET \
                 status = excluded.status, content_type = excluded.content_type, \
                 body = excluded.body, fetched_at = excluded.fetched_at",
                params![
                    self.generation,
                    response.url,
                    response.status,
                    response.content_type,
                    response.body,
                    now_ms()
                ],
            )
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Looks up the newest cached copy of `url` across all generations.
    fn cache_match(&self, url: &str) -> Result<Option<AssetResponse>, CacheError> {
        self.db
            .connection()
            .query_row(
                "SELECT status, content_type, body FROM asset_cache WHERE url = ?1 \
                 ORDER BY fetched_at DESC LIMIT 1",
                params![url],
                |row| {
                    Ok(AssetResponse {
                        url: url.to_string(),
                        status: row.get(0)?,
                        content_type: row.get(1)?,
                        body: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))
    }

    /// The offline fallback document: the precached copy when available,
    /// otherwise a built-in minimal page.
    fn offline_fallback(&self) -> AssetResponse {
        match self.cache_match(OFFLINE_FALLBACK_URL) {
            Ok(Some(cached)) => cached,
            _ => AssetResponse {
                url: OFFLINE_FALLBACK_URL.to_string(),
                status: 200,
                content_type: Some("text/html".to_string()),
                body: OFFLINE_FALLBACK_BODY.as_bytes().to_vec(),
            },
        }
    }

    /// Background-sync stub: no reconciliation protocol exists; logs whether
    /// there are statistics to sync.
    pub fn sync_statistics(&self, store: &dyn KeyValueStore) {
        match store.get(visit_ledger::STORAGE_KEY) {
            Ok(Some(_)) => log::info!("background sync: statistics present, nothing to push"),
            Ok(None) => log::info!("background sync: no statistics recorded"),
            Err(e) => log::warn!("background sync: failed to read statistics: {}", e),
        }
    }

    /// Push-notification stub: logs the notification text.
    pub fn handle_push(&self, payload: Option<&str>) {
        let body = payload.unwrap_or("Time to learn some new words!");
        log::info!("push notification: {}", body);
    }
}

fn is_excluded(url: &str) -> bool {
    EXCLUDED_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Returns the current UNIX timestamp in milliseconds.
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
