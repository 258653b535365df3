/// A response body with the metadata the offline cache needs to replay it.
///
/// Produced either by the network fetch layer or read back out of the
/// `asset_cache` table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Terminal outcome of one intercepted request.
///
/// Every handled GET request ends in exactly one of the three served
/// variants; nothing propagates an error to the caller. Non-GET requests
/// and excluded schemes are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The network answered; the response was returned (and cached if 200).
    NetworkServed(AssetResponse),
    /// The network failed; a previously cached copy was served.
    CacheServed(AssetResponse),
    /// The network failed and nothing was cached; the offline document was served.
    OfflineFallback(AssetResponse),
    /// The request is not ours to answer.
    Passthrough,
}
