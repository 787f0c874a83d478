//! Application state shared across all request handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use signpost_store::ContentStore;

use crate::config::Config;
use crate::record::ViewRecorder;

/// A cached rendered document. The page id rides along so a cache hit can
/// still record its view.
#[derive(Clone, Debug)]
pub struct CachedPage {
    /// Rendered HTML string.
    pub html: String,
    /// The page the document was rendered from.
    pub page_id: Uuid,
}

/// Type alias for the rendered-document cache, keyed by project key + path.
pub type PageCache = Cache<String, CachedPage>;

/// Cache capacity (number of entries). Entries are typically a few KB of
/// HTML each.
const CACHE_CAPACITY: u64 = 10_000;

/// Cache TTL, aligned with the browser `max-age` so a stale document never
/// outlives what edge caches already hold.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Timeout for outbound setup-verification fetches.
const VERIFY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Content store handle; the only shared mutable resource.
    pub store: Arc<dyn ContentStore>,

    /// Application configuration.
    pub config: Arc<Config>,

    /// In-memory cache of rendered page documents.
    pub cache: PageCache,

    /// Fire-and-forget page-view recorder.
    pub recorder: ViewRecorder,

    /// Outbound HTTP client for setup verification.
    pub http: reqwest::Client,
}

impl AppState {
    /// Create a new application state from configuration and a store handle.
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        let http = reqwest::Client::builder()
            .timeout(VERIFY_FETCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        let recorder = ViewRecorder::new(Arc::clone(&store));

        tracing::info!(
            cache_capacity = CACHE_CAPACITY,
            cache_ttl_secs = CACHE_TTL.as_secs(),
            "application state initialized"
        );

        Self {
            store,
            config: Arc::new(config),
            cache,
            recorder,
            http,
        }
    }
}
