//! Cache Engine
//!
//! The caller-owned cache context: the page store, the protocol version
//! token, and the prefetch coordinator that fills the store in the
//! background.
//!
//! Prefetching is best effort. Every failure degrades to a cache miss and is
//! only logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{
    CacheEntry, CacheSnapshot, CacheStats, Clock, PageCacheStore, PagePayload, SubscriptionId,
    SystemClock,
};
use crate::config::Config;
use crate::error::{PrefetchError, PrefetchResult};
use crate::prefetch::transport::{PageRequest, PageResponse, PageTransport};
use crate::prefetch::url::{cache_key, fetch_url, fragment, strip_hash, to_absolute_url};
use crate::prefetch::{PrefetchOptions, PrefetchTarget};

/// How a single prefetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchOutcome {
    /// The page was fetched and stored
    Resolved,
    /// A fresh resolved entry already existed
    AlreadyCached,
    /// Another prefetch for the same key is still pending
    InFlight,
    /// Caching is disabled or the key is ignored
    Refused,
    /// The version token never showed up within the retry budget
    Abandoned,
}

#[derive(Debug, Clone, Copy)]
struct PrefetchSettings {
    default_duration_minutes: f64,
    placeholder_duration_minutes: f64,
    retry_delay: Duration,
    max_retries: u32,
}

// == Cache Engine ==
/// Shared handle to one application's page cache.
///
/// Cloning is cheap; every clone sees the same store and version token.
#[derive(Clone)]
pub struct CacheEngine {
    store: Arc<RwLock<PageCacheStore>>,
    version: Arc<RwLock<Option<String>>>,
    transport: Arc<dyn PageTransport>,
    origin: Arc<Url>,
    settings: PrefetchSettings,
}

impl fmt::Debug for CacheEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEngine")
            .field("origin", &self.origin.as_str())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CacheEngine {
    // == Constructors ==
    /// Creates an engine on the system clock.
    pub fn new(config: &Config, transport: Arc<dyn PageTransport>) -> PrefetchResult<Self> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    /// Creates an engine reading time from `clock`.
    pub fn with_clock(
        config: &Config,
        transport: Arc<dyn PageTransport>,
        clock: Arc<dyn Clock>,
    ) -> PrefetchResult<Self> {
        let origin = Url::parse(&config.origin)?;
        let mut store = PageCacheStore::with_clock(config.size_limit, clock);
        store.set_enabled(config.enabled);

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            version: Arc::new(RwLock::new(None)),
            transport,
            origin: Arc::new(origin),
            settings: PrefetchSettings {
                default_duration_minutes: config.default_duration_minutes,
                placeholder_duration_minutes: config.placeholder_duration_minutes,
                retry_delay: config.retry_delay(),
                max_retries: config.max_retries,
            },
        })
    }

    /// Origin relative targets are resolved against.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Options used when a caller gives none.
    pub fn default_options(&self) -> PrefetchOptions {
        PrefetchOptions::default().with_duration(self.settings.default_duration_minutes)
    }

    // == Store Operations ==
    pub async fn set(&self, key: impl Into<String>, entry: CacheEntry) -> bool {
        self.store.write().await.set(key, entry)
    }

    pub async fn set_with_expiration(
        &self,
        key: impl Into<String>,
        entry: CacheEntry,
        minutes: f64,
    ) -> bool {
        self.store
            .write()
            .await
            .set_with_expiration(key, entry, minutes)
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.store.write().await.get(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    pub async fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.store.write().await.remove(key)
    }

    pub async fn remove_all(&self) {
        self.store.write().await.remove_all();
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn all(&self) -> CacheSnapshot {
        self.store.read().await.all()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Instant `minutes` from now on the engine's clock.
    pub async fn get_timestamp(&self, minutes: f64) -> chrono::DateTime<chrono::Utc> {
        self.store.read().await.get_timestamp(minutes)
    }

    /// Current instant on the store's clock.
    pub async fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.store.read().await.now()
    }

    // == Policy ==
    pub async fn ignore<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.write().await.ignore(urls);
    }

    pub async fn accept<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.write().await.accept(urls)
    }

    pub async fn ignored(&self) -> Vec<String> {
        self.store.read().await.policy().ignored().to_vec()
    }

    pub async fn set_enabled(&self, on: bool) {
        self.store.write().await.set_enabled(on);
    }

    pub async fn is_enabled(&self) -> bool {
        self.store.read().await.is_enabled()
    }

    // == Version Token ==
    pub async fn version(&self) -> Option<String> {
        self.version.read().await.clone()
    }

    /// Sets or clears the protocol version token sent with every prefetch.
    pub async fn set_version(&self, version: Option<String>) {
        *self.version.write().await = version;
    }

    // == Subscriptions ==
    /// Registers a change listener; see [`PageCacheStore::subscribe`].
    pub async fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CacheSnapshot) + Send + Sync + 'static,
    {
        self.store.write().await.subscribe(listener)
    }

    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.write().await.unsubscribe(id)
    }

    // == Prefetch ==
    /// Fetches `target` into the cache in the background of a navigation.
    ///
    /// Never fails: errors are logged and leave at most a pending placeholder
    /// that expires on its own.
    pub async fn prefetch(&self, target: &str, options: PrefetchOptions) {
        match self.try_prefetch(target, options).await {
            Ok(outcome) => debug!(href = %target, ?outcome, "prefetch finished"),
            Err(err) => warn!(href = %target, error = %err, "prefetch failed"),
        }
    }

    /// Prefetches every target concurrently and waits for all of them.
    ///
    /// Each prefetch is isolated; one failing or panicking does not affect
    /// the others.
    pub async fn prefetch_all<I, T>(&self, targets: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<PrefetchTarget>,
    {
        let mut tasks = JoinSet::new();
        for target in targets {
            let target = target.into();
            let engine = self.clone();
            tasks.spawn(async move { engine.prefetch(&target.href, target.options).await });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "prefetch task aborted");
            }
        }
    }

    /// Starts a prefetch on the runtime without waiting for it.
    pub fn spawn_prefetch(
        &self,
        target: impl Into<String>,
        options: PrefetchOptions,
    ) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        let target = target.into();
        tokio::spawn(async move { engine.prefetch(&target, options).await })
    }

    async fn try_prefetch(
        &self,
        target: &str,
        options: PrefetchOptions,
    ) -> PrefetchResult<PrefetchOutcome> {
        let requested = to_absolute_url(&self.origin, target)?;
        let key = cache_key(&requested);

        let version = match self.claim(&key).await {
            Claim::Claimed(version) => version,
            Claim::Done(outcome) => return Ok(outcome),
        };

        let request = PageRequest::prefetch(fetch_url(&requested, options.is_static)?, &version)?;
        let response = self.transport.fetch(request).await?;
        let page = reconcile(&requested, response)?;

        let mut store = self.store.write().await;
        let expires_at = store.get_timestamp(options.duration_in_minutes);
        store.set(key.clone(), CacheEntry::new(page, expires_at));
        info!(key = %key, "prefetched page");

        Ok(PrefetchOutcome::Resolved)
    }

    /// Installs the pending placeholder for `key`, waiting for the version
    /// token if needed.
    ///
    /// The freshness check and the placeholder write happen under one store
    /// lock, so concurrent prefetches of one key fetch at most once.
    async fn claim(&self, key: &str) -> Claim {
        let mut retries = 0;
        loop {
            // Lock order: version token first, never while holding the store.
            let version = self.version.read().await.clone();
            {
                let mut store = self.store.write().await;
                if !store.should_cache(key) {
                    return Claim::Done(PrefetchOutcome::Refused);
                }

                if let Some(existing) = store.get(key) {
                    if !existing.pending {
                        return Claim::Done(PrefetchOutcome::AlreadyCached);
                    }
                    if !existing.is_expired(store.now()) {
                        return Claim::Done(PrefetchOutcome::InFlight);
                    }
                }

                if let Some(version) = version {
                    let expires_at = store.get_timestamp(self.settings.placeholder_duration_minutes);
                    store.set(key, CacheEntry::placeholder(expires_at));
                    return Claim::Claimed(version);
                }
            }

            if retries >= self.settings.max_retries {
                warn!(key = %key, retries, "version token still unknown, abandoning prefetch");
                return Claim::Done(PrefetchOutcome::Abandoned);
            }
            retries += 1;
            debug!(key = %key, retries, "version token unknown, deferring prefetch");
            tokio::time::sleep(self.settings.retry_delay).await;
        }
    }

    #[cfg(test)]
    async fn prefetch_outcome(
        &self,
        target: &str,
        options: PrefetchOptions,
    ) -> PrefetchResult<PrefetchOutcome> {
        self.try_prefetch(target, options).await
    }
}

enum Claim {
    Claimed(String),
    Done(PrefetchOutcome),
}

// == Reconcile ==
/// Validates a prefetch response and fixes up its URL.
///
/// A response must carry the protocol marker or be a static page. Static
/// pages are stored under the requested URL. Otherwise, when the request had
/// a fragment the server did not echo, and the server's URL equals the
/// request minus that fragment, the fragment is re-attached.
fn reconcile(requested: &Url, response: PageResponse) -> PrefetchResult<PagePayload> {
    let PageResponse {
        protocol_marker,
        mut page,
    } = response;
    let is_static = page.is_static();

    if !protocol_marker && !is_static {
        return Err(PrefetchError::NotPageResponse(requested.to_string()));
    }

    if is_static {
        page.url = requested.to_string();
        return Ok(page);
    }

    if let Some(hash) = fragment(requested) {
        let response_url = requested.join(&page.url)?;
        if response_url.fragment().is_none() && strip_hash(requested) == response_url {
            page.url = format!("{}#{}", page.url, hash);
        }
    }

    Ok(page)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Transport answering from a path → response table, recording requests.
    #[derive(Default)]
    struct ScriptedTransport {
        pages: Mutex<HashMap<String, PageResponse>>,
        requests: Mutex<Vec<PageRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransport {
        fn page(self, path: &str, marker: bool, page: PagePayload) -> Self {
            self.pages.lock().unwrap().insert(
                path.to_string(),
                PageResponse {
                    protocol_marker: marker,
                    page,
                },
            );
            self
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> PageRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl PageTransport for ScriptedTransport {
        async fn fetch(&self, request: PageRequest) -> PrefetchResult<PageResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let path = request.url[url::Position::BeforePath..].to_string();
            self.pages
                .lock()
                .unwrap()
                .get(&path)
                .cloned()
                .ok_or_else(|| PrefetchError::Transport(format!("no route for {}", path)))
        }
    }

    fn test_config() -> Config {
        Config {
            origin: "https://app.test".to_string(),
            retry_delay_ms: 5,
            max_retries: 3,
            ..Config::default()
        }
    }

    fn engine_with(transport: Arc<ScriptedTransport>, clock: &ManualClock) -> CacheEngine {
        CacheEngine::with_clock(&test_config(), transport, Arc::new(clock.clone())).unwrap()
    }

    async fn versioned(transport: Arc<ScriptedTransport>, clock: &ManualClock) -> CacheEngine {
        let engine = engine_with(transport, clock);
        engine.set_version(Some("v1".to_string())).await;
        engine
    }

    #[tokio::test]
    async fn test_prefetch_resolves_entry() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        let outcome = engine
            .prefetch_outcome("/users", PrefetchOptions::default().with_duration(5.0))
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Resolved);
        let entry = engine.all().await.remove("/users").unwrap();
        assert!(!entry.pending);
        assert_eq!(entry.page_response.component, "Users");
        assert_eq!(entry.expires_at.timestamp_millis(), 5 * 60_000);
    }

    #[tokio::test]
    async fn test_prefetch_sends_version_and_strips_hash() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/article", true, PagePayload::new("Article", "/article")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        engine
            .prefetch("/article#section", PrefetchOptions::default())
            .await;

        let request = transport.last_request();
        assert_eq!(request.url.as_str(), "https://app.test/article");
        assert_eq!(request.headers["x-inertia-version"], "v1");
    }

    #[tokio::test]
    async fn test_fragment_is_reattached() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/article", true, PagePayload::new("Article", "/article")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        engine
            .prefetch("/article#section", PrefetchOptions::default())
            .await;

        let entry = engine.get("/article#section").await.unwrap();
        assert_eq!(entry.page_response.url, "/article#section");
    }

    #[tokio::test]
    async fn test_redirected_url_keeps_server_url() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/old", true, PagePayload::new("New", "/new")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        engine.prefetch("/old#top", PrefetchOptions::default()).await;

        let entry = engine.get("/old#top").await.unwrap();
        assert_eq!(entry.page_response.url, "/new");
    }

    #[tokio::test]
    async fn test_static_prefetch_uses_suffix_and_requested_url() {
        let page = PagePayload::new("Pricing", "/pricing__static__").with_props(json!({"static": true}));
        let transport = Arc::new(ScriptedTransport::default().page("/pricing__static__", false, page));
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        let outcome = engine
            .prefetch_outcome("/pricing#plans", PrefetchOptions::default().static_variant())
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Resolved);
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://app.test/pricing__static__"
        );
        let entry = engine.get("/pricing#plans").await.unwrap();
        assert_eq!(entry.page_response.url, "https://app.test/pricing#plans");
    }

    #[tokio::test]
    async fn test_response_without_marker_leaves_placeholder() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/plain", false, PagePayload::new("Plain", "/plain")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        let result = engine
            .prefetch_outcome("/plain", PrefetchOptions::default())
            .await;

        assert!(matches!(result, Err(PrefetchError::NotPageResponse(_))));
        let entry = engine.all().await.remove("/plain").unwrap();
        assert!(entry.pending);
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let transport = Arc::new(ScriptedTransport::default());
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        engine.prefetch("/missing", PrefetchOptions::default()).await;

        assert_eq!(transport.calls(), 1);
        assert!(engine.all().await["/missing"].pending);
    }

    #[tokio::test]
    async fn test_huge_duration_resolves_with_saturated_expiry() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        let outcome = engine
            .prefetch_outcome("/users", PrefetchOptions::default().with_duration(1e12))
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Resolved);
        let entry = engine.get("/users").await.unwrap();
        assert!(!entry.pending);
        assert_eq!(entry.expires_at, chrono::DateTime::<chrono::Utc>::MAX_UTC);
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_fetch() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        engine.prefetch("/users", PrefetchOptions::default()).await;
        let outcome = engine
            .prefetch_outcome("/users", PrefetchOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::AlreadyCached);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        engine.prefetch("/users", PrefetchOptions::default()).await;
        clock.advance(ChronoDuration::minutes(2));
        engine.prefetch("/users", PrefetchOptions::default()).await;

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_prefetch_fetches_once() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(
            ScriptedTransport::default()
                .page("/users", true, PagePayload::new("Users", "/users"))
                .gated(gate.clone()),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        let first = engine.spawn_prefetch("/users", PrefetchOptions::default());
        while transport.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let second = engine
            .prefetch_outcome("/users", PrefetchOptions::default())
            .await
            .unwrap();
        assert_eq!(second, PrefetchOutcome::InFlight);

        gate.notify_one();
        first.await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(!engine.all().await["/users"].pending);
    }

    #[tokio::test]
    async fn test_stale_placeholder_does_not_block() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        let placeholder = CacheEntry::placeholder(engine.get_timestamp(1.0).await);
        engine.set("/users", placeholder).await;
        clock.advance(ChronoDuration::minutes(2));

        let outcome = engine
            .prefetch_outcome("/users", PrefetchOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Resolved);
    }

    #[tokio::test]
    async fn test_missing_version_abandons_after_retries() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/form", true, PagePayload::new("Form", "/form")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = engine_with(transport.clone(), &clock);

        let pending = engine.spawn_prefetch("/form", PrefetchOptions::default());
        assert!(!engine.has("/form").await);

        pending.await.unwrap();

        assert!(!engine.has("/form").await);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_version_outcome() {
        let transport = Arc::new(ScriptedTransport::default());
        let clock = ManualClock::at_millis(0);
        let engine = engine_with(transport, &clock);

        let outcome = engine
            .prefetch_outcome("/form", PrefetchOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Abandoned);
    }

    #[tokio::test]
    async fn test_version_arriving_during_retry_resumes() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/form", true, PagePayload::new("Form", "/form")),
        );
        let clock = ManualClock::at_millis(0);
        let config = Config {
            retry_delay_ms: 50,
            ..test_config()
        };
        let engine =
            CacheEngine::with_clock(&config, transport.clone(), Arc::new(clock.clone())).unwrap();

        let pending = engine.spawn_prefetch("/form", PrefetchOptions::default());
        tokio::time::sleep(Duration::from_millis(20)).await;
        engine.set_version(Some("v2".to_string())).await;
        pending.await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.last_request().headers["x-inertia-version"], "v2");
        assert!(engine.get("/form").await.is_some());
    }

    #[tokio::test]
    async fn test_ignored_target_is_refused() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/secret", true, PagePayload::new("Secret", "/secret")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;
        engine.ignore(["/secret"]).await;

        let outcome = engine
            .prefetch_outcome("/secret", PrefetchOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome, PrefetchOutcome::Refused);
        assert_eq!(transport.calls(), 0);
        assert!(!engine.has("/secret").await);
    }

    #[tokio::test]
    async fn test_disabled_engine_is_refused() {
        let transport = Arc::new(ScriptedTransport::default());
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;
        engine.set_enabled(false).await;

        engine.prefetch("/users", PrefetchOptions::default()).await;

        assert_eq!(transport.calls(), 0);
        assert!(engine.is_empty().await);
    }

    #[tokio::test]
    async fn test_prefetch_all_isolates_failures() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .page("/a", true, PagePayload::new("A", "/a"))
                .page("/c", true, PagePayload::new("C", "/c")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport.clone(), &clock).await;

        engine.prefetch_all(["/a", "/b", "/c"]).await;

        let snapshot = engine.all().await;
        assert!(!snapshot["/a"].pending);
        assert!(snapshot["/b"].pending);
        assert!(!snapshot["/c"].pending);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_target_is_swallowed() {
        let transport = Arc::new(ScriptedTransport::default());
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        engine.prefetch("http://[::1", PrefetchOptions::default()).await;

        assert!(engine.is_empty().await);
    }

    #[tokio::test]
    async fn test_subscribers_see_placeholder_then_resolution() {
        let transport = Arc::new(
            ScriptedTransport::default().page("/users", true, PagePayload::new("Users", "/users")),
        );
        let clock = ManualClock::at_millis(0);
        let engine = versioned(transport, &clock).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        engine
            .subscribe(move |snapshot| {
                let pending = snapshot.get("/users").map(|entry| entry.pending);
                sink.lock().unwrap().push(pending);
            })
            .await;

        engine.prefetch("/users", PrefetchOptions::default()).await;

        assert_eq!(*seen.lock().unwrap(), vec![Some(true), Some(false)]);
    }

    #[test]
    fn test_reconcile_keeps_server_fragment() {
        let requested = Url::parse("https://app.test/article#a").unwrap();
        let response = PageResponse {
            protocol_marker: true,
            page: PagePayload::new("Article", "/article#b"),
        };

        let page = reconcile(&requested, response).unwrap();
        assert_eq!(page.url, "/article#b");
    }

    #[test]
    fn test_reconcile_absolute_server_url() {
        let requested = Url::parse("https://app.test/article#a").unwrap();
        let response = PageResponse {
            protocol_marker: true,
            page: PagePayload::new("Article", "https://app.test/article"),
        };

        let page = reconcile(&requested, response).unwrap();
        assert_eq!(page.url, "https://app.test/article#a");
    }
}
