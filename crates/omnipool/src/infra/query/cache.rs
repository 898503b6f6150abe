//! Block driven cache for chain queries.
//!
//! Entries become stale a configured number of blocks after they were
//! fetched. Reading a missing or stale entry schedules a fetch instead of
//! waiting for it, so readers always get an answer right away:
//! - The mutex is never locked while waiting on a fetch.
//! - At most one fetch per entry is scheduled at a time. Readers of an entry
//!   that is being fetched see it as loading (or stale) until the fetch
//!   completes.
//!
//! A background task refetches recently requested entries on every new block
//! and evicts the ones nobody asked for in a while.

use {
    super::Query,
    crate::infra::blocks::{self, CurrentBlockWatcher},
    anyhow::Result,
    futures::StreamExt,
    itertools::Itertools,
    observe::future::Measure,
    prometheus::IntCounterVec,
    std::{
        collections::HashMap,
        fmt::Debug,
        hash::Hash,
        sync::{Arc, Mutex},
        time::Duration,
    },
    tokio::sync::Notify,
    tracing::Instrument,
};

/// Source of the values of a [`QueryCache`].
#[async_trait::async_trait]
pub trait Fetching<K, V>: Send + Sync + 'static {
    async fn fetch(&self, key: K) -> Result<V>;
}

#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    /// A value fetched at block `b` is stale once the current block is past
    /// `b + stale_after_blocks`.
    pub stale_after_blocks: u64,
    /// Entries not requested for this many blocks are evicted.
    pub eviction_blocks: u64,
    /// How often a failed fetch is retried before giving up until the next
    /// block.
    pub max_retries: u32,
    pub delay_between_retries: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after_blocks: 1,
            eviction_blocks: 5,
            max_retries: 2,
            delay_between_retries: Duration::from_millis(500),
        }
    }
}

pub struct QueryCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<K, V> {
    mutexed: Mutex<Mutexed<K, V>>,
    /// Notified whenever a fetch completes.
    updated: Notify,
    fetcher: Arc<dyn Fetching<K, V>>,
    blocks: CurrentBlockWatcher,
    config: CacheConfig,
    metrics: &'static Metrics,
    label: &'static str,
}

struct Mutexed<K, V> {
    entries: HashMap<K, Entry<V>>,
    last_version: u64,
}

struct Entry<V> {
    value: Option<V>,
    version: u64,
    /// Block at which the current value was fetched.
    fetched_at: Option<u64>,
    /// Block at which the last fetch failed, if it did.
    failed_at: Option<u64>,
    requested_at: u64,
    in_flight: bool,
    invalidated: bool,
}

#[derive(prometheus_metric_storage::MetricStorage)]
struct Metrics {
    /// Cache accesses that found a value.
    #[metric(labels("cache_type"))]
    query_cache_hits: IntCounterVec,

    /// Cache accesses that found no value.
    #[metric(labels("cache_type"))]
    query_cache_misses: IntCounterVec,

    /// Fetches that failed after exhausting all retries.
    #[metric(labels("cache_type"))]
    query_cache_fetch_failures: IntCounterVec,
}

enum Access {
    Ready,
    Start,
    Wait,
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Debug + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        config: CacheConfig,
        fetcher: Arc<dyn Fetching<K, V>>,
        blocks: CurrentBlockWatcher,
        label: &'static str,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                mutexed: Mutex::new(Mutexed {
                    entries: HashMap::new(),
                    last_version: 0,
                }),
                updated: Notify::new(),
                fetcher,
                blocks,
                config,
                metrics: Metrics::instance(observe::metrics::get_storage_registry()).unwrap(),
                label,
            }),
        }
    }

    /// Returns the cached snapshot of `key` without waiting. Schedules a fetch
    /// on the tokio runtime if the entry is missing or stale, so this has to
    /// be called from within a runtime.
    pub fn get(&self, key: K) -> Query<V> {
        let (query, access) = self.inner.access(&key, true);
        if let Access::Start = access {
            self.spawn_refresh(key);
        }
        query
    }

    /// Like [`QueryCache::get`] but waits for a missing or stale entry to be
    /// fetched.
    pub async fn fetch(&self, key: K) -> Query<V> {
        let mut record = true;
        loop {
            let updated = self.inner.updated.notified();
            let (query, access) = self.inner.access(&key, record);
            record = false;
            match access {
                Access::Ready => return query,
                // The claimed fetch runs detached so that dropping this future
                // does not leave the entry in flight forever.
                Access::Start => {
                    self.spawn_refresh(key.clone());
                    updated.await;
                }
                Access::Wait => updated.await,
            }
        }
    }

    fn spawn_refresh(&self, key: K) {
        let inner = self.inner.clone();
        tokio::spawn(
            inner
                .refresh(key)
                .instrument(tracing::debug_span!("query_fetch", label = self.inner.label)),
        );
    }

    /// Marks the entry stale so that the next access refetches it.
    pub fn invalidate(&self, key: &K) {
        let mut mutexed = self.inner.mutexed.lock().unwrap();
        if let Some(entry) = mutexed.entries.get_mut(key) {
            tracing::debug!(label = self.inner.label, ?key, "invalidated");
            entry.invalidated = true;
            entry.failed_at = None;
        }
    }

    /// Refetches recently requested entries whenever a new block arrives and
    /// evicts the others.
    pub fn spawn_background_task(&self) {
        let inner = self.inner.clone();
        let mut stream = blocks::into_stream(inner.blocks.clone());
        let task = async move {
            while let Some(block) = stream.next().await {
                let keys = inner.prepare_update(block.number);
                tracing::debug!(block = block.number, count = keys.len(), "updating entries");
                futures::future::join_all(keys.into_iter().map(|key| inner.clone().refresh(key)))
                    .await;
            }
            tracing::error!("block stream terminated unexpectedly");
        };
        tokio::spawn(task.instrument(tracing::info_span!("query_cache", label = self.inner.label)));
    }
}

impl<K, V> Inner<K, V>
where
    K: Clone + Debug + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn current_block(&self) -> u64 {
        self.blocks.borrow().number
    }

    /// Marks the entry as requested and decides whether it has to be fetched.
    /// A fetch is claimed by the caller in the same critical section so that
    /// concurrent readers do not start it twice.
    fn access(&self, key: &K, record: bool) -> (Query<V>, Access) {
        let block = self.current_block();
        let mut mutexed = self.mutexed.lock().unwrap();
        let entry = mutexed
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(block));
        entry.requested_at = block;

        if record {
            let counter = if entry.value.is_some() {
                &self.metrics.query_cache_hits
            } else {
                &self.metrics.query_cache_misses
            };
            counter.with_label_values(&[self.label]).inc();
        }

        let mut query = entry.query(block, &self.config);
        let access = if entry.needs_fetch(block, &self.config) {
            entry.start_fetch();
            query.is_loading = query.value.is_none();
            Access::Start
        } else if entry.in_flight {
            Access::Wait
        } else {
            Access::Ready
        };
        (query, access)
    }

    fn peek(&self, key: &K) -> Query<V> {
        let block = self.current_block();
        let mutexed = self.mutexed.lock().unwrap();
        mutexed
            .entries
            .get(key)
            .map(|entry| entry.query(block, &self.config))
            .unwrap_or_else(Query::idle)
    }

    /// Fetches a value for an entry that was claimed with
    /// [`Entry::start_fetch`] and stores the result.
    async fn refresh(self: Arc<Self>, key: K) {
        let block = self.current_block();
        let result = self.fetch_with_retries(&key).measure(self.label).await;

        {
            let mut mutexed = self.mutexed.lock().unwrap();
            let Mutexed {
                entries,
                last_version,
            } = &mut *mutexed;
            if let Some(entry) = entries.get_mut(&key) {
                entry.in_flight = false;
                match result {
                    Ok(value) => {
                        *last_version += 1;
                        entry.value = Some(value);
                        entry.version = *last_version;
                        entry.fetched_at = Some(block);
                        entry.failed_at = None;
                    }
                    Err(err) => {
                        tracing::warn!(label = self.label, ?key, ?err, "failed to fetch");
                        self.metrics
                            .query_cache_fetch_failures
                            .with_label_values(&[self.label])
                            .inc();
                        entry.failed_at = Some(block);
                    }
                }
            }
        }

        self.updated.notify_waiters();
    }

    // Nodes occasionally fail requests for state at a block they did not see
    // yet, so a failed fetch is repeated a few times before giving up.
    async fn fetch_with_retries(&self, key: &K) -> Result<V> {
        for _ in 0..self.config.max_retries {
            match self.fetcher.fetch(key.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) => tracing::warn!(?key, ?err, "retrying fetch because of error"),
            }
            tokio::time::sleep(self.config.delay_between_retries).await;
        }
        self.fetcher.fetch(key.clone()).await
    }

    /// Evicts entries not requested recently and claims the rest for a
    /// refetch.
    fn prepare_update(&self, block: u64) -> Vec<K> {
        let oldest_allowed_request = block.saturating_sub(self.config.eviction_blocks);
        let mut mutexed = self.mutexed.lock().unwrap();
        mutexed
            .entries
            .retain(|_, entry| entry.in_flight || entry.requested_at >= oldest_allowed_request);
        mutexed
            .entries
            .iter_mut()
            .filter(|(_, entry)| !entry.in_flight)
            .map(|(key, entry)| {
                entry.start_fetch();
                key.clone()
            })
            .collect_vec()
    }
}

impl<V: Clone> Entry<V> {
    fn new(requested_at: u64) -> Self {
        Self {
            value: None,
            version: 0,
            fetched_at: None,
            failed_at: None,
            requested_at,
            in_flight: false,
            invalidated: false,
        }
    }

    fn is_stale(&self, block: u64, config: &CacheConfig) -> bool {
        self.invalidated
            || self
                .fetched_at
                .is_some_and(|at| block > at.saturating_add(config.stale_after_blocks))
    }

    fn needs_fetch(&self, block: u64, config: &CacheConfig) -> bool {
        if self.in_flight {
            return false;
        }
        // Failed fetches are only retried once the chain moved on.
        if self.failed_at.is_some_and(|at| block <= at) {
            return false;
        }
        self.value.is_none() || self.is_stale(block, config)
    }

    fn start_fetch(&mut self) {
        self.in_flight = true;
        // An invalidation that happens while fetching applies to the result.
        self.invalidated = false;
    }

    fn query(&self, block: u64, config: &CacheConfig) -> Query<V> {
        Query {
            value: self.value.clone(),
            version: self.version,
            is_stale: self.value.is_some() && self.is_stale(block, config),
            is_loading: self.value.is_none() && self.in_flight,
        }
    }
}
