//! # Result Cache
//!
//! A keyed cache of fetched values with a staleness window, in-flight
//! de-duplication and bounded retries.
//!
//! Each key owns a slot guarded by an async mutex. A caller locks the slot,
//! returns the cached value if it is still fresh, and otherwise runs the
//! fetcher while holding the lock. Concurrent callers for the same key queue
//! on the lock and find the fresh value when they get it, so at most one fetch
//! per key is in flight.
//!
//! Failures are never stored. A failed fetch releases the slot empty (or
//! still stale) and the next caller fetches for itself.
//!
//! Retries cover only [`StoreError::is_retryable`] failures. Client errors
//! (not found, permission, validation) are returned after one attempt.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub stale_time: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub retry_base: Duration,
    pub retry_cap: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            max_retries: 3,
            retry_base: Duration::from_millis(100),
            retry_cap: Duration::from_secs(1),
        }
    }
}

impl CachePolicy {
    /// Delay before retry number `attempt` (0-based): doubling, capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_base
            .checked_mul(factor)
            .map_or(self.retry_cap, |d| d.min(self.retry_cap))
    }
}

/// A value handed out by the cache, with where it came from.
#[derive(Debug, Clone)]
pub struct CacheRead<V> {
    value: V,
    age: Duration,
    hit: bool,
}

impl<V> CacheRead<V> {
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    /// Time since the value was fetched. Zero for a fresh fetch.
    pub fn age(&self) -> Duration {
        self.age
    }

    pub fn was_cache_hit(&self) -> bool {
        self.hit
    }
}

struct Cached<V> {
    value: V,
    fetched_at: Instant,
}

type Slot<V> = Rc<Mutex<Option<Cached<V>>>>;

pub struct QueryCache<V> {
    policy: CachePolicy,
    slots: RefCell<HashMap<String, Slot<V>>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Serve `key` from cache if fresh, otherwise fetch (with retries) and store.
    pub async fn fetch<F, Fut>(&self, key: &str, mut fetcher: F) -> Result<CacheRead<V>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.policy.stale_time {
                debug!(key, age_ms = age.as_millis() as u64, "cache hit");
                return Ok(CacheRead {
                    value: cached.value.clone(),
                    age,
                    hit: true,
                });
            }
            debug!(key, age_ms = age.as_millis() as u64, "cache entry stale");
        } else {
            debug!(key, "cache miss");
        }

        let value = self.fetch_with_retry(key, &mut fetcher).await?;
        *entry = Some(Cached {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(CacheRead {
            value,
            age: Duration::ZERO,
            hit: false,
        })
    }

    async fn fetch_with_retry<F, Fut>(&self, key: &str, fetcher: &mut F) -> Result<V>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.policy.max_retries => {
                    let delay = self.policy.backoff(attempt);
                    attempt += 1;
                    warn!(
                        key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn slot(&self, key: &str) -> Slot<V> {
        self.slots
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Drop every key starting with `prefix`, e.g. one collection's listings.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.slots
            .borrow_mut()
            .retain(|key, _| !key.starts_with(prefix));
    }

    pub fn invalidate_all(&self) {
        self.slots.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::cell::Cell;

    fn cache() -> QueryCache<u32> {
        QueryCache::new(CachePolicy::default())
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = CachePolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.backoff(4), Duration::from_secs(1));
        assert_eq!(policy.backoff(40), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_fetches_for_one_key_run_once() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let fetcher = move || async move {
            calls.set(calls.get() + 1);
            tokio::time::sleep(Duration::from_millis(700)).await;
            Ok(7)
        };

        let (a, b) = tokio::join!(
            cache.fetch("products", fetcher),
            cache.fetch("products", fetcher)
        );
        assert_eq!(*a.unwrap().value(), 7);
        let b = b.unwrap();
        assert_eq!(*b.value(), 7);
        assert!(b.was_cache_hit());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_served_until_stale() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let fetcher = move || async move {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };

        assert_eq!(cache.fetch("k", fetcher).await.unwrap().into_value(), 1);

        tokio::time::advance(Duration::from_secs(59)).await;
        let read = cache.fetch("k", fetcher).await.unwrap();
        assert!(read.was_cache_hit());
        assert_eq!(read.age(), Duration::from_secs(59));
        assert_eq!(calls.get(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        let read = cache.fetch("k", fetcher).await.unwrap();
        assert!(!read.was_cache_hit());
        assert_eq!(read.into_value(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn network_errors_are_retried_then_surface() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let result = cache
            .fetch("k", move || async move {
                calls.set(calls.get() + 1);
                Err::<u32, _>(StoreError::NetworkSimulated("down".into()))
            })
            .await;
        assert!(matches!(result, Err(StoreError::NetworkSimulated(_))));
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_attempted_once() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let result = cache
            .fetch("k", move || async move {
                calls.set(calls.get() + 1);
                Err::<u32, _>(StoreError::Permission("admin only".into()))
            })
            .await;
        assert!(matches!(result, Err(StoreError::Permission(_))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_recovers_within_retries() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let read = cache
            .fetch("k", move || async move {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(StoreError::NetworkSimulated("flaky".into()))
                } else {
                    Ok(42)
                }
            })
            .await
            .unwrap();
        assert_eq!(read.into_value(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new(CachePolicy {
            max_retries: 0,
            ..CachePolicy::default()
        });
        let fail = Cell::new(true);
        let fail = &fail;
        let fetcher = move || async move {
            if fail.get() {
                Err(StoreError::NetworkSimulated("down".into()))
            } else {
                Ok(1u32)
            }
        };

        assert!(cache.fetch("k", fetcher).await.is_err());
        fail.set(false);
        let read = cache.fetch("k", fetcher).await.unwrap();
        assert!(!read.was_cache_hit());
        assert_eq!(read.into_value(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_forces_refetch() {
        let cache = cache();
        let calls = Cell::new(0);
        let calls = &calls;
        let fetcher = move || async move {
            calls.set(calls.get() + 1);
            Ok(0u32)
        };
        cache.fetch("products?page=1", fetcher).await.unwrap();
        cache.fetch("blogs?page=1", fetcher).await.unwrap();
        assert_eq!(cache.len(), 2);

        cache.invalidate_prefix("products");
        assert_eq!(cache.len(), 1);
        cache.fetch("products?page=1", fetcher).await.unwrap();
        assert_eq!(calls.get(), 3);

        cache.invalidate_all();
        assert!(cache.is_empty());
        let read = cache.fetch("blogs?page=1", fetcher).await.unwrap();
        assert!(!read.was_cache_hit());
        assert_eq!(calls.get(), 4);
    }
}
