//! Time-boxed memoization of fetch results.
//!
//! Each key owns its own async mutex, held while the value is computed, so
//! concurrent misses on one key produce a single upstream call while other
//! keys proceed independently.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Function identity plus its rendered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub function: &'static str,
    pub args: String,
}

impl CacheKey {
    pub fn new(function: &'static str, args: impl Into<String>) -> Self {
        Self {
            function,
            args: args.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.args)
    }
}

#[derive(Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

pub struct ResultCache<V> {
    slots: Mutex<HashMap<CacheKey, Slot<V>>>,
}

impl<V: Clone> ResultCache<V> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the stored value for `key` if it is younger than `ttl`,
    /// otherwise run `compute` and store its result.
    ///
    /// Errors are passed through and never stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: CacheKey,
        compute: F,
        ttl: Duration,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(ttl) {
                debug!("Cache hit for {}", key);
                return Ok(cached.data.clone());
            }
            debug!("Cache entry expired for {}", key);
        } else {
            debug!("Cache miss for {}", key);
        }

        let data = compute().await?;
        *entry = Some(CacheEntry {
            data: data.clone(),
            created_at: Instant::now(),
        });
        Ok(data)
    }

    /// Number of keys that currently hold a value, fresh or not.
    pub async fn len(&self) -> usize {
        let slots: Vec<Slot<V>> = self.slots.lock().await.values().cloned().collect();
        let mut count = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }
        count
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
