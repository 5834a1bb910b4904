use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{Mutation, QueryKey};

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    stale: bool,
}

/// Shared response cache. Cloning shares the same storage.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh value stored under `key`, if any.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|e| !e.stale)?;
        entry.value.downcast_ref::<T>().cloned()
    }

    pub async fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.entries.write().await.insert(
            key,
            Entry {
                value: Arc::new(value),
                stale: false,
            },
        );
    }

    /// Returns the cached value for `key`, or runs `fetch` and stores its result.
    ///
    /// A failed read (`None`) is returned as-is and not stored, so a stale
    /// entry stays stale and the next read tries again.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        if let Some(hit) = self.get::<T>(&key).await {
            debug!(%key, "Query cache hit");
            return Some(hit);
        }

        debug!(%key, "Query cache miss, fetching");
        let value = fetch().await?;
        self.set(key, value.clone()).await;
        Some(value)
    }

    /// Marks every entry of `family` stale. Returns how many were marked.
    pub async fn invalidate_family(&self, family: &str) -> usize {
        let mut entries = self.entries.write().await;
        let mut marked = 0;
        for (key, entry) in entries.iter_mut() {
            if key.family() == family && !entry.stale {
                entry.stale = true;
                marked += 1;
            }
        }
        marked
    }

    /// Runs the declared invalidation of a successful mutation.
    pub async fn invalidate(&self, mutation: Mutation) {
        for family in mutation.invalidates() {
            let marked = self.invalidate_family(family).await;
            debug!(%mutation, family, marked, "Invalidated query family");
        }
    }

    /// `Some(true)` when the entry exists but must be refetched.
    pub async fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.entries.read().await.get(key).map(|e| e.stale)
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
