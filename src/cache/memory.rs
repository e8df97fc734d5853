// ABOUTME: In-memory session cache implementation backed by a concurrent map
// ABOUTME: No TTL and no eviction; entries live until the process exits or clear() is called

use super::SessionCache;
use crate::models::{SessionData, SessionKey};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory session cache
///
/// `DashMap` gives shard-level locking, so concurrent requests for
/// different sessions never contend. Values are `Arc`-shared: a `get`
/// hands out a cheap clone of the pointer, never of the session payload.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionCache {
    store: Arc<DashMap<SessionKey, Arc<SessionData>>>,
}

impl InMemorySessionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, key: &SessionKey) -> Option<Arc<SessionData>> {
        self.store.get(key).map(|entry| Arc::clone(entry.value()))
    }

    async fn put(&self, key: SessionKey, session: Arc<SessionData>) {
        if self.store.insert(key, session).is_some() {
            tracing::debug!(key = %key, "session cache entry overwritten");
        }
    }

    async fn len(&self) -> usize {
        self.store.len()
    }

    async fn clear(&self) {
        self.store.clear();
    }
}
