// ABOUTME: Session cache abstraction keyed by (year, round, session)
// ABOUTME: Pluggable backend support so the derivation core stays independent of cache lifecycle

//! # Session Cache
//!
//! Loading a session from the upstream provider is by far the most
//! expensive step of any request, so materialized sessions are memoized by
//! [`SessionKey`]. The cache is deliberately minimal: `get`/`put` with no
//! TTL and no eviction, matching the observed behavior of the system this
//! replaces. Concurrent requests for the same key may both miss and fetch;
//! the second `put` simply overwrites the first with an equivalent value,
//! and deduplicating that fetch is explicitly not this layer's job.
//!
//! The derivation core never touches the cache directly - it receives
//! already-materialized [`SessionData`] - which keeps every function in
//! `analysis` testable without network mocking.

/// In-memory cache implementation
pub mod memory;

pub use memory::InMemorySessionCache;

use crate::models::{SessionData, SessionKey};
use std::sync::Arc;

/// Cache provider trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait SessionCache: Send + Sync {
    /// Retrieve a cached session, if present
    async fn get(&self, key: &SessionKey) -> Option<Arc<SessionData>>;

    /// Store a materialized session
    async fn put(&self, key: SessionKey, session: Arc<SessionData>);

    /// Number of cached sessions
    async fn len(&self) -> usize;

    /// True when nothing is cached
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop all cached sessions (for tests/admin)
    async fn clear(&self);
}
