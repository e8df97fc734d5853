// ABOUTME: Core provider trait for unified timing data access
// ABOUTME: Defines the TimingProvider seam and the cache-through SessionLoader

//! # Provider Abstraction
//!
//! [`TimingProvider`] is the only seam between this crate and the outside
//! world. Everything a provider returns is plain data from
//! [`crate::models`]; providers keep their wire formats internal and
//! convert at the boundary.
//!
//! Upstream failures surface as `ExternalServiceError` /
//! `ExternalServiceUnavailable`. No retry policy lives here - the data is
//! fetched once per cache miss and derivations run on what arrived.

use crate::cache::SessionCache;
use crate::errors::AppResult;
use crate::models::{CircuitLayout, RaceInfo, SessionData, SessionKey, TelemetrySeries};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Unified interface for upstream timing data sources
#[async_trait]
pub trait TimingProvider: Send + Sync {
    /// Provider name for logging and the root endpoint
    fn name(&self) -> &'static str;

    /// Race schedule for a season
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn race_schedule(&self, year: u16) -> AppResult<Vec<RaceInfo>>;

    /// Materialize one session: laps, drivers, pit stops, race control
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails or the session does
    /// not exist.
    async fn load_session(&self, key: &SessionKey) -> AppResult<SessionData>;

    /// Per-sample telemetry for one driver's lap
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails or no telemetry
    /// exists for the lap.
    async fn lap_telemetry(
        &self,
        key: &SessionKey,
        driver: &str,
        lap: u32,
    ) -> AppResult<TelemetrySeries>;

    /// Circuit geometry for the session's track
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails or no position data
    /// exists.
    async fn circuit_geometry(&self, key: &SessionKey) -> AppResult<CircuitLayout>;
}

/// Composes a provider with the session cache: fetch-if-absent
///
/// Mirrors the dashboard's original request path: check the cache, load
/// from upstream on a miss, store, return. Telemetry and geometry are not
/// cached - they are fetched per request like the original did.
pub struct SessionLoader {
    provider: Arc<dyn TimingProvider>,
    cache: Arc<dyn SessionCache>,
}

impl SessionLoader {
    /// Create a loader over the given provider and cache
    pub fn new(provider: Arc<dyn TimingProvider>, cache: Arc<dyn SessionCache>) -> Self {
        Self { provider, cache }
    }

    /// The provider backing this loader
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn TimingProvider> {
        &self.provider
    }

    /// Return the cached session or fetch, store, and return it
    ///
    /// Concurrent misses for the same key may both fetch; the second store
    /// overwrites the first with an equivalent value, which is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache miss leads to a failed upstream fetch.
    pub async fn session(&self, key: &SessionKey) -> AppResult<Arc<SessionData>> {
        if let Some(session) = self.cache.get(key).await {
            debug!(key = %key, "session cache hit");
            return Ok(session);
        }

        info!(key = %key, provider = self.provider.name(), "session cache miss, loading from upstream");
        let session = Arc::new(self.provider.load_session(key).await?);
        self.cache.put(*key, Arc::clone(&session)).await;
        Ok(session)
    }
}
