// ABOUTME: Main library entry point for the Paddock F1 analytics platform
// ABOUTME: Provides session loading, caching, derivation analytics, and the REST API

#![deny(unsafe_code)]

//! # Paddock Server
//!
//! A REST API serving Formula 1 timing analytics to the dashboard
//! frontend. Session data (laps, pit stops, race-control messages,
//! telemetry) comes from an upstream timing provider, is memoized in an
//! in-memory session cache, and is turned into chart-ready derivations:
//! tyre stints, lap classifications, pace statistics, driver comparisons,
//! aligned telemetry, and safety-car annotations.
//!
//! ## Architecture
//!
//! - **Providers**: the upstream source behind the [`providers::TimingProvider`]
//!   trait (HTTP client or synthetic fixtures)
//! - **Cache**: `(year, round, session)` keyed memoization of materialized
//!   sessions; no TTL, no eviction
//! - **Analysis**: pure derivation functions over materialized data - the
//!   only part of the crate with interesting logic, and fully testable
//!   without network access
//! - **Routes**: a thin axum facade mapping one endpoint to one derivation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paddock_server::cache::InMemorySessionCache;
//! use paddock_server::config::ServerConfig;
//! use paddock_server::providers::{SessionLoader, SyntheticProvider};
//! use paddock_server::routes::{router, AppState};
//! use std::sync::Arc;
//!
//! let config = ServerConfig::default();
//! let loader = SessionLoader::new(
//!     Arc::new(SyntheticProvider::demo()),
//!     Arc::new(InMemorySessionCache::new()),
//! );
//! let app = router(Arc::new(AppState { loader, config }));
//! ```

/// Derivation core: stints, classification, comparison, telemetry, safety car
pub mod analysis;

/// Session cache abstraction with pluggable backends
pub mod cache;

/// Configuration management from environment variables
pub mod config;

/// Application constants and analysis thresholds
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Common data models for timing data
pub mod models;

/// Upstream timing provider implementations
pub mod providers;

/// HTTP routes for the dashboard frontend
pub mod routes;
