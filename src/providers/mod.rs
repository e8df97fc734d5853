// ABOUTME: Timing data provider integrations for upstream F1 data sources
// ABOUTME: Unifies access behind the TimingProvider trait with HTTP and synthetic backends

//! # Timing Providers
//!
//! The upstream timing source is a black box behind [`core::TimingProvider`]:
//! it hands back per-lap records, pit events, race-control messages, and
//! per-sample telemetry for a `(year, round, session)` key. Two backends
//! exist:
//!
//! - [`openf1::OpenF1Provider`] - HTTP JSON client for an OpenF1-style API
//! - [`synthetic::SyntheticProvider`] - preloaded fixtures for development
//!   and tests, no network
//!
//! [`core::SessionLoader`] composes a provider with the session cache so
//! request handlers only ever see materialized [`crate::models::SessionData`].

/// Core provider trait and the cache-composing session loader
pub mod core;
/// HTTP client for an OpenF1-style upstream timing API
pub mod openf1;
/// Fixture-backed provider for development and testing
pub mod synthetic;

pub use self::core::{SessionLoader, TimingProvider};
pub use openf1::OpenF1Provider;
pub use synthetic::SyntheticProvider;
