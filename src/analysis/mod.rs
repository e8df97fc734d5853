// ABOUTME: Derivation core for lap, stint, comparison, telemetry, and safety-car analytics
// ABOUTME: Pure functions over already-materialized session data; no I/O anywhere in this tree

//! # Analysis Core
//!
//! Every function in this tree is a pure function over in-memory data:
//! the provider layer materializes a session, and these modules derive
//! stints, statistics, comparisons, and annotations from it. Nothing here
//! performs I/O, touches the cache, or holds state, which is what keeps
//! the whole tree testable with literal fixtures.
//!
//! Work is bounded by lap count (under ~100 laps per driver) and sample
//! count (a few thousand telemetry points per lap), so no operation needs
//! cancellation or timeout semantics.

/// Driver comparison engine and per-lap deltas
pub mod comparison;
/// Lap filtering and pace statistics
pub mod classifier;
/// Lap normalization, cleaning, and pit-stop derivation
pub mod normalizer;
/// Safety car, VSC, and red flag period derivation
pub mod safety_car;
/// Sector aggregation and theoretical optimal lap
pub mod sectors;
/// Tyre stint reconstruction and degradation
pub mod stints;
/// Telemetry alignment, speed traces, and corner detection
pub mod telemetry;

pub use classifier::{classify_laps, ClassifiedLaps, LapFilter, PaceStats};
pub use comparison::{compare_drivers, lap_deltas, Comparison, LapDelta};
pub use normalizer::{clean_laps, laps_for_driver, normalize_laps, pit_stops_from_laps};
pub use safety_car::derive_safety_car_periods;
pub use sectors::{optimal_lap, summarize_sectors, OptimalLap, SectorSummary};
pub use stints::{analyze_degradation, reconstruct_stints, StintDegradation};
pub use telemetry::{
    align_telemetry, detect_corners, normalize_distance, normalize_distance_pair, speed_trace,
    AlignedTelemetry, SpeedTraceBin,
};
