// ABOUTME: Lap record normalization, cleaning, and pit-stop derivation
// ABOUTME: Produces uniform ordered lap sequences while preserving gaps in lap numbers

//! # Lap Record Normalizer
//!
//! The timing feed delivers laps in arrival order with duplicates and
//! holes. Normalization produces the one canonical shape every other
//! derivation assumes: ascending by lap number, gaps preserved (a missing
//! lap number means an untimed or deleted lap and must stay missing, not
//! be re-indexed away).

use crate::models::{Lap, PitStop};
use tracing::{info, warn};

/// Order laps ascending by lap number, preserving gaps
///
/// Duplicate lap numbers keep the first occurrence; dropped duplicates are
/// logged. The sort is stable so feed order breaks ties before dedup.
#[must_use]
pub fn normalize_laps(mut laps: Vec<Lap>) -> Vec<Lap> {
    laps.sort_by_key(|lap| lap.lap_number);

    let mut normalized: Vec<Lap> = Vec::with_capacity(laps.len());
    for lap in laps {
        if normalized
            .last()
            .is_some_and(|prev: &Lap| prev.lap_number == lap.lap_number && prev.driver == lap.driver)
        {
            warn!(
                lap_number = lap.lap_number,
                driver = %lap.driver,
                "duplicate lap number dropped during normalization"
            );
            continue;
        }
        normalized.push(lap);
    }
    normalized
}

/// Remove invalid laps and outliers
///
/// Drops laps with no time, laps the feed marked inaccurate, and pit
/// in/out laps. This is the standard pre-filter for pace statistics;
/// stint reconstruction intentionally runs on the unfiltered sequence.
#[must_use]
pub fn clean_laps(laps: &[Lap]) -> Vec<Lap> {
    let initial_count = laps.len();

    let cleaned: Vec<Lap> = laps
        .iter()
        .filter(|lap| lap.time.is_some())
        .filter(|lap| lap.is_accurate)
        .filter(|lap| !lap.is_pit_lap())
        .cloned()
        .collect();

    info!(
        initial = initial_count,
        remaining = cleaned.len(),
        removed = initial_count - cleaned.len(),
        "cleaned lap times"
    );

    cleaned
}

/// Laps belonging to one driver, in normalized order
#[must_use]
pub fn laps_for_driver(laps: &[Lap], driver: &str) -> Vec<Lap> {
    normalize_laps(
        laps.iter()
            .filter(|lap| lap.driver.eq_ignore_ascii_case(driver))
            .cloned()
            .collect(),
    )
}

/// Derive a driver's pit-stop list from laps carrying a pit-entry time
///
/// Fallback for feeds without an explicit pit event stream: any lap with
/// a `pit_in_time` is an in-lap, and its compound/tyre-life describe the
/// set being given up. The stop itself is anchored to the lap after the
/// in-lap - the first lap of the following stint, which is the convention
/// the stint reconstructor's boundaries assume.
#[must_use]
pub fn pit_stops_from_laps(laps: &[Lap]) -> Vec<PitStop> {
    let mut stops: Vec<PitStop> = laps
        .iter()
        .filter(|lap| lap.pit_in_time.is_some())
        .map(|lap| PitStop {
            lap: lap.lap_number + 1,
            stint: None,
            pit_duration: None,
            lap_time: lap.time,
            compound_before: lap.compound,
            tyre_life_before: lap.tyre_life,
        })
        .collect();
    stops.sort_by_key(|stop| stop.lap);
    stops
}
