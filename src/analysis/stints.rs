// ABOUTME: Tyre stint reconstruction from laps and pit-stop events
// ABOUTME: Implements the compound fallback chain and per-stint degradation analysis

//! # Pit-Stop/Stint Reconstructor
//!
//! Partitions a driver's laps into contiguous tyre stints bounded by pit
//! stops. Stint *i* ends on the lap before stop *i*'s recorded lap and
//! stint *i+1* begins on the stop lap itself, so the emitted ranges cover
//! the observed lap range exactly (minus suppressed zero-length stints).
//!
//! Compound fields are frequently null on in/out laps, so each stint's
//! compound comes from an ordered fallback chain that recovers the most
//! likely compound without guessing beyond available evidence. The
//! terminal defaults differ on purpose: `MEDIUM` when a driver never
//! stopped, `HARD` for the closing stint of a race with stops.

use crate::errors::AppResult;
use crate::models::{Compound, Lap, PitStop, Stint};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Reconstruct tyre stints from one driver's laps and pit-stop events
///
/// Pit stops are sorted by lap before use (feed ordering is not
/// guaranteed). Malformed stops - lap zero, or a duplicate of an already
/// processed stop lap - are logged and skipped so one bad record cannot
/// abort the whole reconstruction. A stop lap outside the observed lap
/// range is tolerated; the resulting stint simply holds no lap data.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature uniform with the
/// other derivations so callers treat all of them alike.
pub fn reconstruct_stints(laps: &[Lap], pit_stops: &[PitStop]) -> AppResult<Vec<Stint>> {
    let Some(min_lap) = laps.iter().map(|l| l.lap_number).min() else {
        if !pit_stops.is_empty() {
            warn!(
                stops = pit_stops.len(),
                "pit stops without any laps; nothing to reconstruct"
            );
        }
        return Ok(Vec::new());
    };
    let max_lap = laps.iter().map(|l| l.lap_number).max().unwrap_or(min_lap);

    let first_lap_compound = laps
        .iter()
        .min_by_key(|l| l.lap_number)
        .and_then(|l| l.compound);

    let mut stops: Vec<&PitStop> = pit_stops.iter().collect();
    stops.sort_by_key(|s| s.lap);

    if stops.is_empty() {
        return Ok(vec![Stint {
            compound: first_lap_compound.unwrap_or(Compound::Medium),
            start_lap: min_lap,
            end_lap: max_lap,
            laps: laps_in_range(laps, min_lap, max_lap),
        }]);
    }

    let mut stints = Vec::with_capacity(stops.len() + 1);
    let mut stint_start = min_lap;
    let mut previous_stop: Option<&PitStop> = None;

    for stop in stops {
        if stop.lap == 0 {
            warn!("pit stop with lap 0 skipped");
            continue;
        }
        if previous_stop.is_some_and(|prev| prev.lap == stop.lap) {
            warn!(lap = stop.lap, "duplicate pit stop lap skipped");
            continue;
        }

        let stint_end = stop.lap - 1;
        if stint_start <= stint_end {
            let stint_laps = laps_in_range(laps, stint_start, stint_end);
            let compound = first_compound(&stint_laps)
                .or_else(|| previous_stop.and_then(|prev| prev.compound_before))
                .or(first_lap_compound)
                .unwrap_or(Compound::Medium);
            stints.push(Stint {
                compound,
                start_lap: stint_start,
                end_lap: stint_end,
                laps: stint_laps,
            });
        } else {
            debug!(
                stint_start,
                stop_lap = stop.lap,
                "zero-length stint suppressed"
            );
        }

        stint_start = stop.lap;
        previous_stop = Some(stop);
    }

    // Closing stint out to the last observed lap
    if stint_start <= max_lap {
        let stint_laps = laps_in_range(laps, stint_start, max_lap);
        let compound = first_compound(&stint_laps)
            .or_else(|| previous_stop.and_then(|prev| prev.compound_before))
            .unwrap_or(Compound::Hard);
        stints.push(Stint {
            compound,
            start_lap: stint_start,
            end_lap: max_lap,
            laps: stint_laps,
        });
    }

    Ok(stints)
}

/// Laps with numbers inside `[start, end]`, in ascending order
fn laps_in_range(laps: &[Lap], start: u32, end: u32) -> Vec<Lap> {
    let mut selected: Vec<Lap> = laps
        .iter()
        .filter(|l| (start..=end).contains(&l.lap_number))
        .cloned()
        .collect();
    selected.sort_by_key(|l| l.lap_number);
    selected
}

/// First non-null compound within a stint's laps
fn first_compound(laps: &[Lap]) -> Option<Compound> {
    laps.iter().find_map(|l| l.compound)
}

/// Per-stint tyre degradation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StintDegradation {
    /// Compound of the stint
    pub compound: Compound,
    /// Number of timed laps in the stint
    pub stint_length: usize,
    /// Mean lap time across the stint's timed laps
    pub avg_lap_time: f64,
    /// Lap time increase per lap, `(last - first) / length`
    pub degradation_per_lap: f64,
    /// First timed lap of the stint
    pub first_lap_time: Option<f64>,
    /// Last timed lap of the stint
    pub last_lap_time: Option<f64>,
}

/// Analyze tyre degradation per stint
///
/// Degradation is the straight-line lap time increase over the stint:
/// `(last timed lap - first timed lap) / timed lap count`, zero for
/// stints with fewer than two timed laps. Stints without any timed laps
/// are omitted.
#[must_use]
pub fn analyze_degradation(stints: &[Stint]) -> Vec<StintDegradation> {
    stints
        .iter()
        .filter_map(|stint| {
            let times: Vec<f64> = stint.laps.iter().filter_map(|l| l.time).collect();
            let (first, last) = (times.first().copied()?, times.last().copied()?);

            let degradation_per_lap = if times.len() > 1 {
                (last - first) / times.len() as f64
            } else {
                0.0
            };

            Some(StintDegradation {
                compound: stint.compound,
                stint_length: times.len(),
                avg_lap_time: times.iter().sum::<f64>() / times.len() as f64,
                degradation_per_lap,
                first_lap_time: Some(first),
                last_lap_time: Some(last),
            })
        })
        .collect()
}
