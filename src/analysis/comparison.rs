// ABOUTME: Driver comparison engine computing signed gaps, faster-lap counts, and consistency
// ABOUTME: Pairs laps by lap number; all gaps follow the driver1 minus driver2 sign convention

//! # Comparison Engine
//!
//! Head-to-head comparison of two drivers over the same session. Laps are
//! paired by lap number and unpaired laps are excluded from the paired
//! metrics; each driver's fastest lap and consistency are taken over
//! their full timed lap set, since those describe the driver alone.
//!
//! Every gap is signed driver1 − driver2: negative means driver1 faster.

use crate::analysis::classifier::sample_std;
use crate::errors::{AppError, AppResult};
use crate::models::Lap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Head-to-head comparison between two drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// First driver code
    pub driver1: String,
    /// Second driver code
    pub driver2: String,
    /// Mean lap time gap over paired laps
    pub avg_gap: f64,
    /// Gap between the drivers' fastest laps
    pub fastest_lap_gap: f64,
    /// Mean first-sector gap
    pub sector1_gap: f64,
    /// Mean second-sector gap
    pub sector2_gap: f64,
    /// Mean third-sector gap
    pub sector3_gap: f64,
    /// Paired laps where driver1 was strictly faster
    pub driver1_faster_laps: usize,
    /// Paired laps where driver2 was strictly faster
    pub driver2_faster_laps: usize,
    /// Sample standard deviation of driver1's timed laps
    pub driver1_consistency: f64,
    /// Sample standard deviation of driver2's timed laps
    pub driver2_consistency: f64,
}

/// Per-lap time delta between two drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapDelta {
    /// Common lap number
    pub lap_number: u32,
    /// Driver1's time on the lap
    pub time1: f64,
    /// Driver2's time on the lap
    pub time2: f64,
    /// Signed delta, `time1 - time2`
    pub delta: f64,
}

/// Detailed comparison between two drivers
///
/// # Errors
///
/// - `InsufficientData` when either driver has no timed laps
/// - `NoComparableLaps` when the drivers share no timed lap numbers
pub fn compare_drivers(laps1: &[Lap], laps2: &[Lap]) -> AppResult<Comparison> {
    let driver1 = driver_code(laps1);
    let driver2 = driver_code(laps2);

    let times1: Vec<f64> = laps1.iter().filter_map(|l| l.time).collect();
    let times2: Vec<f64> = laps2.iter().filter_map(|l| l.time).collect();
    if times1.is_empty() || times2.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "comparison requires timed laps for both {driver1} and {driver2}"
        )));
    }

    let paired = pair_by_lap_number(laps1, laps2);
    let paired_times: Vec<(f64, f64)> = paired
        .values()
        .filter_map(|(a, b)| Some((a.time?, b.time?)))
        .collect();
    if paired_times.is_empty() {
        return Err(AppError::no_comparable_laps(&driver1, &driver2));
    }

    let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    let paired1: Vec<f64> = paired_times.iter().map(|(a, _)| *a).collect();
    let paired2: Vec<f64> = paired_times.iter().map(|(_, b)| *b).collect();

    let fastest1 = times1.iter().copied().fold(f64::INFINITY, f64::min);
    let fastest2 = times2.iter().copied().fold(f64::INFINITY, f64::min);

    let (sector1_gap, sector2_gap, sector3_gap) = (
        sector_gap(&paired, |l| l.sector1),
        sector_gap(&paired, |l| l.sector2),
        sector_gap(&paired, |l| l.sector3),
    );

    debug!(
        driver1 = %driver1,
        driver2 = %driver2,
        paired = paired_times.len(),
        "driver comparison completed"
    );

    Ok(Comparison {
        avg_gap: mean(&paired1) - mean(&paired2),
        fastest_lap_gap: fastest1 - fastest2,
        sector1_gap,
        sector2_gap,
        sector3_gap,
        driver1_faster_laps: paired_times.iter().filter(|(a, b)| a < b).count(),
        driver2_faster_laps: paired_times.iter().filter(|(a, b)| b < a).count(),
        driver1_consistency: sample_std(&times1, mean(&times1)),
        driver2_consistency: sample_std(&times2, mean(&times2)),
        driver1,
        driver2,
    })
}

/// Calculate time deltas between two drivers' common laps
///
/// Laps without a time on either side are excluded. Output is ordered by
/// lap number.
#[must_use]
pub fn lap_deltas(laps1: &[Lap], laps2: &[Lap]) -> Vec<LapDelta> {
    pair_by_lap_number(laps1, laps2)
        .into_iter()
        .filter_map(|(lap_number, (a, b))| {
            let (time1, time2) = (a.time?, b.time?);
            Some(LapDelta {
                lap_number,
                time1,
                time2,
                delta: time1 - time2,
            })
        })
        .collect()
}

/// Pair laps by lap number; unpaired laps are dropped
fn pair_by_lap_number<'a>(
    laps1: &'a [Lap],
    laps2: &'a [Lap],
) -> BTreeMap<u32, (&'a Lap, &'a Lap)> {
    let by_number: BTreeMap<u32, &Lap> = laps2.iter().map(|l| (l.lap_number, l)).collect();
    laps1
        .iter()
        .filter_map(|a| by_number.get(&a.lap_number).map(|b| (a.lap_number, (a, *b))))
        .collect()
}

/// Mean gap for one sector over pairs with values on both sides
///
/// Zero when no pair has the sector on both sides, matching the observed
/// behavior of reporting 0.0 for missing sector columns.
fn sector_gap(
    paired: &BTreeMap<u32, (&Lap, &Lap)>,
    sector: impl Fn(&Lap) -> Option<f64>,
) -> f64 {
    let pairs: Vec<(f64, f64)> = paired
        .values()
        .filter_map(|(a, b)| Some((sector(a)?, sector(b)?)))
        .collect();
    if pairs.is_empty() {
        return 0.0;
    }
    let mean1 = pairs.iter().map(|(a, _)| a).sum::<f64>() / pairs.len() as f64;
    let mean2 = pairs.iter().map(|(_, b)| b).sum::<f64>() / pairs.len() as f64;
    mean1 - mean2
}

/// Driver code from the first lap, empty for an empty slice
fn driver_code(laps: &[Lap]) -> String {
    laps.first().map_or_else(String::new, |l| l.driver.clone())
}
