// ABOUTME: Lap classification, filtering, and pace statistics
// ABOUTME: Buckets laps into all/near-fastest/near-average windows and computes summary stats

//! # Lap Classifier / Filter
//!
//! Filters a lap sequence into the windows the dashboard charts offer
//! (all laps, within 3% of the fastest, within 2% of the mean) and
//! computes the pace summary. Laps without a time are excluded from
//! statistics and from the `fastest`/`average` windows but are retained
//! by the `all` filter, which is a strict identity.

use crate::constants::analysis::{AVERAGE_WINDOW_FRACTION, FASTEST_WINDOW_FACTOR};
use crate::errors::{AppError, AppResult};
use crate::models::Lap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Lap filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LapFilter {
    /// Keep every lap, timed or not
    #[default]
    All,
    /// Keep laps within 3% of the fastest lap
    Fastest,
    /// Keep laps within 2% of the mean lap time
    Average,
}

impl FromStr for LapFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "fastest" => Ok(Self::Fastest),
            "average" => Ok(Self::Average),
            other => Err(AppError::invalid_input(format!(
                "Unknown lap filter: '{other}'. Valid options: all, fastest, average"
            ))),
        }
    }
}

/// Pace summary over the timed laps of one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceStats {
    /// Fastest lap time
    pub fastest_lap: f64,
    /// Slowest lap time
    pub slowest_lap: f64,
    /// Arithmetic mean of lap times
    pub mean_pace: f64,
    /// Median lap time (midpoint average for even counts)
    pub median_pace: f64,
    /// Sample standard deviation of lap times; the consistency metric,
    /// lower is better. Zero when fewer than two laps are timed.
    pub std_pace: f64,
    /// Relative spread, `std_pace / mean_pace`
    pub coefficient_of_variation: f64,
}

/// A filtered lap sequence with its pace summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLaps {
    /// Laps surviving the filter, in input order
    pub filtered: Vec<Lap>,
    /// Statistics over the input's timed laps (not the filtered subset)
    pub stats: PaceStats,
}

/// Filter laps and compute the pace summary
///
/// Statistics always describe the full timed input, so switching filters
/// in the dashboard never changes the summary panel.
///
/// # Errors
///
/// Returns `InsufficientData` when no lap has a time.
pub fn classify_laps(laps: &[Lap], filter: LapFilter) -> AppResult<ClassifiedLaps> {
    let times: Vec<f64> = laps.iter().filter_map(|l| l.time).collect();
    let stats = pace_stats(&times)?;

    let filtered: Vec<Lap> = match filter {
        LapFilter::All => laps.to_vec(),
        LapFilter::Fastest => {
            let cutoff = stats.fastest_lap * FASTEST_WINDOW_FACTOR;
            laps.iter()
                .filter(|l| l.time.is_some_and(|t| t <= cutoff))
                .cloned()
                .collect()
        }
        LapFilter::Average => {
            let window = stats.mean_pace * AVERAGE_WINDOW_FRACTION;
            laps.iter()
                .filter(|l| l.time.is_some_and(|t| (t - stats.mean_pace).abs() <= window))
                .cloned()
                .collect()
        }
    };

    debug!(
        filter = ?filter,
        input = laps.len(),
        kept = filtered.len(),
        "laps classified"
    );

    Ok(ClassifiedLaps { filtered, stats })
}

/// Compute the pace summary over a set of lap times
///
/// # Errors
///
/// Returns `InsufficientData` for an empty slice.
pub fn pace_stats(times: &[f64]) -> AppResult<PaceStats> {
    if times.is_empty() {
        return Err(AppError::insufficient_data(
            "no timed laps available for pace statistics",
        ));
    }

    let fastest_lap = times.iter().copied().fold(f64::INFINITY, f64::min);
    let slowest_lap = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_pace = times.iter().sum::<f64>() / times.len() as f64;
    let std_pace = sample_std(times, mean_pace);

    Ok(PaceStats {
        fastest_lap,
        slowest_lap,
        mean_pace,
        median_pace: median(times),
        std_pace,
        coefficient_of_variation: if mean_pace == 0.0 {
            0.0
        } else {
            std_pace / mean_pace
        },
    })
}

/// Sample standard deviation (ddof = 1); zero below two samples
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Median of the values; midpoint average for even counts
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
