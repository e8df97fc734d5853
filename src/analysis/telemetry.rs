// ABOUTME: Telemetry alignment, distance normalization, speed traces, and corner detection
// ABOUTME: Alignment is by sample index with truncation to the shorter series, not interpolation

//! # Telemetry Alignment
//!
//! Joins two per-distance telemetry series for the overlay chart. The
//! join is by sample index: the longer series is truncated to the shorter
//! one's length and the delta channel is a per-index speed difference.
//! Laps of different distance coverage therefore misalign toward the end
//! of the lap; resampling both series onto a common distance grid would
//! fix that but is deliberately not done here, because the charts on top
//! of this output reproduce the truncation behavior.

use crate::constants::analysis::{CORNER_SPEED_THRESHOLD_KMH, SPEED_TRACE_BIN_METERS};
use crate::errors::AppResult;
use crate::models::TelemetrySeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Index-aligned join of two telemetry series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTelemetry {
    /// Reference distance channel, taken from series 1
    pub distance: Vec<f64>,
    /// Series-1 speed
    pub speed1: Vec<f64>,
    /// Series-2 speed
    pub speed2: Vec<f64>,
    /// Per-sample signed delta, `speed1[i] - speed2[i]`
    pub speed_delta: Vec<f64>,
}

impl AlignedTelemetry {
    /// Number of aligned samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    /// True when no samples aligned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }
}

/// Align two telemetry series by sample index
///
/// Output length is `min(len(series1), len(series2))`; samples beyond the
/// shorter length are dropped. Two empty series align to an empty result,
/// not an error.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature uniform with the
/// other derivations.
pub fn align_telemetry(
    series1: &TelemetrySeries,
    series2: &TelemetrySeries,
) -> AppResult<AlignedTelemetry> {
    let n = series1.len().min(series2.len());

    let speed1: Vec<f64> = series1.speed.iter().copied().take(n).collect();
    let speed2: Vec<f64> = series2.speed.iter().copied().take(n).collect();
    let speed_delta = speed1
        .iter()
        .zip(speed2.iter())
        .map(|(a, b)| a - b)
        .collect();

    debug!(
        len1 = series1.len(),
        len2 = series2.len(),
        aligned = n,
        "telemetry aligned by index"
    );

    Ok(AlignedTelemetry {
        distance: series1.distance.iter().copied().take(n).collect(),
        speed1,
        speed2,
        speed_delta,
    })
}

/// Shift a series' distances so the lap starts at zero
///
/// Uses the series' own minimum as the offset. For comparing two laps use
/// [`normalize_distance_pair`], which shifts both by the shared minimum so
/// their distance axes stay comparable.
pub fn normalize_distance(series: &mut TelemetrySeries) {
    let offset = series.distance.iter().copied().fold(f64::INFINITY, f64::min);
    if offset.is_finite() && offset != 0.0 {
        for d in &mut series.distance {
            *d -= offset;
        }
    }
}

/// Shift two series by their shared minimum distance
pub fn normalize_distance_pair(series1: &mut TelemetrySeries, series2: &mut TelemetrySeries) {
    let offset = series1
        .distance
        .iter()
        .chain(series2.distance.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    if !offset.is_finite() || offset == 0.0 {
        return;
    }
    for d in series1.distance.iter_mut().chain(series2.distance.iter_mut()) {
        *d -= offset;
    }
}

/// Speed statistics within one distance bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTraceBin {
    /// Bin start distance (multiple of the bin width)
    pub distance_bin: f64,
    /// Mean speed in the bin
    pub mean_speed: f64,
    /// Maximum speed in the bin
    pub max_speed: f64,
    /// Minimum speed in the bin
    pub min_speed: f64,
    /// Mean throttle application in the bin
    pub mean_throttle: f64,
    /// Fraction of samples with the brake applied
    pub brake_fraction: f64,
}

/// Calculate speed statistics along the track in fixed distance bins
///
/// `bin_meters` of zero or below falls back to the default 100 m bin.
#[must_use]
pub fn speed_trace(series: &TelemetrySeries, bin_meters: f64) -> Vec<SpeedTraceBin> {
    let bin_width = if bin_meters > 0.0 {
        bin_meters
    } else {
        SPEED_TRACE_BIN_METERS
    };

    let mut bins: Vec<SpeedTraceBin> = Vec::new();
    let mut current_bin = 0.0;
    let mut current_indices: Vec<usize> = Vec::new();

    // Samples arrive in distance order, so bins can be folded in one pass
    for (i, &d) in series.distance.iter().enumerate() {
        let bin_start = (d / bin_width).floor() * bin_width;
        if !current_indices.is_empty() && (current_bin - bin_start).abs() > f64::EPSILON {
            bins.push(fold_bin(series, current_bin, &current_indices));
            current_indices.clear();
        }
        current_bin = bin_start;
        current_indices.push(i);
    }
    if !current_indices.is_empty() {
        bins.push(fold_bin(series, current_bin, &current_indices));
    }
    bins
}

fn fold_bin(series: &TelemetrySeries, bin_start: f64, indices: &[usize]) -> SpeedTraceBin {
    let n = indices.len() as f64;
    let speeds: Vec<f64> = indices.iter().map(|&i| series.speed[i]).collect();
    SpeedTraceBin {
        distance_bin: bin_start,
        mean_speed: speeds.iter().sum::<f64>() / n,
        max_speed: speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_speed: speeds.iter().copied().fold(f64::INFINITY, f64::min),
        mean_throttle: indices.iter().map(|&i| series.throttle[i]).sum::<f64>() / n,
        brake_fraction: indices.iter().filter(|&&i| series.brake[i]).count() as f64 / n,
    }
}

/// Detect corners as spans where speed drops below a threshold
///
/// Returns `(start_distance, end_distance)` tuples. A span still open at
/// the end of the lap is not emitted, matching the observed behavior.
/// `threshold_kmh` of zero or below falls back to the default 200 km/h.
#[must_use]
pub fn detect_corners(series: &TelemetrySeries, threshold_kmh: f64) -> Vec<(f64, f64)> {
    let threshold = if threshold_kmh > 0.0 {
        threshold_kmh
    } else {
        CORNER_SPEED_THRESHOLD_KMH
    };

    let mut corners = Vec::new();
    let mut corner_start: Option<f64> = None;

    for (&speed, &distance) in series.speed.iter().zip(series.distance.iter()) {
        match corner_start {
            None if speed < threshold => corner_start = Some(distance),
            Some(start) if speed >= threshold => {
                corners.push((start, distance));
                corner_start = None;
            }
            _ => {}
        }
    }

    debug!(count = corners.len(), "detected corners");
    corners
}
