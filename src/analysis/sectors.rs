// ABOUTME: Sector time aggregation and theoretical optimal lap derivation
// ABOUTME: Per-sector mean/min/max plus the best-sectors sum

//! # Sector Analytics
//!
//! Per-sector aggregates for the sector comparison chart, and the
//! theoretical optimal lap: the sum of a driver's best individual sector
//! times, which no real lap may have achieved.

use crate::errors::{AppError, AppResult};
use crate::models::Lap;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    /// Sector index, 1-3
    pub sector: u8,
    /// Mean sector time over laps with a value
    pub mean: f64,
    /// Best sector time
    pub min: f64,
    /// Worst sector time
    pub max: f64,
}

/// Theoretical optimal lap assembled from best sectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalLap {
    /// Best first-sector time
    pub sector1: f64,
    /// Best second-sector time
    pub sector2: f64,
    /// Best third-sector time
    pub sector3: f64,
    /// Sum of the three best sectors
    pub optimal_lap_time: f64,
}

/// Sector values of one lap, by 1-based sector index
fn sector_value(lap: &Lap, sector: u8) -> Option<f64> {
    match sector {
        1 => lap.sector1,
        2 => lap.sector2,
        _ => lap.sector3,
    }
}

/// Aggregate sector times for analysis
///
/// Each sector is aggregated independently over the laps that carry a
/// value for it.
///
/// # Errors
///
/// Returns `InsufficientData` when a sector has no values at all.
pub fn summarize_sectors(laps: &[Lap]) -> AppResult<Vec<SectorSummary>> {
    (1..=3)
        .map(|sector| {
            let values: Vec<f64> = laps.iter().filter_map(|l| sector_value(l, sector)).collect();
            if values.is_empty() {
                return Err(AppError::insufficient_data(format!(
                    "no sector {sector} times available"
                )));
            }
            Ok(SectorSummary {
                sector,
                mean: values.iter().sum::<f64>() / values.len() as f64,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect()
}

/// Find the theoretical optimal lap from best sectors
///
/// # Errors
///
/// Returns `InsufficientData` when any sector has no values.
pub fn optimal_lap(laps: &[Lap]) -> AppResult<OptimalLap> {
    let best = |sector: u8| {
        laps.iter()
            .filter_map(|l| sector_value(l, sector))
            .fold(f64::INFINITY, f64::min)
    };

    let (s1, s2, s3) = (best(1), best(2), best(3));
    if !s1.is_finite() || !s2.is_finite() || !s3.is_finite() {
        return Err(AppError::insufficient_data(
            "optimal lap requires at least one time per sector",
        ));
    }

    Ok(OptimalLap {
        sector1: s1,
        sector2: s2,
        sector3: s3,
        optimal_lap_time: s1 + s2 + s3,
    })
}
