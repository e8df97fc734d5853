// ABOUTME: Shared fixture builders for integration tests
// ABOUTME: Compact constructors for laps, pit stops, and telemetry series

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use paddock_server::models::{Compound, Lap, PitStop, TelemetrySeries};

/// A timed lap with a compound
pub fn lap(lap_number: u32, driver: &str, time: f64, compound: Option<Compound>) -> Lap {
    let mut lap = Lap::timed(lap_number, driver, time);
    lap.compound = compound;
    lap
}

/// A lap without a time (incomplete/deleted)
pub fn untimed_lap(lap_number: u32, driver: &str) -> Lap {
    let mut lap = Lap::timed(lap_number, driver, 0.0);
    lap.time = None;
    lap
}

/// A timed lap with sector times
pub fn lap_with_sectors(lap_number: u32, driver: &str, sectors: (f64, f64, f64)) -> Lap {
    let mut lap = Lap::timed(lap_number, driver, sectors.0 + sectors.1 + sectors.2);
    lap.sector1 = Some(sectors.0);
    lap.sector2 = Some(sectors.1);
    lap.sector3 = Some(sectors.2);
    lap
}

/// A pit stop with only a lap number
pub fn stop(lap: u32) -> PitStop {
    PitStop::on_lap(lap)
}

/// A pit stop with a compound_before
pub fn stop_with_compound(lap: u32, compound: Compound) -> PitStop {
    let mut stop = PitStop::on_lap(lap);
    stop.compound_before = Some(compound);
    stop
}

/// A telemetry series from a speed channel; distance advances 10m per sample
pub fn telemetry_from_speeds(speeds: &[f64]) -> TelemetrySeries {
    let n = speeds.len();
    TelemetrySeries::new(
        (0..n).map(|i| i as f64 * 10.0).collect(),
        speeds.to_vec(),
        vec![100.0; n],
        vec![false; n],
        vec![7; n],
        vec![11000.0; n],
        vec![false; n],
    )
    .unwrap()
}
