// ABOUTME: Synthetic timing provider for development and testing
// ABOUTME: Serves preloaded deterministic session fixtures without any network access

//! # Synthetic Timing Provider
//!
//! A provider preloaded with fixture data. Unlike the HTTP provider it:
//!
//! - requires no network and no upstream availability
//! - returns the same data on every call, so tests have stable oracles
//! - can be started via `paddock-server --synthetic` for frontend work
//!   against a known session
//!
//! Fixtures are hand-written constants rather than generated data so a
//! failing assertion points at a number a human can check.

use crate::errors::{AppError, AppResult};
use crate::models::{
    CircuitLayout, Compound, DriverInfo, Lap, PitStop, RaceControlMessage, RaceInfo, SessionData,
    SessionKey, SessionType, TelemetrySeries,
};
use crate::providers::core::TimingProvider;
use async_trait::async_trait;
use std::collections::HashMap;

/// Synthetic timing provider serving preloaded sessions
pub struct SyntheticProvider {
    schedule: Vec<RaceInfo>,
    sessions: HashMap<SessionKey, SessionData>,
    telemetry: HashMap<(SessionKey, String, u32), TelemetrySeries>,
    layouts: HashMap<SessionKey, CircuitLayout>,
}

impl SyntheticProvider {
    /// Create an empty provider; every lookup will return `not found`
    #[must_use]
    pub fn new() -> Self {
        Self {
            schedule: Vec::new(),
            sessions: HashMap::new(),
            telemetry: HashMap::new(),
            layouts: HashMap::new(),
        }
    }

    /// Create a provider preloaded with the given sessions
    #[must_use]
    pub fn with_sessions(sessions: Vec<SessionData>) -> Self {
        let mut provider = Self::new();
        for session in sessions {
            provider.sessions.insert(session.key, session);
        }
        provider
    }

    /// Replace the season schedule
    #[must_use]
    pub fn with_schedule(mut self, schedule: Vec<RaceInfo>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Attach a telemetry fixture for one driver's lap
    #[must_use]
    pub fn with_lap_telemetry(
        mut self,
        key: SessionKey,
        driver: &str,
        lap: u32,
        series: TelemetrySeries,
    ) -> Self {
        self.telemetry.insert((key, driver.to_owned(), lap), series);
        self
    }

    /// Attach a circuit layout fixture for a session
    #[must_use]
    pub fn with_circuit_layout(mut self, key: SessionKey, layout: CircuitLayout) -> Self {
        self.layouts.insert(key, layout);
        self
    }

    /// A complete demo race: two drivers, ten laps, one stop each
    ///
    /// Used by `--synthetic` mode and as a shared baseline in tests. Lap
    /// times tell a simple story: VER one-stops on lap 5 soft-to-hard,
    /// NOR one-stops on lap 6 medium-to-hard, both lose ~18s on the
    /// in-lap, and laps 8-9 run behind a safety car.
    #[must_use]
    pub fn demo() -> Self {
        let key = SessionKey::new(2025, 23, SessionType::Race);
        let session = demo_session(key);
        let schedule = vec![RaceInfo {
            round: 23,
            race_name: "Qatar Grand Prix".to_owned(),
            country: "Qatar".to_owned(),
            circuit: "Lusail".to_owned(),
            date: "2025-11-30".to_owned(),
        }];

        Self::with_sessions(vec![session])
            .with_schedule(schedule)
            .with_lap_telemetry(key, "VER", 4, demo_telemetry(0.0))
            .with_lap_telemetry(key, "NOR", 4, demo_telemetry(-4.0))
            .with_circuit_layout(key, demo_layout())
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimingProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn race_schedule(&self, year: u16) -> AppResult<Vec<RaceInfo>> {
        if self.schedule.is_empty() && self.sessions.keys().all(|k| k.year != year) {
            return Err(AppError::not_found(format!("schedule for season {year}")));
        }
        Ok(self.schedule.clone())
    }

    async fn load_session(&self, key: &SessionKey) -> AppResult<SessionData> {
        self.sessions
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("session {key}")))
    }

    async fn lap_telemetry(
        &self,
        key: &SessionKey,
        driver: &str,
        lap: u32,
    ) -> AppResult<TelemetrySeries> {
        self.telemetry
            .get(&(*key, driver.to_owned(), lap))
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("telemetry for {driver} lap {lap} in {key}")))
    }

    async fn circuit_geometry(&self, key: &SessionKey) -> AppResult<CircuitLayout> {
        self.layouts
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("circuit layout for {key}")))
    }
}

/// Build the demo race session
fn demo_session(key: SessionKey) -> SessionData {
    let drivers = vec![
        DriverInfo {
            code: "VER".to_owned(),
            name: "Max Verstappen".to_owned(),
            number: "1".to_owned(),
        },
        DriverInfo {
            code: "NOR".to_owned(),
            name: "Lando Norris".to_owned(),
            number: "4".to_owned(),
        },
    ];

    // (lap, time, s1, s2, s3, compound, tyre_life, pit_in, pit_out)
    let ver_laps = [
        (1, 92.1, 30.8, 30.6, 30.7, Compound::Soft, 1, false, false),
        (2, 90.4, 30.1, 30.2, 30.1, Compound::Soft, 2, false, false),
        (3, 90.2, 30.0, 30.1, 30.1, Compound::Soft, 3, false, false),
        (4, 90.0, 30.0, 30.0, 30.0, Compound::Soft, 4, false, false),
        (5, 108.3, 30.2, 30.4, 47.7, Compound::Soft, 5, true, false),
        (6, 93.5, 31.2, 31.1, 31.2, Compound::Hard, 1, false, true),
        (7, 91.0, 30.3, 30.3, 30.4, Compound::Hard, 2, false, false),
        (8, 131.8, 44.0, 43.9, 43.9, Compound::Hard, 3, false, false),
        (9, 132.4, 44.1, 44.2, 44.1, Compound::Hard, 4, false, false),
        (10, 90.8, 30.2, 30.3, 30.3, Compound::Hard, 5, false, false),
    ];
    let nor_laps = [
        (1, 92.8, 31.0, 30.9, 30.9, Compound::Medium, 1, false, false),
        (2, 91.1, 30.4, 30.3, 30.4, Compound::Medium, 2, false, false),
        (3, 90.9, 30.3, 30.3, 30.3, Compound::Medium, 3, false, false),
        (4, 90.6, 30.2, 30.2, 30.2, Compound::Medium, 4, false, false),
        (5, 90.7, 30.2, 30.3, 30.2, Compound::Medium, 5, false, false),
        (6, 109.0, 30.5, 30.6, 47.9, Compound::Medium, 6, true, false),
        (7, 93.9, 31.4, 31.2, 31.3, Compound::Hard, 1, false, true),
        (8, 132.0, 44.0, 44.0, 44.0, Compound::Hard, 2, false, false),
        (9, 132.9, 44.3, 44.3, 44.3, Compound::Hard, 3, false, false),
        (10, 91.3, 30.4, 30.4, 30.5, Compound::Hard, 4, false, false),
    ];

    let mut laps = Vec::new();
    for (driver, rows) in [("VER", &ver_laps), ("NOR", &nor_laps)] {
        for &(lap_number, time, s1, s2, s3, compound, tyre_life, pit_in, pit_out) in rows {
            let mut lap = Lap::timed(lap_number, driver, time);
            lap.sector1 = Some(s1);
            lap.sector2 = Some(s2);
            lap.sector3 = Some(s3);
            lap.compound = Some(compound);
            lap.tyre_life = Some(tyre_life);
            if pit_in {
                lap.pit_in_time = Some(f64::from(lap_number) * 95.0);
                lap.is_accurate = false;
            }
            if pit_out {
                lap.pit_out_time = Some(f64::from(lap_number - 1) * 95.0 + 22.0);
                lap.is_accurate = false;
            }
            laps.push(lap);
        }
    }

    // Stops are anchored to the out-lap, the first lap of the new stint
    let mut pit_stops = HashMap::new();
    pit_stops.insert(
        "VER".to_owned(),
        vec![PitStop {
            lap: 6,
            stint: Some(1),
            pit_duration: Some(22.1),
            lap_time: Some(108.3),
            compound_before: Some(Compound::Soft),
            tyre_life_before: Some(5),
        }],
    );
    pit_stops.insert(
        "NOR".to_owned(),
        vec![PitStop {
            lap: 7,
            stint: Some(1),
            pit_duration: Some(22.6),
            lap_time: Some(109.0),
            compound_before: Some(Compound::Medium),
            tyre_life_before: Some(6),
        }],
    );

    let race_control = vec![
        RaceControlMessage {
            lap: Some(8),
            message: "SAFETY CAR DEPLOYED".to_owned(),
        },
        RaceControlMessage {
            lap: Some(9),
            message: "SAFETY CAR IN THIS LAP".to_owned(),
        },
    ];

    SessionData {
        key,
        event_name: "Qatar Grand Prix".to_owned(),
        drivers,
        laps,
        pit_stops,
        race_control,
    }
}

/// Straight-then-corner speed profile, shifted by `speed_offset` km/h
fn demo_telemetry(speed_offset: f64) -> TelemetrySeries {
    let distance: Vec<f64> = (0..12).map(|i| f64::from(i) * 50.0).collect();
    let base = [
        210.0, 245.0, 278.0, 301.0, 312.0, 318.0, 254.0, 187.0, 142.0, 178.0, 226.0, 265.0,
    ];
    let speed: Vec<f64> = base.iter().map(|s| s + speed_offset).collect();
    let throttle: Vec<f64> = base
        .iter()
        .map(|&s| if s > 250.0 { 100.0 } else { 45.0 })
        .collect();
    let brake: Vec<bool> = base.iter().map(|&s| s < 200.0).collect();
    let gear: Vec<u8> = base
        .iter()
        .map(|&s| if s > 280.0 { 8 } else if s > 200.0 { 6 } else { 4 })
        .collect();
    let rpm: Vec<f64> = base.iter().map(|&s| s * 38.0).collect();
    let drs: Vec<bool> = base.iter().map(|&s| s > 300.0).collect();

    // Channel lengths are equal by construction
    TelemetrySeries {
        distance,
        speed,
        throttle,
        brake,
        gear,
        rpm,
        drs,
    }
}

/// A rounded-rectangle circuit outline
fn demo_layout() -> CircuitLayout {
    let x = vec![0.0, 400.0, 800.0, 1000.0, 1000.0, 600.0, 200.0, 0.0];
    let y = vec![0.0, 0.0, 100.0, 400.0, 800.0, 900.0, 700.0, 300.0];
    let mut distance = Vec::with_capacity(x.len());
    let mut total = 0.0;
    for i in 0..x.len() {
        if i > 0 {
            let dx: f64 = x[i] - x[i - 1];
            let dy: f64 = y[i] - y[i - 1];
            total += dx.hypot(dy);
        }
        distance.push(total);
    }
    CircuitLayout { x, y, distance }
}
