// ABOUTME: Core data models and types for F1 session, lap, pit-stop, and telemetry data
// ABOUTME: Defines Lap, PitStop, Stint, TelemetrySeries and other fundamental data structures

//! # Data Models
//!
//! This module contains the core data structures used throughout the Paddock
//! server. These models provide a provider-agnostic representation of the
//! timing data an upstream source delivers for one session.
//!
//! ## Design Principles
//!
//! - **Provider Agnostic**: Models abstract away upstream-specific formats
//! - **Optional by default**: timing feeds routinely omit fields (in/out
//!   laps have no compound, deleted laps have no time), so most fields are
//!   `Option`
//! - **Immutable**: once a session is materialized nothing mutates it;
//!   every derivation produces new values
//! - **Serializable**: all models support JSON serialization for the REST
//!   layer

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Tyre compound classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    /// Soft (red-walled) slick
    Soft,
    /// Medium (yellow-walled) slick
    Medium,
    /// Hard (white-walled) slick
    Hard,
    /// Intermediate wet-weather tyre
    Intermediate,
    /// Full wet-weather tyre
    Wet,
}

impl Display for Compound {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Compound {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SOFT" => Ok(Self::Soft),
            "MEDIUM" => Ok(Self::Medium),
            "HARD" => Ok(Self::Hard),
            "INTERMEDIATE" => Ok(Self::Intermediate),
            "WET" => Ok(Self::Wet),
            other => Err(AppError::invalid_input(format!(
                "Unknown tyre compound: '{other}'. Valid options: SOFT, MEDIUM, HARD, INTERMEDIATE, WET"
            ))),
        }
    }
}

/// Session classification within a race weekend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// First free practice
    Fp1,
    /// Second free practice
    Fp2,
    /// Third free practice
    Fp3,
    /// Qualifying
    Qualifying,
    /// Sprint race
    Sprint,
    /// Grand prix
    Race,
}

impl SessionType {
    /// Upstream short code for this session type
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fp1 => "FP1",
            Self::Fp2 => "FP2",
            Self::Fp3 => "FP3",
            Self::Qualifying => "Q",
            Self::Sprint => "S",
            Self::Race => "R",
        }
    }
}

impl Display for SessionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SessionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FP1" => Ok(Self::Fp1),
            "FP2" => Ok(Self::Fp2),
            "FP3" => Ok(Self::Fp3),
            "Q" | "QUALIFYING" => Ok(Self::Qualifying),
            "S" | "SPRINT" => Ok(Self::Sprint),
            "R" | "RACE" => Ok(Self::Race),
            other => Err(AppError::invalid_input(format!(
                "Unknown session type: '{other}'. Valid options: FP1, FP2, FP3, Q, S, R"
            ))),
        }
    }
}

/// Identifies one session of one race weekend
///
/// This is the key the session cache is indexed by: every derivation in the
/// analysis layer operates on the data materialized for exactly one of
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Season year
    pub year: u16,
    /// Race round number within the season
    pub round: u32,
    /// Session type
    pub session: SessionType,
}

impl SessionKey {
    /// Create a new session key
    #[must_use]
    pub const fn new(year: u16, round: u32, session: SessionType) -> Self {
        Self {
            year,
            round,
            session,
        }
    }
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}:{}", self.year, self.round, self.session)
    }
}

/// One lap of one driver as delivered by the timing feed
///
/// Lap numbers are not guaranteed contiguous: the feed drops untimed or
/// deleted laps, and the gap is meaningful (it must survive normalization).
/// All times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Lap number within the session (1-based, gaps possible)
    pub lap_number: u32,
    /// Driver code (e.g. "VER")
    pub driver: String,
    /// Full lap time; `None` for incomplete or deleted laps
    pub time: Option<f64>,
    /// First sector time
    pub sector1: Option<f64>,
    /// Second sector time
    pub sector2: Option<f64>,
    /// Third sector time
    pub sector3: Option<f64>,
    /// Tyre compound; frequently absent on in/out laps
    pub compound: Option<Compound>,
    /// Laps already run on this tyre set
    pub tyre_life: Option<u32>,
    /// Whether the feed marked the lap timing as accurate
    pub is_accurate: bool,
    /// Pit entry timestamp (session time, seconds) if the driver pitted
    /// at the end of this lap
    pub pit_in_time: Option<f64>,
    /// Pit exit timestamp (session time, seconds) if the lap started in
    /// the pit lane
    pub pit_out_time: Option<f64>,
    /// Personal best marker from the feed
    pub is_personal_best: bool,
    /// Raw track status string from the feed, if any
    pub track_status: Option<String>,
}

impl Lap {
    /// Construct a timed lap with only the fields every feed provides;
    /// remaining fields take their neutral defaults.
    #[must_use]
    pub fn timed(lap_number: u32, driver: &str, time: f64) -> Self {
        Self {
            lap_number,
            driver: driver.to_owned(),
            time: Some(time),
            sector1: None,
            sector2: None,
            sector3: None,
            compound: None,
            tyre_life: None,
            is_accurate: true,
            pit_in_time: None,
            pit_out_time: None,
            is_personal_best: false,
            track_status: None,
        }
    }

    /// True when this lap touches the pit lane on either end
    #[must_use]
    pub const fn is_pit_lap(&self) -> bool {
        self.pit_in_time.is_some() || self.pit_out_time.is_some()
    }
}

/// One pit-stop event for one driver
///
/// The upstream feed does not guarantee ordering; callers must sort by
/// `lap` before reconstructing stints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStop {
    /// Lap number the stop is anchored to: the first lap run on the new
    /// tyre set, i.e. the opening lap of the following stint
    pub lap: u32,
    /// Stint index reported by the feed, if any
    pub stint: Option<u32>,
    /// Stationary + pit-lane duration in seconds
    pub pit_duration: Option<f64>,
    /// Lap time recorded with the stop event
    pub lap_time: Option<f64>,
    /// Compound the driver pitted off of
    pub compound_before: Option<Compound>,
    /// Age of the removed tyre set in laps
    pub tyre_life_before: Option<u32>,
}

impl PitStop {
    /// Construct a pit stop with just its in-lap number
    #[must_use]
    pub const fn on_lap(lap: u32) -> Self {
        Self {
            lap,
            stint: None,
            pit_duration: None,
            lap_time: None,
            compound_before: None,
            tyre_life_before: None,
        }
    }
}

/// A contiguous run of laps on one tyre compound, bounded by pit stops
///
/// Stints partition the driver's observed lap range: `start_lap` of stint
/// *i+1* is the pit lap of transition *i* plus one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    /// Compound assigned via the fallback chain
    pub compound: Compound,
    /// First lap of the stint (inclusive)
    pub start_lap: u32,
    /// Last lap of the stint (inclusive)
    pub end_lap: u32,
    /// Laps observed within `[start_lap, end_lap]`; may be empty when a
    /// pit stop was recorded outside the observed lap range
    pub laps: Vec<Lap>,
}

/// Race-control intervention classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InterventionKind {
    /// Full safety car
    #[serde(rename = "Safety Car")]
    SafetyCar,
    /// Virtual safety car
    #[serde(rename = "VSC")]
    VirtualSafetyCar,
    /// Red flag (session suspended)
    #[serde(rename = "Red Flag")]
    RedFlag,
}

impl Display for InterventionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::SafetyCar => "Safety Car",
            Self::VirtualSafetyCar => "VSC",
            Self::RedFlag => "Red Flag",
        };
        write!(f, "{name}")
    }
}

/// A race-control intervention spanning one or more laps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyCarPeriod {
    /// First affected lap
    pub start_lap: u32,
    /// Last affected lap
    pub end_lap: u32,
    /// Intervention classification
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    /// Reason text, usually the originating race-control message
    pub reason: String,
}

/// One race-control message as delivered by the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    /// Lap the message was issued on, when the feed attributes one
    pub lap: Option<u32>,
    /// Raw message text
    pub message: String,
}

/// Per-distance telemetry for one lap, as parallel channel arrays
///
/// Channels are aligned by sample index, not wall-clock time. Use
/// [`TelemetrySeries::new`] to enforce equal channel lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySeries {
    /// Distance from the start line in meters
    pub distance: Vec<f64>,
    /// Speed in km/h
    pub speed: Vec<f64>,
    /// Throttle application in percent
    pub throttle: Vec<f64>,
    /// Brake applied
    pub brake: Vec<bool>,
    /// Selected gear
    pub gear: Vec<u8>,
    /// Engine RPM
    pub rpm: Vec<f64>,
    /// DRS open
    pub drs: Vec<bool>,
}

impl TelemetrySeries {
    /// Build a series, validating that every channel has the same length
    ///
    /// # Errors
    ///
    /// Returns `MalformedTelemetry` if any channel length differs from the
    /// distance channel.
    pub fn new(
        distance: Vec<f64>,
        speed: Vec<f64>,
        throttle: Vec<f64>,
        brake: Vec<bool>,
        gear: Vec<u8>,
        rpm: Vec<f64>,
        drs: Vec<bool>,
    ) -> Result<Self, AppError> {
        let n = distance.len();
        if [
            speed.len(),
            throttle.len(),
            brake.len(),
            gear.len(),
            rpm.len(),
            drs.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(AppError::malformed_telemetry(format!(
                "telemetry channels disagree on length (distance has {n} samples)"
            )));
        }
        Ok(Self {
            distance,
            speed,
            throttle,
            brake,
            gear,
            rpm,
            drs,
        })
    }

    /// Number of samples in the series
    #[must_use]
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    /// True when the series holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }
}

/// One race of a season's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceInfo {
    /// Round number within the season
    pub round: u32,
    /// Official event name
    pub race_name: String,
    /// Host country
    pub country: String,
    /// Circuit location name
    pub circuit: String,
    /// Event date, `YYYY-MM-DD`
    pub date: String,
}

/// A driver participating in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Three-letter driver code
    pub code: String,
    /// Full name
    pub name: String,
    /// Car number as displayed
    pub number: String,
}

/// Circuit geometry extracted from position telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitLayout {
    /// X coordinates along the racing line
    pub x: Vec<f64>,
    /// Y coordinates along the racing line
    pub y: Vec<f64>,
    /// Distance along the lap, normalized to start at zero
    pub distance: Vec<f64>,
}

/// Everything the upstream provider materializes for one session
///
/// This is the unit the session cache stores. Laps for all drivers live in
/// one flat list; per-driver views are produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// The key this session was loaded for
    pub key: SessionKey,
    /// Official event name
    pub event_name: String,
    /// Drivers observed in the session
    pub drivers: Vec<DriverInfo>,
    /// All laps for all drivers
    pub laps: Vec<Lap>,
    /// Pit-stop events keyed by driver code; empty lists are normal (a
    /// race without stops), and ordering within a list is not guaranteed
    pub pit_stops: std::collections::HashMap<String, Vec<PitStop>>,
    /// Race-control messages for safety-car derivation
    pub race_control: Vec<RaceControlMessage>,
}
