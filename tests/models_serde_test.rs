// ABOUTME: Serde round-trip tests for the wire-visible data models
// ABOUTME: Pins the JSON field names and enum tags the dashboard frontend consumes

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::lap;
use paddock_server::models::{
    Compound, InterventionKind, Lap, PitStop, SafetyCarPeriod, SessionKey, SessionType, Stint,
};

#[test]
fn test_lap_round_trip() {
    let mut original = lap(7, "VER", 91.234, Some(Compound::Intermediate));
    original.sector1 = Some(30.1);
    original.tyre_life = Some(12);
    original.pit_in_time = Some(655.2);

    let json = serde_json::to_string(&original).unwrap();
    let back: Lap = serde_json::from_str(&json).unwrap();

    assert_eq!(back, original);
    assert!(json.contains("\"compound\":\"INTERMEDIATE\""));
    assert!(json.contains("\"lap_number\":7"));
}

#[test]
fn test_pit_stop_round_trip_with_nulls() {
    let original = PitStop::on_lap(14);

    let json = serde_json::to_string(&original).unwrap();
    let back: PitStop = serde_json::from_str(&json).unwrap();

    assert_eq!(back, original);
    assert!(json.contains("\"compound_before\":null"));
}

#[test]
fn test_stint_serializes_compound_tag() {
    let stint = Stint {
        compound: Compound::Soft,
        start_lap: 1,
        end_lap: 5,
        laps: vec![lap(1, "VER", 90.0, Some(Compound::Soft))],
    };

    let json = serde_json::to_value(&stint).unwrap();
    assert_eq!(json["compound"], "SOFT");
    assert_eq!(json["start_lap"], 1);
    assert_eq!(json["end_lap"], 5);
}

#[test]
fn test_safety_car_period_uses_display_tags() {
    let period = SafetyCarPeriod {
        start_lap: 8,
        end_lap: 9,
        kind: InterventionKind::VirtualSafetyCar,
        reason: "VSC DEPLOYED".to_owned(),
    };

    let json = serde_json::to_value(&period).unwrap();
    assert_eq!(json["type"], "VSC");

    let red = serde_json::to_value(SafetyCarPeriod {
        kind: InterventionKind::RedFlag,
        ..period
    })
    .unwrap();
    assert_eq!(red["type"], "Red Flag");
}

#[test]
fn test_session_key_round_trip() {
    let key = SessionKey::new(2024, 5, SessionType::Sprint);

    let json = serde_json::to_string(&key).unwrap();
    let back: SessionKey = serde_json::from_str(&json).unwrap();

    assert_eq!(back, key);
    assert!(json.contains("\"session\":\"sprint\""));
}
