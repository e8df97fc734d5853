// ABOUTME: Integration tests for the synthetic provider's demo fixtures
// ABOUTME: Verifies the demo session supports every derivation the routes need

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use paddock_server::analysis::{
    clean_laps, compare_drivers, derive_safety_car_periods, laps_for_driver, reconstruct_stints,
};
use paddock_server::models::{Compound, InterventionKind, SessionKey, SessionType};
use paddock_server::providers::{SyntheticProvider, TimingProvider};

fn demo_key() -> SessionKey {
    SessionKey::new(2025, 23, SessionType::Race)
}

#[tokio::test]
async fn test_demo_session_shape() {
    let provider = SyntheticProvider::demo();
    let session = provider.load_session(&demo_key()).await.unwrap();

    assert_eq!(session.event_name, "Qatar Grand Prix");
    assert_eq!(session.drivers.len(), 2);
    assert_eq!(session.laps.len(), 20);
    assert!(session.pit_stops.contains_key("VER"));
    assert!(session.pit_stops.contains_key("NOR"));
}

#[tokio::test]
async fn test_demo_schedule() {
    let provider = SyntheticProvider::demo();
    let schedule = provider.race_schedule(2025).await.unwrap();

    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].round, 23);
    assert_eq!(schedule[0].date, "2025-11-30");
}

#[tokio::test]
async fn test_demo_stints_reconstruct_as_one_stoppers() {
    let provider = SyntheticProvider::demo();
    let session = provider.load_session(&demo_key()).await.unwrap();

    let ver_laps = laps_for_driver(&session.laps, "VER");
    let stints = reconstruct_stints(&ver_laps, &session.pit_stops["VER"]).unwrap();

    assert_eq!(stints.len(), 2);
    assert_eq!(stints[0].compound, Compound::Soft);
    assert_eq!(stints[1].compound, Compound::Hard);
    assert_eq!(stints.last().unwrap().end_lap, 10);
}

#[tokio::test]
async fn test_demo_safety_car_on_laps_eight_and_nine() {
    let provider = SyntheticProvider::demo();
    let session = provider.load_session(&demo_key()).await.unwrap();

    let periods = derive_safety_car_periods(&session.race_control, &session.laps);

    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].kind, InterventionKind::SafetyCar);
    assert_eq!((periods[0].start_lap, periods[0].end_lap), (8, 9));
}

#[tokio::test]
async fn test_demo_drivers_are_comparable() {
    let provider = SyntheticProvider::demo();
    let session = provider.load_session(&demo_key()).await.unwrap();

    let ver = clean_laps(&laps_for_driver(&session.laps, "VER"));
    let nor = clean_laps(&laps_for_driver(&session.laps, "NOR"));

    let comparison = compare_drivers(&ver, &nor).unwrap();
    // VER is quicker across the demo race
    assert!(comparison.avg_gap < 0.0);
    assert!(comparison.fastest_lap_gap < 0.0);
}

#[tokio::test]
async fn test_demo_telemetry_fixtures_align() {
    let provider = SyntheticProvider::demo();

    let ver = provider.lap_telemetry(&demo_key(), "VER", 4).await.unwrap();
    let nor = provider.lap_telemetry(&demo_key(), "NOR", 4).await.unwrap();

    assert_eq!(ver.len(), nor.len());
    // NOR's fixture runs a constant 4 km/h down on VER's
    for (a, b) in ver.speed.iter().zip(nor.speed.iter()) {
        assert!((a - b - 4.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_demo_circuit_layout_distances_are_monotonic() {
    let provider = SyntheticProvider::demo();
    let layout = provider.circuit_geometry(&demo_key()).await.unwrap();

    assert_eq!(layout.x.len(), layout.y.len());
    assert_eq!(layout.x.len(), layout.distance.len());
    assert!((layout.distance[0] - 0.0).abs() < f64::EPSILON);
    for window in layout.distance.windows(2) {
        assert!(window[0] < window[1]);
    }
}

#[tokio::test]
async fn test_empty_provider_returns_not_found() {
    let provider = SyntheticProvider::new();

    assert!(provider.load_session(&demo_key()).await.is_err());
    assert!(provider.race_schedule(2025).await.is_err());
    assert!(provider.lap_telemetry(&demo_key(), "VER", 1).await.is_err());
    assert!(provider.circuit_geometry(&demo_key()).await.is_err());
}
