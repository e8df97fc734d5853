// ABOUTME: Integration tests for the driver comparison engine and lap deltas
// ABOUTME: Covers the worked example, antisymmetry, pairing rules, and error taxonomy

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{lap, lap_with_sectors, untimed_lap};
use paddock_server::analysis::{compare_drivers, lap_deltas};
use paddock_server::errors::ErrorCode;
use paddock_server::models::Lap;

const EPS: f64 = 1e-9;

fn times(driver: &str, values: &[(u32, f64)]) -> Vec<Lap> {
    values.iter().map(|&(n, t)| lap(n, driver, t, None)).collect()
}

#[test]
fn test_spec_worked_example() {
    // driver1 [90, 91], driver2 [92, 90] paired by lap:
    // avg_gap = 90.5 - 91 = -0.5, one faster lap each
    let laps1 = times("VER", &[(1, 90.0), (2, 91.0)]);
    let laps2 = times("HAM", &[(1, 92.0), (2, 90.0)]);

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    assert!((comparison.avg_gap - (-0.5)).abs() < EPS);
    assert_eq!(comparison.driver1_faster_laps, 1);
    assert_eq!(comparison.driver2_faster_laps, 1);
    assert_eq!(comparison.driver1, "VER");
    assert_eq!(comparison.driver2, "HAM");
}

#[test]
fn test_avg_gap_is_antisymmetric() {
    let laps1 = times("VER", &[(1, 90.0), (2, 91.3), (3, 89.8)]);
    let laps2 = times("HAM", &[(1, 90.4), (2, 90.9), (3, 90.2)]);

    let forward = compare_drivers(&laps1, &laps2).unwrap();
    let backward = compare_drivers(&laps2, &laps1).unwrap();

    assert!((forward.avg_gap + backward.avg_gap).abs() < EPS);
    assert!((forward.fastest_lap_gap + backward.fastest_lap_gap).abs() < EPS);
    assert!((forward.sector1_gap + backward.sector1_gap).abs() < EPS);
    assert_eq!(forward.driver1_faster_laps, backward.driver2_faster_laps);
}

#[test]
fn test_unpaired_laps_are_excluded_from_paired_metrics() {
    // Lap 3 exists only for driver1 and must not move avg_gap
    let laps1 = times("VER", &[(1, 90.0), (2, 91.0), (3, 150.0)]);
    let laps2 = times("HAM", &[(1, 92.0), (2, 90.0)]);

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    assert!((comparison.avg_gap - (-0.5)).abs() < EPS);
    assert_eq!(
        comparison.driver1_faster_laps + comparison.driver2_faster_laps,
        2
    );
}

#[test]
fn test_fastest_lap_gap_uses_each_drivers_full_lap_set() {
    // Driver1's overall fastest (lap 3) has no pair; it still counts for
    // the fastest-lap gap
    let laps1 = times("VER", &[(1, 90.0), (3, 88.5)]);
    let laps2 = times("HAM", &[(1, 89.9)]);

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    assert!((comparison.fastest_lap_gap - (88.5 - 89.9)).abs() < EPS);
}

#[test]
fn test_sector_gaps_per_sector_over_paired_laps() {
    let laps1 = vec![
        lap_with_sectors(1, "VER", (28.0, 31.0, 30.0)),
        lap_with_sectors(2, "VER", (28.2, 31.2, 30.2)),
    ];
    let laps2 = vec![
        lap_with_sectors(1, "HAM", (28.5, 30.5, 30.0)),
        lap_with_sectors(2, "HAM", (28.7, 30.7, 30.2)),
    ];

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    assert!((comparison.sector1_gap - (-0.5)).abs() < EPS);
    assert!((comparison.sector2_gap - 0.5).abs() < EPS);
    assert!(comparison.sector3_gap.abs() < EPS);
}

#[test]
fn test_missing_sectors_report_zero_gap() {
    let laps1 = times("VER", &[(1, 90.0)]);
    let laps2 = times("HAM", &[(1, 91.0)]);

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    assert!(comparison.sector1_gap.abs() < EPS);
    assert!(comparison.sector2_gap.abs() < EPS);
    assert!(comparison.sector3_gap.abs() < EPS);
}

#[test]
fn test_consistency_is_sample_std_of_each_driver() {
    let laps1 = times("VER", &[(1, 90.0), (2, 92.0)]);
    let laps2 = times("HAM", &[(1, 91.0), (2, 91.0)]);

    let comparison = compare_drivers(&laps1, &laps2).unwrap();

    // Sample std of [90, 92] is sqrt(2)
    assert!((comparison.driver1_consistency - 2.0_f64.sqrt()).abs() < EPS);
    assert!(comparison.driver2_consistency.abs() < EPS);
}

#[test]
fn test_no_shared_laps_is_no_comparable_laps() {
    let laps1 = times("VER", &[(1, 90.0), (2, 90.5)]);
    let laps2 = times("HAM", &[(3, 91.0), (4, 91.5)]);

    let err = compare_drivers(&laps1, &laps2).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoComparableLaps);
}

#[test]
fn test_driver_without_timed_laps_is_insufficient_data() {
    let laps1 = times("VER", &[(1, 90.0)]);
    let laps2 = vec![untimed_lap(1, "HAM")];

    let err = compare_drivers(&laps1, &laps2).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

#[test]
fn test_lap_deltas_over_common_laps() {
    let laps1 = times("VER", &[(1, 90.0), (2, 91.0), (5, 92.0)]);
    let laps2 = times("HAM", &[(1, 90.5), (2, 90.2), (6, 93.0)]);

    let deltas = lap_deltas(&laps1, &laps2);

    assert_eq!(deltas.len(), 2);
    assert_eq!(deltas[0].lap_number, 1);
    assert!((deltas[0].delta - (-0.5)).abs() < EPS);
    assert_eq!(deltas[1].lap_number, 2);
    assert!((deltas[1].delta - 0.8).abs() < EPS);
}
