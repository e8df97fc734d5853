// ABOUTME: Integration tests for lap normalization, cleaning, and pit-stop derivation
// ABOUTME: Covers gap preservation, duplicate handling, and the cleaning filters

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{lap, untimed_lap};
use paddock_server::analysis::{clean_laps, laps_for_driver, normalize_laps, pit_stops_from_laps};
use paddock_server::models::Compound;

#[test]
fn test_normalization_orders_by_lap_number_preserving_gaps() {
    let laps = vec![
        lap(7, "VER", 90.7, None),
        lap(2, "VER", 90.2, None),
        lap(5, "VER", 90.5, None),
    ];

    let normalized = normalize_laps(laps);

    let numbers: Vec<u32> = normalized.iter().map(|l| l.lap_number).collect();
    // Gaps (3, 4, 6) stay gaps; nothing is re-indexed
    assert_eq!(numbers, vec![2, 5, 7]);
}

#[test]
fn test_normalization_drops_duplicate_lap_numbers_keeping_first() {
    let mut first = lap(3, "VER", 90.0, Some(Compound::Soft));
    first.tyre_life = Some(3);
    let duplicate = lap(3, "VER", 95.0, Some(Compound::Hard));

    let normalized = normalize_laps(vec![first.clone(), duplicate]);

    assert_eq!(normalized.len(), 1);
    assert_eq!(normalized[0], first);
}

#[test]
fn test_cleaning_removes_untimed_inaccurate_and_pit_laps() {
    let mut inaccurate = lap(2, "VER", 91.0, None);
    inaccurate.is_accurate = false;
    let mut in_lap = lap(3, "VER", 108.0, None);
    in_lap.pit_in_time = Some(290.0);
    let mut out_lap = lap(4, "VER", 95.0, None);
    out_lap.pit_out_time = Some(310.0);

    let laps = vec![
        lap(1, "VER", 90.0, None),
        inaccurate,
        in_lap,
        out_lap,
        untimed_lap(5, "VER"),
        lap(6, "VER", 90.4, None),
    ];

    let cleaned = clean_laps(&laps);

    let numbers: Vec<u32> = cleaned.iter().map(|l| l.lap_number).collect();
    assert_eq!(numbers, vec![1, 6]);
}

#[test]
fn test_driver_filter_is_case_insensitive_and_normalizes() {
    let laps = vec![
        lap(2, "VER", 90.2, None),
        lap(1, "ver", 90.1, None),
        lap(1, "HAM", 91.0, None),
    ];

    let ver_laps = laps_for_driver(&laps, "Ver");

    assert_eq!(ver_laps.len(), 2);
    assert_eq!(ver_laps[0].lap_number, 1);
    assert_eq!(ver_laps[1].lap_number, 2);
}

#[test]
fn test_pit_stops_derived_from_in_laps() {
    let mut in_lap1 = lap(5, "VER", 108.0, Some(Compound::Soft));
    in_lap1.pit_in_time = Some(470.0);
    in_lap1.tyre_life = Some(5);
    let mut in_lap2 = lap(30, "VER", 109.5, Some(Compound::Hard));
    in_lap2.pit_in_time = Some(2780.0);

    let laps = vec![
        lap(1, "VER", 90.0, Some(Compound::Soft)),
        in_lap2.clone(),
        in_lap1.clone(),
        lap(6, "VER", 93.0, Some(Compound::Hard)),
    ];

    let stops = pit_stops_from_laps(&laps);

    assert_eq!(stops.len(), 2);
    // Anchored to the lap after each in-lap, sorted regardless of input order
    assert_eq!(stops[0].lap, 6);
    assert_eq!(stops[0].compound_before, Some(Compound::Soft));
    assert_eq!(stops[0].tyre_life_before, Some(5));
    assert_eq!(stops[0].lap_time, Some(108.0));
    assert_eq!(stops[1].lap, 31);
    assert_eq!(stops[1].compound_before, Some(Compound::Hard));
}

#[test]
fn test_no_pit_laps_yields_empty_stop_list() {
    let laps = vec![lap(1, "VER", 90.0, None), lap(2, "VER", 90.1, None)];
    assert!(pit_stops_from_laps(&laps).is_empty());
}
