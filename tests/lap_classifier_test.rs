// ABOUTME: Integration tests for lap classification, filtering, and pace statistics
// ABOUTME: Covers filter windows, null-time handling, and the statistics definitions

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{lap, untimed_lap};
use paddock_server::analysis::{classify_laps, LapFilter};
use paddock_server::errors::ErrorCode;

const EPS: f64 = 1e-9;

#[test]
fn test_all_filter_is_identity_including_untimed_laps() {
    let laps = vec![
        lap(1, "VER", 92.0, None),
        untimed_lap(2, "VER"),
        lap(3, "VER", 90.0, None),
    ];

    let result = classify_laps(&laps, LapFilter::All).unwrap();

    assert_eq!(result.filtered, laps);
}

#[test]
fn test_fastest_filter_keeps_laps_within_three_percent() {
    // Fastest is 90.0, cutoff ~92.7
    let laps = vec![
        lap(1, "VER", 90.0, None),
        lap(2, "VER", 92.6, None),
        lap(3, "VER", 93.5, None),
        lap(4, "VER", 105.0, None),
    ];

    let result = classify_laps(&laps, LapFilter::Fastest).unwrap();

    let kept: Vec<u32> = result.filtered.iter().map(|l| l.lap_number).collect();
    assert_eq!(kept, vec![1, 2]);
    for lap in &result.filtered {
        assert!(lap.time.unwrap() <= 1.03 * result.stats.fastest_lap + EPS);
    }
}

#[test]
fn test_average_filter_keeps_laps_within_two_percent_of_mean() {
    // Mean of [90, 95, 100, 115] = 100.0, window 98.0..=102.0
    let laps = vec![
        lap(1, "VER", 90.0, None),
        lap(2, "VER", 95.0, None),
        lap(3, "VER", 100.0, None),
        lap(4, "VER", 115.0, None),
    ];

    let result = classify_laps(&laps, LapFilter::Average).unwrap();

    let kept: Vec<u32> = result.filtered.iter().map(|l| l.lap_number).collect();
    assert_eq!(kept, vec![3]);
}

#[test]
fn test_untimed_laps_excluded_from_windows_but_not_statistics_error() {
    let laps = vec![
        lap(1, "VER", 90.0, None),
        untimed_lap(2, "VER"),
        lap(3, "VER", 90.5, None),
    ];

    let fastest = classify_laps(&laps, LapFilter::Fastest).unwrap();
    assert!(fastest.filtered.iter().all(|l| l.time.is_some()));

    let average = classify_laps(&laps, LapFilter::Average).unwrap();
    assert!(average.filtered.iter().all(|l| l.time.is_some()));
}

#[test]
fn test_statistics_definitions() {
    let laps = vec![
        lap(1, "VER", 90.0, None),
        lap(2, "VER", 92.0, None),
        lap(3, "VER", 94.0, None),
        lap(4, "VER", 96.0, None),
    ];

    let stats = classify_laps(&laps, LapFilter::All).unwrap().stats;

    assert!((stats.fastest_lap - 90.0).abs() < EPS);
    assert!((stats.slowest_lap - 96.0).abs() < EPS);
    assert!((stats.mean_pace - 93.0).abs() < EPS);
    // Even count: midpoint of the two middle values
    assert!((stats.median_pace - 93.0).abs() < EPS);
    // Sample std of [90,92,94,96]: sqrt(20/3)
    assert!((stats.std_pace - (20.0_f64 / 3.0).sqrt()).abs() < EPS);
    assert!((stats.coefficient_of_variation - stats.std_pace / 93.0).abs() < EPS);
}

#[test]
fn test_median_for_odd_count() {
    let laps = vec![
        lap(1, "VER", 95.0, None),
        lap(2, "VER", 90.0, None),
        lap(3, "VER", 99.0, None),
    ];

    let stats = classify_laps(&laps, LapFilter::All).unwrap().stats;
    assert!((stats.median_pace - 95.0).abs() < EPS);
}

#[test]
fn test_single_timed_lap_has_zero_std() {
    let laps = vec![lap(1, "VER", 90.0, None)];

    let stats = classify_laps(&laps, LapFilter::All).unwrap().stats;

    assert!((stats.std_pace - 0.0).abs() < f64::EPSILON);
    assert!((stats.fastest_lap - 90.0).abs() < EPS);
}

#[test]
fn test_zero_timed_laps_is_insufficient_data() {
    let laps = vec![untimed_lap(1, "VER"), untimed_lap(2, "VER")];

    let err = classify_laps(&laps, LapFilter::All).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientData);
}

#[test]
fn test_filter_parsing() {
    assert_eq!("all".parse::<LapFilter>().unwrap(), LapFilter::All);
    assert_eq!("FASTEST".parse::<LapFilter>().unwrap(), LapFilter::Fastest);
    assert_eq!("average".parse::<LapFilter>().unwrap(), LapFilter::Average);
    assert!("median".parse::<LapFilter>().is_err());
}
