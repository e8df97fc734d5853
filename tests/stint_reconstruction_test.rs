// ABOUTME: Integration tests for tyre stint reconstruction
// ABOUTME: Covers partition properties, the compound fallback chain, and malformed stop handling

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{lap, stop, stop_with_compound};
use paddock_server::analysis::{analyze_degradation, reconstruct_stints};
use paddock_server::models::{Compound, PitStop};

#[test]
fn test_no_pit_stops_yields_single_stint_spanning_lap_range() {
    let laps = vec![
        lap(2, "VER", 90.1, Some(Compound::Soft)),
        lap(3, "VER", 90.3, Some(Compound::Soft)),
        lap(7, "VER", 90.6, Some(Compound::Soft)),
    ];

    let stints = reconstruct_stints(&laps, &[]).unwrap();

    assert_eq!(stints.len(), 1);
    assert_eq!(stints[0].start_lap, 2);
    assert_eq!(stints[0].end_lap, 7);
    assert_eq!(stints[0].compound, Compound::Soft);
    assert_eq!(stints[0].laps.len(), 3);
}

#[test]
fn test_no_pit_stops_and_no_compound_defaults_to_medium() {
    let laps = vec![lap(1, "VER", 90.0, None), lap(2, "VER", 90.2, None)];

    let stints = reconstruct_stints(&laps, &[]).unwrap();

    assert_eq!(stints.len(), 1);
    assert_eq!(stints[0].compound, Compound::Medium);
}

#[test]
fn test_spec_scenario_compound_from_first_lap_of_next_stint() {
    // laps [{1,90.0,SOFT},{2,89.5,SOFT},{3,91.2,MEDIUM}] with a stop on
    // lap 3 reconstructs to [{SOFT,1,2},{MEDIUM,3,3}]
    let laps = vec![
        lap(1, "VER", 90.0, Some(Compound::Soft)),
        lap(2, "VER", 89.5, Some(Compound::Soft)),
        lap(3, "VER", 91.2, Some(Compound::Medium)),
    ];
    let stops = vec![stop_with_compound(3, Compound::Soft)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 2);
    assert_eq!(
        (stints[0].compound, stints[0].start_lap, stints[0].end_lap),
        (Compound::Soft, 1, 2)
    );
    assert_eq!(
        (stints[1].compound, stints[1].start_lap, stints[1].end_lap),
        (Compound::Medium, 3, 3)
    );
}

#[test]
fn test_stints_partition_the_lap_range_without_overlap() {
    let laps: Vec<_> = (1..=20)
        .map(|n| lap(n, "VER", 91.0, Some(Compound::Hard)))
        .collect();
    let stops = vec![stop(6), stop(13)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 3);
    // Contiguous and non-overlapping, covering [1, 20]
    assert_eq!(stints[0].start_lap, 1);
    for window in stints.windows(2) {
        assert_eq!(window[0].end_lap + 1, window[1].start_lap);
    }
    assert_eq!(stints.last().unwrap().end_lap, 20);
}

#[test]
fn test_unsorted_pit_stops_are_sorted_before_use() {
    let laps: Vec<_> = (1..=12)
        .map(|n| lap(n, "VER", 91.0, Some(Compound::Medium)))
        .collect();
    let stops = vec![stop(9), stop(4)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 3);
    assert_eq!((stints[0].start_lap, stints[0].end_lap), (1, 3));
    assert_eq!((stints[1].start_lap, stints[1].end_lap), (4, 8));
    assert_eq!((stints[2].start_lap, stints[2].end_lap), (9, 12));
}

#[test]
fn test_stop_before_any_laps_is_suppressed_not_degenerate() {
    let laps: Vec<_> = (5..=10)
        .map(|n| lap(n, "VER", 91.0, Some(Compound::Soft)))
        .collect();
    // In-lap recorded on the first observed lap: nothing precedes it
    let stops = vec![stop(5)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 1);
    assert_eq!((stints[0].start_lap, stints[0].end_lap), (5, 10));
}

#[test]
fn test_compound_fallback_to_previous_stop_compound_before() {
    let laps: Vec<_> = (1..=8).map(|n| lap(n, "VER", 91.0, None)).collect();
    let stops = vec![
        stop_with_compound(3, Compound::Soft),
        stop_with_compound(6, Compound::Medium),
    ];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 3);
    // No lap compounds anywhere: first stint bottoms out at MEDIUM, the
    // middle stint inherits the previous stop's compound_before, and the
    // final stint takes the last stop's compound_before
    assert_eq!(stints[0].compound, Compound::Medium);
    assert_eq!(stints[1].compound, Compound::Soft);
    assert_eq!(stints[2].compound, Compound::Medium);
}

#[test]
fn test_terminal_defaults_are_medium_then_hard() {
    // The no-stop default (MEDIUM) and the final-stint default (HARD)
    // differ on purpose
    let laps: Vec<_> = (1..=6).map(|n| lap(n, "VER", 91.0, None)).collect();

    let without_stops = reconstruct_stints(&laps, &[]).unwrap();
    assert_eq!(without_stops[0].compound, Compound::Medium);

    let with_stop = reconstruct_stints(&laps, &[stop(4)]).unwrap();
    assert_eq!(with_stop.len(), 2);
    assert_eq!(with_stop[0].compound, Compound::Medium);
    assert_eq!(with_stop[1].compound, Compound::Hard);
}

#[test]
fn test_malformed_stops_are_skipped_best_effort() {
    let laps: Vec<_> = (1..=10)
        .map(|n| lap(n, "VER", 91.0, Some(Compound::Hard)))
        .collect();
    // Lap 0 and a duplicate of lap 5 are malformed; the valid stop on
    // lap 5 must still partition the range
    let stops = vec![PitStop::on_lap(0), stop(5), stop(5)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    assert_eq!(stints.len(), 2);
    assert_eq!((stints[0].start_lap, stints[0].end_lap), (1, 4));
    assert_eq!((stints[1].start_lap, stints[1].end_lap), (5, 10));
}

#[test]
fn test_stop_outside_observed_range_is_tolerated() {
    let laps: Vec<_> = (1..=10)
        .map(|n| lap(n, "VER", 91.0, Some(Compound::Soft)))
        .collect();
    let stops = vec![stop(40)];

    let stints = reconstruct_stints(&laps, &stops).unwrap();

    // The stint is recorded with its lap-number bounds even though no
    // laps exist past 10
    assert_eq!(stints.len(), 1);
    assert_eq!((stints[0].start_lap, stints[0].end_lap), (1, 39));
    assert_eq!(stints[0].laps.len(), 10);
}

#[test]
fn test_no_laps_reconstructs_to_nothing() {
    assert!(reconstruct_stints(&[], &[]).unwrap().is_empty());
    assert!(reconstruct_stints(&[], &[stop(5)]).unwrap().is_empty());
}

#[test]
fn test_degradation_per_stint() {
    let laps = vec![
        lap(1, "VER", 90.0, Some(Compound::Soft)),
        lap(2, "VER", 90.5, Some(Compound::Soft)),
        lap(3, "VER", 91.0, Some(Compound::Soft)),
        lap(4, "VER", 91.5, Some(Compound::Soft)),
    ];
    let stints = reconstruct_stints(&laps, &[]).unwrap();

    let degradation = analyze_degradation(&stints);

    assert_eq!(degradation.len(), 1);
    let d = &degradation[0];
    assert_eq!(d.compound, Compound::Soft);
    assert_eq!(d.stint_length, 4);
    assert!((d.avg_lap_time - 90.75).abs() < 1e-9);
    // (91.5 - 90.0) / 4 laps
    assert!((d.degradation_per_lap - 0.375).abs() < 1e-9);
    assert_eq!(d.first_lap_time, Some(90.0));
    assert_eq!(d.last_lap_time, Some(91.5));
}

#[test]
fn test_degradation_zero_for_single_lap_stint() {
    let laps = vec![lap(1, "VER", 90.0, Some(Compound::Wet))];
    let stints = reconstruct_stints(&laps, &[]).unwrap();

    let degradation = analyze_degradation(&stints);

    assert_eq!(degradation.len(), 1);
    assert!((degradation[0].degradation_per_lap - 0.0).abs() < f64::EPSILON);
}
