// ABOUTME: Safety car, VSC, and red flag period derivation from race-control messages
// ABOUTME: Falls back to lap-time anomaly detection when no messages carry intervention text

//! # Safety-Car Derivation
//!
//! Race-control messages are the primary evidence for interventions:
//! message text is classified into red flag / safety car / VSC, in that
//! precedence order (a red-flag message also mentioning the safety car is
//! a red flag). When the feed carries no classifiable messages at all,
//! laps markedly slower than a driver's median are flagged instead, which
//! catches interventions the message feed missed but never overrides it.
//!
//! Single-lap incidents on adjacent laps of the same kind are merged into
//! one `[start_lap, end_lap]` period.

use crate::constants::analysis::{ANOMALY_MEDIAN_FACTOR, ANOMALY_MIN_LAPS};
use crate::models::{InterventionKind, Lap, RaceControlMessage, SafetyCarPeriod};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Derive safety car, VSC, and red flag periods for a session
///
/// Pass-through annotation: the output is attached to lap-time charts but
/// transforms nothing else.
#[must_use]
pub fn derive_safety_car_periods(
    messages: &[RaceControlMessage],
    laps: &[Lap],
) -> Vec<SafetyCarPeriod> {
    let mut incidents = classify_messages(messages);

    // Backup method only when the message feed produced nothing
    if incidents.is_empty() {
        incidents = detect_anomalies(laps);
    }

    let periods = merge_incidents(incidents);
    info!(count = periods.len(), "derived intervention periods");
    periods
}

/// One single-lap incident before merging
type Incident = (u32, InterventionKind, String);

/// Classify race-control messages by text; messages without a lap number
/// cannot be placed on the chart and are dropped
fn classify_messages(messages: &[RaceControlMessage]) -> Vec<Incident> {
    let mut incidents = Vec::new();
    for msg in messages {
        let Some(lap) = msg.lap else { continue };
        let text = msg.message.to_uppercase();

        let kind = if text.contains("RED FLAG") {
            Some(InterventionKind::RedFlag)
        } else if text.contains("VIRTUAL SAFETY CAR") || text.contains("VSC") {
            Some(InterventionKind::VirtualSafetyCar)
        } else if text.contains("SAFETY CAR") || text.contains("SC DEPLOYED") {
            Some(InterventionKind::SafetyCar)
        } else {
            None
        };

        if let Some(kind) = kind {
            incidents.push((lap, kind, msg.message.clone()));
        }
    }
    incidents
}

/// Flag laps slower than `ANOMALY_MEDIAN_FACTOR` x the driver's median
fn detect_anomalies(laps: &[Lap]) -> Vec<Incident> {
    let mut by_driver: BTreeMap<&str, Vec<&Lap>> = BTreeMap::new();
    for lap in laps {
        by_driver.entry(lap.driver.as_str()).or_default().push(lap);
    }

    let mut incidents = Vec::new();
    for driver_laps in by_driver.values() {
        if driver_laps.len() <= ANOMALY_MIN_LAPS {
            continue;
        }
        let mut times: Vec<f64> = driver_laps.iter().filter_map(|l| l.time).collect();
        if times.is_empty() {
            continue;
        }
        times.sort_by(f64::total_cmp);
        let median = times[times.len() / 2];

        for lap in driver_laps {
            if lap.time.is_some_and(|t| t > median * ANOMALY_MEDIAN_FACTOR) {
                incidents.push((
                    lap.lap_number,
                    InterventionKind::SafetyCar,
                    "Significant lap time increase detected".to_owned(),
                ));
            }
        }
    }
    incidents
}

/// Dedupe by (lap, kind), sort by lap, and merge adjacent same-kind laps
fn merge_incidents(incidents: Vec<Incident>) -> Vec<SafetyCarPeriod> {
    let mut seen = BTreeSet::new();
    let mut unique: Vec<Incident> = Vec::new();
    for incident in incidents {
        if seen.insert((incident.0, incident.1)) {
            unique.push(incident);
        }
    }
    unique.sort_by_key(|(lap, _, _)| *lap);

    let mut periods: Vec<SafetyCarPeriod> = Vec::new();
    for (lap, kind, reason) in unique {
        match periods.last_mut() {
            Some(period) if period.kind == kind && period.end_lap + 1 == lap => {
                period.end_lap = lap;
            }
            _ => periods.push(SafetyCarPeriod {
                start_lap: lap,
                end_lap: lap,
                kind,
                reason,
            }),
        }
    }
    periods
}
