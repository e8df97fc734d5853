// ABOUTME: OpenF1-style upstream timing API integration and data fetching
// ABOUTME: Handles session resolution, lap/stint/pit retrieval, and DTO-to-model conversion

//! # OpenF1 Provider
//!
//! HTTP JSON client for an OpenF1-style timing API. The upstream exposes
//! flat per-entity feeds (`/meetings`, `/sessions`, `/drivers`, `/laps`,
//! `/stints`, `/pit`, `/race_control`, `/car_data`, `/location`) keyed by a
//! numeric session key; this provider resolves our `(year, round, session)`
//! key against the schedule, fetches the feeds, and merges them into one
//! [`SessionData`]:
//!
//! - the stint feed supplies compound and tyre age per lap (the lap feed
//!   itself does not carry them)
//! - the pit feed supplies the per-driver pit-stop lists, with
//!   `compound_before`/`tyre_life_before` resolved from the stint that the
//!   in-lap closed
//! - telemetry distance is accumulated from consecutive position samples,
//!   since the car-data feed has no distance channel

use crate::config::environment::UpstreamConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CircuitLayout, Compound, DriverInfo, Lap, PitStop, RaceControlMessage, RaceInfo, SessionData,
    SessionKey, TelemetrySeries,
};
use crate::providers::core::TimingProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// HTTP client for an OpenF1-style upstream timing API
pub struct OpenF1Provider {
    client: Client,
    base_url: String,
}

impl OpenF1Provider {
    /// Provider name used in logs and error messages
    const PROVIDER: &'static str = "openf1";

    /// Build a provider from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the HTTP client cannot be constructed.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::config(format!("failed to build upstream HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetch one upstream feed as a JSON array
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(Self::PROVIDER, format!("GET {path}: {e}"))
                    .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                Self::PROVIDER,
                format!("GET {path} returned {status}"),
            ));
        }

        response.json::<Vec<T>>().await.map_err(|e| {
            AppError::external_service(Self::PROVIDER, format!("GET {path} body: {e}"))
                .with_source(e)
        })
    }

    /// Resolve our `(year, round, session)` key to the upstream session
    async fn resolve_session(&self, key: &SessionKey) -> AppResult<SessionDto> {
        let meetings: Vec<MeetingDto> = self
            .fetch("meetings", &[("year", key.year.to_string())])
            .await?;

        let mut ordered = meetings;
        ordered.sort_by(|a, b| a.date_start.cmp(&b.date_start));

        // Rounds are 1-based positions in the date-ordered schedule
        let meeting = ordered
            .get(key.round.saturating_sub(1) as usize)
            .ok_or_else(|| {
                AppError::not_found(format!("round {} of season {}", key.round, key.year))
            })?;

        let sessions: Vec<SessionDto> = self
            .fetch(
                "sessions",
                &[("meeting_key", meeting.meeting_key.to_string())],
            )
            .await?;

        sessions
            .into_iter()
            .find(|s| s.matches(key.session.code()))
            .ok_or_else(|| AppError::not_found(format!("session {key}")))
    }

    /// Resolve a driver code to the upstream car number
    async fn resolve_driver(&self, session_key: u64, code: &str) -> AppResult<DriverDto> {
        let drivers: Vec<DriverDto> = self
            .fetch("drivers", &[("session_key", session_key.to_string())])
            .await?;

        drivers
            .into_iter()
            .find(|d| d.name_acronym.eq_ignore_ascii_case(code))
            .ok_or_else(|| AppError::not_found(format!("driver {code}")))
    }

    /// Fetch position samples and fold them into x/y plus cumulative distance
    async fn location_track(
        &self,
        session_key: u64,
        driver_number: u32,
        lap: Option<u32>,
    ) -> AppResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let mut query = vec![
            ("session_key", session_key.to_string()),
            ("driver_number", driver_number.to_string()),
        ];
        if let Some(lap) = lap {
            query.push(("lap_number", lap.to_string()));
        }
        let mut samples: Vec<LocationDto> = self.fetch("location", &query).await?;
        samples.sort_by(|a, b| a.date.cmp(&b.date));

        let mut x = Vec::with_capacity(samples.len());
        let mut y = Vec::with_capacity(samples.len());
        let mut distance = Vec::with_capacity(samples.len());
        let mut total = 0.0;
        for (i, sample) in samples.iter().enumerate() {
            if i > 0 {
                let dx = sample.x - samples[i - 1].x;
                let dy = sample.y - samples[i - 1].y;
                total += dx.hypot(dy);
            }
            x.push(sample.x);
            y.push(sample.y);
            distance.push(total);
        }
        Ok((x, y, distance))
    }
}

#[async_trait]
impl TimingProvider for OpenF1Provider {
    fn name(&self) -> &'static str {
        Self::PROVIDER
    }

    async fn race_schedule(&self, year: u16) -> AppResult<Vec<RaceInfo>> {
        let meetings: Vec<MeetingDto> = self.fetch("meetings", &[("year", year.to_string())]).await?;

        let mut ordered = meetings;
        ordered.sort_by(|a, b| a.date_start.cmp(&b.date_start));

        let races = ordered
            .into_iter()
            .enumerate()
            .map(|(i, m)| RaceInfo {
                round: i as u32 + 1,
                race_name: m.meeting_name,
                country: m.country_name,
                circuit: m.circuit_short_name,
                // Date only, no time component
                date: m
                    .date_start
                    .split('T')
                    .next()
                    .unwrap_or(&m.date_start)
                    .to_owned(),
            })
            .collect();
        Ok(races)
    }

    async fn load_session(&self, key: &SessionKey) -> AppResult<SessionData> {
        let session = self.resolve_session(key).await?;
        let session_query = [("session_key", session.session_key.to_string())];

        let drivers: Vec<DriverDto> = self.fetch("drivers", &session_query).await?;
        let laps: Vec<LapDto> = self.fetch("laps", &session_query).await?;
        let stints: Vec<StintDto> = self.fetch("stints", &session_query).await?;
        let pits: Vec<PitDto> = self.fetch("pit", &session_query).await?;
        let race_control: Vec<RaceControlDto> = self.fetch("race_control", &session_query).await?;

        info!(
            key = %key,
            laps = laps.len(),
            stints = stints.len(),
            pits = pits.len(),
            "session loaded from upstream"
        );

        let number_to_code: HashMap<u32, String> = drivers
            .iter()
            .map(|d| (d.driver_number, d.name_acronym.to_uppercase()))
            .collect();

        let session_start = DateTime::parse_from_rfc3339(&session.date_start)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();

        let mut model_laps = Vec::with_capacity(laps.len());
        for lap in &laps {
            let Some(code) = number_to_code.get(&lap.driver_number) else {
                warn!(driver_number = lap.driver_number, "lap for unknown driver skipped");
                continue;
            };
            model_laps.push(lap.to_model(code, &stints, &pits, session_start));
        }

        let mut pit_stops: HashMap<String, Vec<PitStop>> = HashMap::new();
        for driver in number_to_code.values() {
            pit_stops.insert(driver.clone(), Vec::new());
        }
        for pit in &pits {
            let Some(code) = number_to_code.get(&pit.driver_number) else {
                continue;
            };
            pit_stops
                .entry(code.clone())
                .or_default()
                .push(pit.to_model(&laps, &stints));
        }

        Ok(SessionData {
            key: *key,
            event_name: session
                .session_name
                .clone()
                .unwrap_or_else(|| format!("Round {} ({})", key.round, key.session)),
            drivers: drivers.into_iter().map(DriverDto::into_model).collect(),
            laps: model_laps,
            pit_stops,
            race_control: race_control
                .into_iter()
                .map(|rc| RaceControlMessage {
                    lap: rc.lap_number,
                    message: rc.message,
                })
                .collect(),
        })
    }

    async fn lap_telemetry(
        &self,
        key: &SessionKey,
        driver: &str,
        lap: u32,
    ) -> AppResult<TelemetrySeries> {
        let session = self.resolve_session(key).await?;
        let driver_dto = self.resolve_driver(session.session_key, driver).await?;

        let mut samples: Vec<CarDataDto> = self
            .fetch(
                "car_data",
                &[
                    ("session_key", session.session_key.to_string()),
                    ("driver_number", driver_dto.driver_number.to_string()),
                    ("lap_number", lap.to_string()),
                ],
            )
            .await?;
        if samples.is_empty() {
            return Err(AppError::not_found(format!(
                "telemetry for {driver} lap {lap} in {key}"
            )));
        }
        samples.sort_by(|a, b| a.date.cmp(&b.date));

        let (_, _, distance) = self
            .location_track(session.session_key, driver_dto.driver_number, Some(lap))
            .await?;

        // Car data and position samples tick on different clocks; align by
        // index and truncate to the shorter feed.
        let n = samples.len().min(distance.len());
        samples.truncate(n);

        TelemetrySeries::new(
            distance.into_iter().take(n).collect(),
            samples.iter().map(|s| s.speed).collect(),
            samples.iter().map(|s| s.throttle).collect(),
            samples.iter().map(|s| s.brake > 0.0).collect(),
            samples.iter().map(|s| s.n_gear.min(9) as u8).collect(),
            samples.iter().map(|s| s.rpm).collect(),
            samples.iter().map(|s| DRS_OPEN_CODES.contains(&s.drs)).collect(),
        )
    }

    async fn circuit_geometry(&self, key: &SessionKey) -> AppResult<CircuitLayout> {
        let session = self.resolve_session(key).await?;

        let drivers: Vec<DriverDto> = self
            .fetch("drivers", &[("session_key", session.session_key.to_string())])
            .await?;
        let first = drivers
            .first()
            .ok_or_else(|| AppError::not_found(format!("drivers for {key}")))?;

        let (x, y, raw_distance) = self
            .location_track(session.session_key, first.driver_number, None)
            .await?;
        if x.is_empty() {
            return Err(AppError::not_found(format!("position data for {key}")));
        }

        // Normalize distances to start from 0
        let offset = raw_distance.first().copied().unwrap_or(0.0);
        let distance = raw_distance.into_iter().map(|d| d - offset).collect();

        Ok(CircuitLayout { x, y, distance })
    }
}

/// DRS codes the upstream uses for an open flap
const DRS_OPEN_CODES: [u8; 3] = [10, 12, 14];

// ── Upstream DTOs ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MeetingDto {
    meeting_key: u64,
    meeting_name: String,
    country_name: String,
    circuit_short_name: String,
    date_start: String,
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    session_key: u64,
    session_name: Option<String>,
    session_type: Option<String>,
    date_start: String,
}

impl SessionDto {
    /// Match our short code against either upstream naming field
    fn matches(&self, code: &str) -> bool {
        let named = |s: &Option<String>, expect: &str| {
            s.as_deref().is_some_and(|v| v.eq_ignore_ascii_case(expect))
        };
        match code {
            "R" => named(&self.session_name, "Race") || named(&self.session_type, "Race"),
            "Q" => named(&self.session_name, "Qualifying") || named(&self.session_type, "Qualifying"),
            "S" => named(&self.session_name, "Sprint"),
            other => {
                // Practice codes map to "Practice 1".."Practice 3"
                let n = other.trim_start_matches("FP");
                named(&self.session_name, &format!("Practice {n}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriverDto {
    driver_number: u32,
    name_acronym: String,
    full_name: Option<String>,
}

impl DriverDto {
    fn into_model(self) -> DriverInfo {
        DriverInfo {
            code: self.name_acronym.to_uppercase(),
            name: self.full_name.unwrap_or_else(|| self.name_acronym.clone()),
            number: self.driver_number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LapDto {
    driver_number: u32,
    lap_number: u32,
    lap_duration: Option<f64>,
    duration_sector_1: Option<f64>,
    duration_sector_2: Option<f64>,
    duration_sector_3: Option<f64>,
    #[serde(default)]
    is_pit_out_lap: bool,
    date_start: Option<String>,
}

impl LapDto {
    /// Convert to the shared model, merging compound/tyre age from the
    /// stint feed and pit timing from the pit feed
    fn to_model(
        &self,
        driver: &str,
        stints: &[StintDto],
        pits: &[PitDto],
        session_start: Option<DateTime<Utc>>,
    ) -> Lap {
        let stint = stints.iter().find(|s| {
            s.driver_number == self.driver_number
                && s.lap_start <= self.lap_number
                && self.lap_number <= s.lap_end
        });

        let pit = pits
            .iter()
            .find(|p| p.driver_number == self.driver_number && p.lap_number == self.lap_number);

        let seconds_into_session = |raw: &Option<String>| {
            let start = session_start?;
            let parsed = raw
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())?;
            Some((parsed.with_timezone(&Utc) - start).num_milliseconds() as f64 / 1000.0)
        };

        let mut lap = Lap::timed(self.lap_number, driver, 0.0);
        lap.time = self.lap_duration;
        lap.sector1 = self.duration_sector_1;
        lap.sector2 = self.duration_sector_2;
        lap.sector3 = self.duration_sector_3;
        lap.compound = stint.and_then(|s| s.compound_model());
        lap.tyre_life = stint.and_then(|s| s.tyre_life_at(self.lap_number));
        // In/out laps are never timing-accurate
        lap.is_accurate = self.lap_duration.is_some() && pit.is_none() && !self.is_pit_out_lap;
        lap.pit_in_time = pit.and_then(|p| seconds_into_session(&p.date));
        lap.pit_out_time = if self.is_pit_out_lap {
            seconds_into_session(&self.date_start)
        } else {
            None
        };
        lap
    }
}

#[derive(Debug, Deserialize)]
struct StintDto {
    driver_number: u32,
    stint_number: u32,
    compound: Option<String>,
    lap_start: u32,
    lap_end: u32,
    tyre_age_at_start: Option<u32>,
}

impl StintDto {
    fn compound_model(&self) -> Option<Compound> {
        self.compound.as_deref().and_then(|c| c.parse().ok())
    }

    fn tyre_life_at(&self, lap_number: u32) -> Option<u32> {
        let age = self.tyre_age_at_start.unwrap_or(0);
        Some(age + lap_number.saturating_sub(self.lap_start) + 1)
    }
}

#[derive(Debug, Deserialize)]
struct PitDto {
    driver_number: u32,
    lap_number: u32,
    pit_duration: Option<f64>,
    date: Option<String>,
}

impl PitDto {
    /// Convert to the shared model, resolving the stint this stop closed
    fn to_model(&self, laps: &[LapDto], stints: &[StintDto]) -> PitStop {
        let closed_stint = stints.iter().find(|s| {
            s.driver_number == self.driver_number
                && s.lap_start <= self.lap_number
                && self.lap_number <= s.lap_end
        });

        let in_lap = laps
            .iter()
            .find(|l| l.driver_number == self.driver_number && l.lap_number == self.lap_number);

        PitStop {
            // The upstream anchors pit records to the in-lap; our stop
            // convention anchors to the first lap of the next stint
            lap: self.lap_number + 1,
            stint: closed_stint.map(|s| s.stint_number),
            pit_duration: self.pit_duration,
            lap_time: in_lap.and_then(|l| l.lap_duration),
            compound_before: closed_stint.and_then(StintDto::compound_model),
            tyre_life_before: closed_stint.and_then(|s| s.tyre_life_at(self.lap_number)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RaceControlDto {
    lap_number: Option<u32>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct CarDataDto {
    date: String,
    speed: f64,
    throttle: f64,
    #[serde(default)]
    brake: f64,
    #[serde(default)]
    n_gear: u32,
    #[serde(default)]
    rpm: f64,
    #[serde(default)]
    drs: u8,
}

#[derive(Debug, Deserialize)]
struct LocationDto {
    date: String,
    x: f64,
    y: f64,
}
