// ABOUTME: HTTP REST API route handlers mirroring the dashboard's data endpoints
// ABOUTME: Thin axum facade; all computation happens in the analysis module tree

//! # REST Routes
//!
//! Each handler follows the same request path: resolve the session key,
//! get the session through the cache-aware loader, run the relevant
//! derivations, serialize. Handlers own no logic beyond wiring - anything
//! worth testing lives in [`crate::analysis`] and is covered there.

use crate::analysis::{
    align_telemetry, analyze_degradation, classify_laps, clean_laps, compare_drivers,
    derive_safety_car_periods, lap_deltas, laps_for_driver, normalize_distance_pair, optimal_lap,
    pit_stops_from_laps, reconstruct_stints, summarize_sectors, AlignedTelemetry, ClassifiedLaps,
    Comparison, LapDelta, LapFilter, OptimalLap, PaceStats, SectorSummary, StintDegradation,
};
use crate::config::ServerConfig;
use crate::constants::service;
use crate::errors::{AppError, AppResult};
use crate::models::{
    CircuitLayout, Compound, DriverInfo, Lap, PitStop, RaceInfo, SafetyCarPeriod, SessionData,
    SessionKey, SessionType, Stint, TelemetrySeries,
};
use crate::providers::SessionLoader;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for all route handlers
pub struct AppState {
    /// Cache-aware session loader
    pub loader: SessionLoader,
    /// Server configuration
    pub config: ServerConfig,
}

/// Build the application router with CORS and request tracing
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/races/:year", get(get_races))
        .route("/drivers/:year/:round", get(get_race_drivers))
        .route("/laps/:year/:round/:driver", get(get_driver_laps))
        .route("/sectors/:year/:round/:driver", get(get_sector_times))
        .route("/analysis/pace/:year/:round/:driver", get(get_pace_analysis))
        .route("/pitstops/:year/:round", get(get_race_pitstops))
        .route(
            "/comparison/:year/:round/:driver1/:driver2",
            get(get_comparison),
        )
        .route("/safety-car/:year/:round", get(get_safety_car_periods))
        .route(
            "/telemetry/:year/:round/:driver1/:driver2",
            get(get_telemetry_comparison),
        )
        .route("/circuit-layout/:year/:round", get(get_circuit_layout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS from configured origins; a literal `*` opens the API up
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "invalid CORS origin skipped");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
}

/// Optional query parameters shared by the per-driver endpoints
#[derive(Debug, Deserialize)]
struct SessionQuery {
    /// Session type code; defaults to the race
    session: Option<String>,
    /// Lap filter mode; defaults to all laps
    filter: Option<String>,
}

impl SessionQuery {
    fn session_type(&self) -> AppResult<SessionType> {
        self.session.as_deref().map_or(Ok(SessionType::Race), str::parse)
    }

    fn lap_filter(&self) -> AppResult<LapFilter> {
        self.filter.as_deref().map_or(Ok(LapFilter::All), str::parse)
    }
}

/// Session laps for one driver, erroring when the driver is unknown
fn driver_laps(session: &SessionData, driver: &str) -> AppResult<Vec<Lap>> {
    let laps = laps_for_driver(&session.laps, driver);
    if laps.is_empty() {
        return Err(AppError::not_found(format!(
            "laps for driver {driver} in {}",
            session.key
        )));
    }
    Ok(laps)
}

/// Pit stops for one driver: the upstream feed when present, otherwise
/// derived from the laps themselves
fn driver_pit_stops(session: &SessionData, driver: &str, laps: &[Lap]) -> Vec<PitStop> {
    session
        .pit_stops
        .get(driver)
        .filter(|stops| !stops.is_empty())
        .cloned()
        .unwrap_or_else(|| pit_stops_from_laps(laps))
}

// ── Handlers ────────────────────────────────────────────────────────────

/// Service metadata for the root endpoint
#[derive(Debug, Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    provider: &'static str,
}

async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: service::SERVICE_NAME,
        version: service::SERVICE_VERSION,
        status: "running",
        provider: state.loader.provider().name(),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_races(
    State(state): State<Arc<AppState>>,
    Path(year): Path<u16>,
) -> AppResult<Json<Vec<RaceInfo>>> {
    info!(year, "fetching races");
    let races = state.loader.provider().race_schedule(year).await?;
    Ok(Json(races))
}

#[derive(Debug, Serialize)]
struct DriversResponse {
    year: u16,
    round: u32,
    drivers: Vec<DriverInfo>,
}

async fn get_race_drivers(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u32)>,
) -> AppResult<Json<DriversResponse>> {
    let key = SessionKey::new(year, round, SessionType::Race);
    let session = state.loader.session(&key).await?;

    let mut drivers = session.drivers.clone();
    // Sort by car number; non-numeric numbers go last
    drivers.sort_by_key(|d| d.number.parse::<u32>().unwrap_or(u32::MAX));

    Ok(Json(DriversResponse {
        year,
        round,
        drivers,
    }))
}

#[derive(Debug, Serialize)]
struct LapsResponse {
    driver: String,
    race: String,
    laps: Vec<Lap>,
    stats: PaceStats,
}

async fn get_driver_laps(
    State(state): State<Arc<AppState>>,
    Path((year, round, driver)): Path<(u16, u32, String)>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<LapsResponse>> {
    info!(year, round, driver = %driver, "fetching laps");
    let key = SessionKey::new(year, round, query.session_type()?);
    let session = state.loader.session(&key).await?;

    let laps = driver_laps(&session, &driver)?;
    let cleaned = clean_laps(&laps);
    let ClassifiedLaps { filtered, stats } = classify_laps(&cleaned, query.lap_filter()?)?;

    Ok(Json(LapsResponse {
        driver,
        race: session.event_name.clone(),
        laps: filtered,
        stats,
    }))
}

#[derive(Debug, Serialize)]
struct SectorsResponse {
    driver: String,
    sectors: Vec<SectorSummary>,
    optimal: OptimalLap,
}

async fn get_sector_times(
    State(state): State<Arc<AppState>>,
    Path((year, round, driver)): Path<(u16, u32, String)>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<SectorsResponse>> {
    info!(year, round, driver = %driver, "fetching sector times");
    let key = SessionKey::new(year, round, query.session_type()?);
    let session = state.loader.session(&key).await?;

    let laps = driver_laps(&session, &driver)?;
    let cleaned = clean_laps(&laps);

    Ok(Json(SectorsResponse {
        driver,
        sectors: summarize_sectors(&cleaned)?,
        optimal: optimal_lap(&cleaned)?,
    }))
}

#[derive(Debug, Serialize)]
struct PaceResponse {
    driver: String,
    pace: PaceStats,
    stints: Vec<Stint>,
    tyre_degradation: Vec<StintDegradation>,
}

async fn get_pace_analysis(
    State(state): State<Arc<AppState>>,
    Path((year, round, driver)): Path<(u16, u32, String)>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<PaceResponse>> {
    info!(year, round, driver = %driver, "analyzing pace");
    let key = SessionKey::new(year, round, query.session_type()?);
    let session = state.loader.session(&key).await?;

    let laps = driver_laps(&session, &driver)?;
    let cleaned = clean_laps(&laps);
    let ClassifiedLaps { stats, .. } = classify_laps(&cleaned, LapFilter::All)?;

    // Stints run over the unfiltered sequence: in/out laps carry the
    // compound evidence the fallback chain needs
    let stops = driver_pit_stops(&session, &driver, &laps);
    let stints = reconstruct_stints(&laps, &stops)?;
    let tyre_degradation = analyze_degradation(&stints);

    Ok(Json(PaceResponse {
        driver,
        pace: stats,
        stints,
        tyre_degradation,
    }))
}

#[derive(Debug, Serialize)]
struct DriverPitStops {
    driver: String,
    total_stops: usize,
    stops: Vec<PitStop>,
}

#[derive(Debug, Serialize)]
struct PitStopsResponse {
    race: String,
    year: u16,
    total_drivers: usize,
    pitstops: std::collections::BTreeMap<String, DriverPitStops>,
}

async fn get_race_pitstops(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u32)>,
) -> AppResult<Json<PitStopsResponse>> {
    info!(year, round, "fetching pit stops");
    let key = SessionKey::new(year, round, SessionType::Race);
    let session = state.loader.session(&key).await?;

    let mut pitstops = std::collections::BTreeMap::new();
    for driver in &session.drivers {
        let laps = laps_for_driver(&session.laps, &driver.code);
        let mut stops = driver_pit_stops(&session, &driver.code, &laps);
        stops.sort_by_key(|s| s.lap);
        pitstops.insert(
            driver.code.clone(),
            DriverPitStops {
                driver: driver.name.clone(),
                total_stops: stops.len(),
                stops,
            },
        );
    }

    Ok(Json(PitStopsResponse {
        race: session.event_name.clone(),
        year,
        total_drivers: pitstops.len(),
        pitstops,
    }))
}

#[derive(Debug, Serialize)]
struct ComparisonResponse {
    #[serde(flatten)]
    comparison: Comparison,
    deltas: Vec<LapDelta>,
}

async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Path((year, round, driver1, driver2)): Path<(u16, u32, String, String)>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<ComparisonResponse>> {
    info!(year, round, driver1 = %driver1, driver2 = %driver2, "comparing drivers");
    let key = SessionKey::new(year, round, query.session_type()?);
    let session = state.loader.session(&key).await?;

    let laps1 = clean_laps(&driver_laps(&session, &driver1)?);
    let laps2 = clean_laps(&driver_laps(&session, &driver2)?);

    Ok(Json(ComparisonResponse {
        comparison: compare_drivers(&laps1, &laps2)?,
        deltas: lap_deltas(&laps1, &laps2),
    }))
}

#[derive(Debug, Serialize)]
struct SafetyCarResponse {
    year: u16,
    race: u32,
    event: String,
    safety_car_periods: Vec<SafetyCarPeriod>,
}

async fn get_safety_car_periods(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u32)>,
) -> AppResult<Json<SafetyCarResponse>> {
    info!(year, round, "deriving safety car periods");
    let key = SessionKey::new(year, round, SessionType::Race);
    let session = state.loader.session(&key).await?;

    Ok(Json(SafetyCarResponse {
        year,
        race: round,
        event: session.event_name.clone(),
        safety_car_periods: derive_safety_car_periods(&session.race_control, &session.laps),
    }))
}

#[derive(Debug, Serialize)]
struct TelemetryLap {
    lap_time: Option<f64>,
    lap_number: u32,
    compound: Option<Compound>,
    telemetry: TelemetrySeries,
}

#[derive(Debug, Serialize)]
struct TelemetryResponse {
    driver1: String,
    driver2: String,
    lap1: TelemetryLap,
    lap2: TelemetryLap,
    aligned: AlignedTelemetry,
}

/// Fastest timed lap of a cleaned lap sequence
fn fastest_lap(laps: &[Lap], driver: &str) -> AppResult<Lap> {
    laps.iter()
        .filter(|l| l.time.is_some())
        .min_by(|a, b| f64::total_cmp(&a.time.unwrap_or(f64::INFINITY), &b.time.unwrap_or(f64::INFINITY)))
        .cloned()
        .ok_or_else(|| AppError::insufficient_data(format!("no timed laps for {driver}")))
}

async fn get_telemetry_comparison(
    State(state): State<Arc<AppState>>,
    Path((year, round, driver1, driver2)): Path<(u16, u32, String, String)>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Json<TelemetryResponse>> {
    info!(year, round, driver1 = %driver1, driver2 = %driver2, "comparing telemetry");
    let key = SessionKey::new(year, round, query.session_type()?);
    let session = state.loader.session(&key).await?;

    let fastest1 = fastest_lap(&clean_laps(&driver_laps(&session, &driver1)?), &driver1)?;
    let fastest2 = fastest_lap(&clean_laps(&driver_laps(&session, &driver2)?), &driver2)?;

    let provider = state.loader.provider();
    let mut tel1 = provider
        .lap_telemetry(&key, &driver1, fastest1.lap_number)
        .await?;
    let mut tel2 = provider
        .lap_telemetry(&key, &driver2, fastest2.lap_number)
        .await?;

    // Both laps share one distance offset so the axes stay comparable
    normalize_distance_pair(&mut tel1, &mut tel2);
    let aligned = align_telemetry(&tel1, &tel2)?;

    Ok(Json(TelemetryResponse {
        driver1,
        driver2,
        lap1: TelemetryLap {
            lap_time: fastest1.time,
            lap_number: fastest1.lap_number,
            compound: fastest1.compound,
            telemetry: tel1,
        },
        lap2: TelemetryLap {
            lap_time: fastest2.time,
            lap_number: fastest2.lap_number,
            compound: fastest2.compound,
            telemetry: tel2,
        },
        aligned,
    }))
}

#[derive(Debug, Serialize)]
struct CircuitLayoutResponse {
    circuit: String,
    layout: CircuitLayout,
}

async fn get_circuit_layout(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u32)>,
) -> AppResult<Json<CircuitLayoutResponse>> {
    info!(year, round, "fetching circuit layout");
    let key = SessionKey::new(year, round, SessionType::Race);
    let session = state.loader.session(&key).await?;
    let layout = state.loader.provider().circuit_geometry(&key).await?;

    Ok(Json(CircuitLayoutResponse {
        circuit: session.event_name.clone(),
        layout,
    }))
}
