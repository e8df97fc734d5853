// ABOUTME: System-wide constants and configuration values for the Paddock API
// ABOUTME: Contains analysis thresholds, service identity, and environment defaults

//! # Constants Module
//!
//! Application constants and environment-based configuration values. The
//! analysis thresholds live here so the classifier, safety-car derivation,
//! and tests agree on exact values.

/// Service identity
pub mod service {
    /// Service name used in logs and the root endpoint
    pub const SERVICE_NAME: &str = "paddock-server";

    /// Server version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Analysis thresholds
pub mod analysis {
    /// Laps within this multiple of the fastest time count as "near-fastest"
    pub const FASTEST_WINDOW_FACTOR: f64 = 1.03;

    /// Laps within this fraction of the mean count as "near-average"
    pub const AVERAGE_WINDOW_FRACTION: f64 = 0.02;

    /// A lap slower than this multiple of the driver's median suggests a
    /// safety car or VSC when race-control messages are missing
    pub const ANOMALY_MEDIAN_FACTOR: f64 = 1.5;

    /// Anomaly detection needs more laps than this per driver
    pub const ANOMALY_MIN_LAPS: usize = 3;

    /// Default bin width for speed traces, meters
    pub const SPEED_TRACE_BIN_METERS: f64 = 100.0;

    /// Default corner-detection speed threshold, km/h
    pub const CORNER_SPEED_THRESHOLD_KMH: f64 = 200.0;
}

/// Network and server defaults
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8000;

    /// Default HTTP listen host
    pub const HOST: &str = "127.0.0.1";

    /// Default upstream timing API base URL
    pub const UPSTREAM_BASE_URL: &str = "https://api.openf1.org/v1";

    /// Default upstream request timeout in seconds
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;

    /// Default allowed CORS origins (the local dashboard dev servers)
    pub const CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
}

/// Environment variable names
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";

    /// HTTP listen host
    pub const HOST: &str = "HOST";

    /// Upstream timing API base URL
    pub const UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";

    /// Upstream request timeout in seconds
    pub const UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";

    /// Comma-separated allowed CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
