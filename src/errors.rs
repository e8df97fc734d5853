// ABOUTME: Unified error handling system with standard error codes and HTTP responses
// ABOUTME: Defines the derivation-error taxonomy shared by the analysis core and the REST layer

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the Paddock
//! server. It defines standard error types, error codes, and HTTP response
//! formatting so the analysis core and the REST layer agree on how failures
//! are reported.
//!
//! Derivation errors are local to a request: the inputs are already
//! materialized in memory, so nothing here is retryable. The REST layer
//! translates each code into a status via [`ErrorCode::http_status`].

use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request or input data is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Telemetry series with mismatched channel lengths
    #[serde(rename = "MALFORMED_TELEMETRY")]
    MalformedTelemetry = 3001,

    // Derivation (4000-4999)
    /// Not enough timed laps to compute a required statistic
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData = 4000,
    /// Zero paired laps between two drivers; distinct from `InsufficientData`
    #[serde(rename = "NO_COMPARABLE_LAPS")]
    NoComparableLaps = 4001,
    /// The requested session, driver, or lap was not found
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4002,

    // External services (5000-5999)
    /// The upstream timing provider returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The upstream timing provider could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal (9000-9999)
    /// An internal server error occurred
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Data serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MalformedTelemetry => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 422 Unprocessable Entity - the session exists but cannot
            // support the requested derivation
            Self::InsufficientData | Self::NoComparableLaps => 422,

            // 502 Bad Gateway
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MalformedTelemetry => "Telemetry channels have inconsistent lengths",
            Self::InsufficientData => "Not enough timed laps for the requested statistic",
            Self::NoComparableLaps => "The two drivers share no laps to compare",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "The upstream timing provider returned an error",
            Self::ExternalServiceUnavailable => "The upstream timing provider is unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an HTTP error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Not enough timed laps for a required statistic
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientData, message)
    }

    /// Zero paired laps between two drivers
    #[must_use]
    pub fn no_comparable_laps(driver1: &str, driver2: &str) -> Self {
        Self::new(
            ErrorCode::NoComparableLaps,
            format!("{driver1} and {driver2} have no laps in common"),
        )
    }

    /// Telemetry series with inconsistent channel lengths
    pub fn malformed_telemetry(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedTelemetry, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Upstream provider error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upstream provider unreachable
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
