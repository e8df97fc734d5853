// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_vars};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info, // Default fallback
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            // Default fallback for unrecognized values
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Upstream timing provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream timing API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::UPSTREAM_BASE_URL.to_owned(),
            timeout_secs: defaults::UPSTREAM_TIMEOUT_SECS,
        }
    }
}

/// Complete server configuration, resolved from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP listen host
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Upstream timing provider settings
    pub upstream: UpstreamConfig,
    /// Allowed CORS origins for the dashboard frontend
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            environment: Environment::default(),
            upstream: UpstreamConfig::default(),
            cors_allowed_origins: defaults::CORS_ALLOWED_ORIGINS
                .split(',')
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; set-but-invalid numeric
    /// variables are an error rather than a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric environment variable is set but
    /// unparseable.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_port = match env::var(env_vars::HTTP_PORT) {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid {}: '{raw}'", env_vars::HTTP_PORT))?,
            Err(_) => defaults.http_port,
        };

        let timeout_secs = match env::var(env_vars::UPSTREAM_TIMEOUT_SECS) {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid {}: '{raw}'", env_vars::UPSTREAM_TIMEOUT_SECS))?,
            Err(_) => defaults.upstream.timeout_secs,
        };

        let base_url =
            env::var(env_vars::UPSTREAM_BASE_URL).unwrap_or(defaults.upstream.base_url);
        if url::Url::parse(&base_url).is_err() {
            warn!(
                base_url = %base_url,
                "upstream base URL does not parse; requests will fail until corrected"
            );
        }

        let cors_allowed_origins = env::var(env_vars::CORS_ALLOWED_ORIGINS)
            .map_or(defaults.cors_allowed_origins, |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            });

        let environment = env::var(env_vars::ENVIRONMENT)
            .map(|raw| Environment::from_str_or_default(&raw))
            .unwrap_or_default();

        Ok(Self {
            http_port,
            host: env::var(env_vars::HOST).unwrap_or(defaults.host),
            environment,
            upstream: UpstreamConfig {
                base_url,
                timeout_secs,
            },
            cors_allowed_origins,
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "listen={}:{} environment={} upstream={} timeout={}s cors_origins={}",
            self.host,
            self.http_port,
            self.environment,
            self.upstream.base_url,
            self.upstream.timeout_secs,
            self.cors_allowed_origins.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_fallback() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }

    #[test]
    fn test_environment_aliases() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(Environment::from_str_or_default(""), Environment::Development);
    }

    #[test]
    fn test_default_config_is_complete() {
        let config = ServerConfig::default();
        assert_eq!(config.http_port, defaults::HTTP_PORT);
        assert!(!config.cors_allowed_origins.is_empty());
        assert!(config.summary().contains("environment=development"));
    }
}
