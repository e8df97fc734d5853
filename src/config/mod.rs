// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-variable driven; no configuration files are read

/// Environment-based configuration management
pub mod environment;

pub use environment::{Environment, LogLevel, ServerConfig};
