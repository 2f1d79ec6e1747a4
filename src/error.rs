use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the engine and its collaborators
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid time format: {0}")]
    #[diagnostic(
        code(orderslot::invalid_time_format),
        help("times are zero-padded 24-hour \"HH:MM\"")
    )]
    InvalidTimeFormat(String),

    #[error("Invalid date: {0}")]
    #[diagnostic(code(orderslot::invalid_date), help("dates are \"YYYY-MM-DD\""))]
    InvalidDate(String),

    #[error("Outlet service error: {0}")]
    #[diagnostic(code(orderslot::outlet_service))]
    OutletService(String),

    #[error("Selection storage error: {0}")]
    #[diagnostic(code(orderslot::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(orderslot::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(orderslot::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(orderslot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(orderslot::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(orderslot::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::OutletService(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Storage(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SlotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create time format errors
pub fn invalid_time_error(value: &str) -> Error {
    Error::InvalidTimeFormat(value.to_string())
}

/// Helper to create date errors
pub fn invalid_date_error(value: &str) -> Error {
    Error::InvalidDate(value.to_string())
}

/// Helper to create outlet service errors
pub fn outlet_service_error(message: &str) -> Error {
    Error::OutletService(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}
