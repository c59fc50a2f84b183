//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid engine URL: {0}")]
    InvalidEngineUrl(String),

    #[error("Invalid engine request timeout")]
    InvalidTimeout,

    #[error("Invalid round timeout")]
    InvalidRoundTimeout,

    #[error("max_rounds must be at least 1")]
    InvalidMaxRounds,

    #[error("max_answer_attempts must be at least 1")]
    InvalidAnswerAttempts,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
