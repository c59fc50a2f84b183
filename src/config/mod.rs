//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SAAS_CONFIGURATOR` prefix and nested values use double underscores as separators.
//!
//! Every value has a default, so an empty environment yields a configuration
//! pointing at a local engine and the cluster demo model.
//!
//! # Example
//!
//! ```no_run
//! use saas_configurator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Engine at {}", config.engine.base_url);
//! ```

mod engine;
mod error;
mod logging;
mod session;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rule engine endpoint and model
    #[serde(default)]
    pub engine: EngineConfig,

    /// Session limits
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SAAS_CONFIGURATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SAAS_CONFIGURATOR__ENGINE__BASE_URL=http://engine:9000` -> `engine.base_url`
    /// - `SAAS_CONFIGURATOR__SESSION__MAX_ROUNDS=10` -> `session.max_rounds = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SAAS_CONFIGURATOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
