//! Rule engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::HttpEngineConfig;
use crate::domain::resolver::ModelTarget;

/// Rule engine connection and model selection
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Application path of the model, e.g. `Configuration/apps/<name>/<version>`
    #[serde(default = "default_app_path")]
    pub app_path: String,

    /// Fully qualified configure operation
    #[serde(default = "default_operation")]
    pub operation: String,

    /// Language for question texts
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EngineConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings for the HTTP engine client
    pub fn http_config(&self) -> HttpEngineConfig {
        HttpEngineConfig::new(self.base_url.clone()).with_timeout(self.timeout())
    }

    /// The model the resolver targets
    pub fn model_target(&self) -> Result<ModelTarget, ValidationError> {
        ModelTarget::new(&self.app_path, &self.operation)
            .map_err(|_| ValidationError::MissingRequired("ENGINE__APP_PATH / ENGINE__OPERATION"))
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("ENGINE__BASE_URL"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidEngineUrl(self.base_url.clone()));
        }
        if self.lang.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ENGINE__LANG"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        self.model_target()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_path: default_app_path(),
            operation: default_operation(),
            lang: default_lang(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_app_path() -> String {
    "Configuration/apps/cluster-config-demo/1.0.0".to_string()
}

fn default_operation() -> String {
    "demo.config.configureKafkaCluster".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_timeout() -> u64 {
    30
}
