//! HTTP Rule Engine - Implementation of ConfigurationEngine over the engine's REST API.
//!
//! # Endpoints
//!
//! - `GET {base}/v1/serverStatus` for liveness
//! - `POST {base}/v1/domains/{appPath}/models/{operation}/configure?lang={lang}&richResults=true`
//!   with the document as JSON body
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpEngineConfig::new("http://localhost:9000")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let engine = HttpConfigurationEngine::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::resolver::ModelTarget;
use crate::ports::{ConfigurationEngine, ConfigureRequest, EngineError, EngineResponse};

/// Configuration for the HTTP rule engine client.
#[derive(Debug, Clone)]
pub struct HttpEngineConfig {
    /// Base URL of the engine (default: http://localhost:9000).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpEngineConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self::new("http://localhost:9000")
    }
}

/// Rule engine client speaking the engine's JSON-over-HTTP protocol.
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and the
/// configuration is never mutated after construction.
pub struct HttpConfigurationEngine {
    config: HttpEngineConfig,
    client: Client,
}

impl HttpConfigurationEngine {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EngineError::ClientSetup(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Builds the liveness endpoint URL.
    fn status_url(&self) -> String {
        format!("{}/v1/serverStatus", self.base_url())
    }

    /// Builds the configure endpoint URL (without query string).
    fn configure_url(&self, target: &ModelTarget) -> String {
        format!(
            "{}/v1/domains/{}/models/{}/configure",
            self.base_url(),
            target.app_path(),
            target.operation()
        )
    }

    fn transport_error(&self, e: reqwest::Error) -> EngineError {
        if e.is_timeout() {
            EngineError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            EngineError::Unreachable(format!("Connection failed: {}", e))
        } else {
            EngineError::Unreachable(e.to_string())
        }
    }
}

#[async_trait]
impl ConfigurationEngine for HttpConfigurationEngine {
    async fn probe(&self) -> bool {
        match self.client.get(self.status_url()).send().await {
            Ok(response) => {
                let available = response.status().is_success();
                debug!(status = %response.status(), available, "Rule engine probe");
                available
            }
            Err(e) => {
                warn!("Rule engine probe failed: {}", e);
                false
            }
        }
    }

    async fn configure(&self, request: ConfigureRequest) -> Result<EngineResponse, EngineError> {
        let url = self.configure_url(&request.target);
        debug!(%url, lang = %request.lang, "Submitting document to rule engine");

        let response = self
            .client
            .post(&url)
            .query(&[("lang", request.lang.as_str()), ("richResults", "true")])
            .header(CONTENT_TYPE, "application/json")
            .json(&request.document)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Rule engine rejected configure request");
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| EngineError::Malformed(e.to_string()))
    }
}
