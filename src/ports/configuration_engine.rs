//! Configuration Engine Port - Interface to the external rule engine.
//!
//! The engine receives the current document, completes what its rules can
//! derive, and reports every member it still needs as missing data.
//!
//! # Example
//!
//! ```ignore
//! let engine: Arc<dyn ConfigurationEngine> = Arc::new(HttpConfigurationEngine::new(config)?);
//! if engine.probe().await {
//!     let response = engine.configure(request).await?;
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::resolver::{ComputationDetails, Document, MissingElementDescriptor, ModelTarget};

/// Port for the rule engine that completes configuration documents.
///
/// Implementations hold only read-only connection settings, so one value can
/// be shared by any number of concurrent sessions.
#[async_trait]
pub trait ConfigurationEngine: Send + Sync {
    /// Returns true if the engine reports itself available.
    ///
    /// Transport failures count as unavailable; this never errors.
    async fn probe(&self) -> bool;

    /// Submits a document and returns the engine's completion of it.
    ///
    /// One request, no retries.
    async fn configure(&self, request: ConfigureRequest) -> Result<EngineResponse, EngineError>;
}

/// A document submitted to one engine model.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigureRequest {
    pub target: ModelTarget,
    pub lang: String,
    pub document: Document,
}

impl ConfigureRequest {
    /// Creates a new configure request.
    pub fn new(target: ModelTarget, lang: impl Into<String>, document: Document) -> Self {
        Self {
            target,
            lang: lang.into(),
            document,
        }
    }
}

/// The engine's answer to a configure request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResponse {
    /// Completed document. Absent means the submitted document is unchanged.
    #[serde(default)]
    pub output: Option<Document>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub missing_data: Vec<MissingElementDescriptor>,
    #[serde(default)]
    pub computation_details: Option<ComputationDetails>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<MissingElementDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MissingElementDescriptor>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EngineResponse {
    /// A response with nothing missing.
    pub fn resolved(output: Document) -> Self {
        Self {
            output: Some(output),
            missing_data: Vec::new(),
            computation_details: None,
        }
    }

    /// A response that still needs the given members.
    pub fn missing(output: Document, missing_data: Vec<MissingElementDescriptor>) -> Self {
        Self {
            output: Some(output),
            missing_data,
            computation_details: None,
        }
    }

    /// Sets the computation details.
    pub fn with_computation_details(mut self, details: ComputationDetails) -> Self {
        self.computation_details = Some(details);
        self
    }

    /// Returns true when the engine needs no further input.
    pub fn is_resolved(&self) -> bool {
        self.missing_data.is_empty()
    }
}

/// Rule engine transport errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine answered with a non-success status.
    #[error("engine returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The engine could not be reached.
    #[error("engine unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete in time.
    #[error("engine request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The response body was not a valid configure response.
    #[error("malformed engine response: {0}")]
    Malformed(String),

    /// The HTTP client could not be built.
    #[error("engine client setup failed: {0}")]
    ClientSetup(String),
}

impl EngineError {
    /// Returns the HTTP status, if the engine answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
