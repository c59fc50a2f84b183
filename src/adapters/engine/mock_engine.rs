//! Mock Rule Engine for testing.
//!
//! Provides a scripted implementation of the ConfigurationEngine port so
//! sessions can be exercised without a running engine.
//!
//! # Features
//!
//! - Scripted responses consumed in order
//! - Availability toggle for probe testing
//! - Simulated latency for deadline testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let engine = MockConfigurationEngine::new()
//!     .with_response(EngineResponse::missing(doc.clone(), vec![descriptor]))
//!     .with_response(EngineResponse::resolved(doc));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ConfigurationEngine, ConfigureRequest, EngineError, EngineResponse};

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockEngineReply {
    /// Return this response.
    Response(EngineResponse),
    /// Fail with this error.
    Error(EngineError),
}

/// Mock rule engine for testing.
///
/// When the script runs out, the engine echoes the submitted document back
/// with nothing missing.
#[derive(Debug, Clone)]
pub struct MockConfigurationEngine {
    replies: Arc<Mutex<VecDeque<MockEngineReply>>>,
    available: bool,
    delay: Duration,
    calls: Arc<Mutex<Vec<ConfigureRequest>>>,
}

impl Default for MockConfigurationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConfigurationEngine {
    /// Creates an available mock engine with an empty script.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            available: true,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a response to the script.
    pub fn with_response(self, response: EngineResponse) -> Self {
        self.push(MockEngineReply::Response(response));
        self
    }

    /// Adds an error to the script.
    pub fn with_error(self, error: EngineError) -> Self {
        self.push(MockEngineReply::Error(error));
        self
    }

    /// Sets what `probe` reports.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets simulated latency per configure call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of configure calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded configure calls.
    pub fn get_calls(&self) -> Vec<ConfigureRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, reply: MockEngineReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn next_reply(&self) -> Option<MockEngineReply> {
        self.replies.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl ConfigurationEngine for MockConfigurationEngine {
    async fn probe(&self) -> bool {
        self.available
    }

    async fn configure(&self, request: ConfigureRequest) -> Result<EngineResponse, EngineError> {
        self.calls.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            Some(MockEngineReply::Response(response)) => Ok(response),
            Some(MockEngineReply::Error(error)) => Err(error),
            None => Ok(EngineResponse::resolved(request.document)),
        }
    }
}
