//! Resolution session limits

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Limits for one resolution session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Rounds allowed before giving up
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Times a question is asked when answers are rejected
    #[serde(default = "default_max_answer_attempts")]
    pub max_answer_attempts: u32,

    /// Per-round deadline in seconds, covering the engine call and all answers
    pub round_timeout_secs: Option<u64>,

    /// Check engine liveness before the first round
    #[serde(default = "default_probe")]
    pub probe_before_start: bool,
}

impl SessionConfig {
    /// Get the round deadline as Duration
    pub fn round_timeout(&self) -> Option<Duration> {
        self.round_timeout_secs.map(Duration::from_secs)
    }

    /// Validate session limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_rounds == 0 {
            return Err(ValidationError::InvalidMaxRounds);
        }
        if self.max_answer_attempts == 0 {
            return Err(ValidationError::InvalidAnswerAttempts);
        }
        if self.round_timeout_secs == Some(0) {
            return Err(ValidationError::InvalidRoundTimeout);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_answer_attempts: default_max_answer_attempts(),
            round_timeout_secs: None,
            probe_before_start: default_probe(),
        }
    }
}

fn default_max_rounds() -> u32 {
    20
}

fn default_max_answer_attempts() -> u32 {
    3
}

fn default_probe() -> bool {
    true
}
