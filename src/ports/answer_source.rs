//! Answer Source Port - Where answers to generated questions come from.
//!
//! A human behind a terminal or UI, or an automated supplier. The session
//! loop asks one question at a time and waits for each answer.

use async_trait::async_trait;

use crate::domain::resolver::{Answer, QuestionSpec};

/// Port for obtaining answers to questions.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Returns the answer to one question.
    async fn answer(&self, request: &AnswerRequest) -> Result<Answer, AnswerError>;
}

/// A question put to the answer source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRequest {
    pub question: QuestionSpec,
    /// Round the question belongs to.
    pub round: u32,
    /// 1 for the first ask, incremented on each re-ask.
    pub attempt: u32,
    /// Why the previous answer was rejected.
    pub previous_error: Option<String>,
}

impl AnswerRequest {
    /// Creates a first-attempt request.
    pub fn new(question: QuestionSpec, round: u32) -> Self {
        Self {
            question,
            round,
            attempt: 1,
            previous_error: None,
        }
    }

    /// Creates the follow-up request after a rejected answer.
    pub fn retry(&self, error: impl Into<String>) -> Self {
        Self {
            question: self.question.clone(),
            round: self.round,
            attempt: self.attempt + 1,
            previous_error: Some(error.into()),
        }
    }

    /// Returns true if a previous answer was rejected.
    pub fn is_retry(&self) -> bool {
        self.previous_error.is_some()
    }
}

/// Answer source errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    /// The input was closed before an answer arrived.
    #[error("input closed")]
    Closed,

    /// The source has no answer for this question.
    #[error("no answer available for '{0}'")]
    NoAnswer(String),

    /// Reading or writing the prompt failed.
    #[error("answer source failed: {0}")]
    Io(String),
}
