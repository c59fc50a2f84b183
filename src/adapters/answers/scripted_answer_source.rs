//! Scripted answer source for automated resolution and tests.
//!
//! Answers are looked up by question path first, then taken from a shared
//! fallback queue, then from the question's default value.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::resolver::Answer;
use crate::ports::{AnswerError, AnswerRequest, AnswerSource};

/// Answer source backed by prepared answers.
#[derive(Debug, Default)]
pub struct ScriptedAnswerSource {
    by_path: Mutex<HashMap<String, VecDeque<Answer>>>,
    fallback: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<AnswerRequest>>,
}

impl ScriptedAnswerSource {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the question at `path`.
    ///
    /// Several answers for the same path are used in order, which lets a
    /// script supply a rejected answer followed by a corrected one.
    pub fn with_answer(self, path: impl Into<String>, answer: impl Into<Answer>) -> Self {
        self.by_path
            .lock()
            .unwrap()
            .entry(path.into())
            .or_default()
            .push_back(answer.into());
        self
    }

    /// Queues an answer for whichever question has no path-specific answer.
    pub fn with_fallback(self, answer: impl Into<Answer>) -> Self {
        self.fallback.lock().unwrap().push_back(answer.into());
        self
    }

    /// Returns every request received, in order.
    pub fn asked(&self) -> Vec<AnswerRequest> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerSource for ScriptedAnswerSource {
    async fn answer(&self, request: &AnswerRequest) -> Result<Answer, AnswerError> {
        self.asked.lock().unwrap().push(request.clone());

        let path = &request.question.path;
        let scripted = self
            .by_path
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        if let Some(answer) = scripted {
            return Ok(answer);
        }
        if let Some(answer) = self.fallback.lock().unwrap().pop_front() {
            return Ok(answer);
        }

        match &request.question.default_value {
            Some(Value::String(s)) => Ok(Answer::new(s.clone())),
            Some(other) => Ok(Answer::new(other.to_string())),
            None => Err(AnswerError::NoAnswer(path.clone())),
        }
    }
}
