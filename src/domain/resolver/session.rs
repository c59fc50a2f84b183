//! The resolution session aggregate.
//!
//! Holds the document under construction and the protocol state. The
//! session loop in the application layer drives it; every status change goes
//! through [`StateMachine::transition_to`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ResolutionSessionId, ResolutionStatus, StateMachine, Timestamp, ValidationError,
};

use super::{Document, QuestionSpec, ResolverError};

/// The rule engine model a session configures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelTarget {
    app_path: String,
    operation: String,
}

impl ModelTarget {
    /// Creates a target. Leading and trailing slashes of `app_path` are dropped.
    pub fn new(
        app_path: impl AsRef<str>,
        operation: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let app_path = app_path.as_ref().trim().trim_matches('/');
        let operation = operation.as_ref().trim();
        if app_path.is_empty() {
            return Err(ValidationError::empty_field("app_path"));
        }
        if operation.is_empty() {
            return Err(ValidationError::empty_field("operation"));
        }
        Ok(Self {
            app_path: app_path.to_string(),
            operation: operation.to_string(),
        })
    }

    /// Application path inside the engine, without surrounding slashes.
    pub fn app_path(&self) -> &str {
        &self.app_path
    }

    /// Fully qualified operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Which engine application produced a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputationDetails {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub operation: String,
}

/// What happened in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub round: u32,
    pub started_at: Timestamp,
    /// Questions asked in this round; empty if the engine reported nothing missing.
    pub questions: Vec<QuestionSpec>,
}

/// The final result of a resolved session.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub session_id: ResolutionSessionId,
    pub document: Document,
    pub computation_details: Option<ComputationDetails>,
    pub rounds: u32,
}

/// One attempt to complete a configuration document.
#[derive(Debug, Clone)]
pub struct ResolutionSession {
    id: ResolutionSessionId,
    target: ModelTarget,
    lang: String,
    document: Document,
    status: ResolutionStatus,
    round: u32,
    computation_details: Option<ComputationDetails>,
    history: Vec<RoundRecord>,
    failure: Option<ResolverError>,
}

impl ResolutionSession {
    /// Starts a session from a skeleton document.
    pub fn new(target: ModelTarget, lang: impl Into<String>, document: Document) -> Self {
        Self {
            id: ResolutionSessionId::new(),
            target,
            lang: lang.into(),
            document,
            status: ResolutionStatus::default(),
            round: 0,
            computation_details: None,
            history: Vec::new(),
            failure: None,
        }
    }

    /// Starts a fresh session from this one's last-known document.
    ///
    /// Used to retry after a failure: the new session has its own id and
    /// round counter but keeps the target, language and document.
    pub fn restart(&self) -> Self {
        Self::new(self.target.clone(), self.lang.clone(), self.document.clone())
    }

    pub fn id(&self) -> ResolutionSessionId {
        self.id
    }

    pub fn target(&self) -> &ModelTarget {
        &self.target
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The current document. After a failed round this is the engine's last output.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    /// Number of rounds started so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn computation_details(&self) -> Option<&ComputationDetails> {
        self.computation_details.as_ref()
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// The error that moved the session to `Failed`, if any.
    pub fn failure(&self) -> Option<&ResolverError> {
        self.failure.as_ref()
    }

    /// Starts the next round and returns its number.
    pub fn begin_round(&mut self) -> Result<u32, ResolverError> {
        if self.status != ResolutionStatus::AwaitingEngineResponse {
            return Err(ValidationError::invalid_format(
                "round",
                format!("cannot start a round while {}", self.status),
            )
            .into());
        }
        self.round += 1;
        self.history.push(RoundRecord {
            round: self.round,
            started_at: Timestamp::now(),
            questions: Vec::new(),
        });
        Ok(self.round)
    }

    /// Replaces the document with the engine's output.
    pub fn adopt_engine_output(
        &mut self,
        output: Document,
        computation_details: Option<ComputationDetails>,
    ) {
        self.document = output;
        if computation_details.is_some() {
            self.computation_details = computation_details;
        }
    }

    /// Records this round's questions and waits for answers.
    pub fn await_answers(&mut self, questions: Vec<QuestionSpec>) -> Result<(), ResolverError> {
        self.status = self.status.transition_to(ResolutionStatus::AwaitingAnswers)?;
        if let Some(record) = self.history.last_mut() {
            record.questions = questions;
        }
        Ok(())
    }

    /// Commits a fully answered round and goes back to the engine.
    pub fn commit_answers(&mut self, document: Document) -> Result<(), ResolverError> {
        self.status = self
            .status
            .transition_to(ResolutionStatus::AwaitingEngineResponse)?;
        self.document = document;
        Ok(())
    }

    /// Marks the session resolved and returns its result.
    pub fn resolve(&mut self) -> Result<Resolution, ResolverError> {
        self.status = self.status.transition_to(ResolutionStatus::Resolved)?;
        Ok(Resolution {
            session_id: self.id,
            document: self.document.clone(),
            computation_details: self.computation_details.clone(),
            rounds: self.round,
        })
    }

    /// Marks the session failed, keeping the error, and hands the error back.
    ///
    /// A session that is already terminal keeps its status and first failure.
    pub fn fail(&mut self, error: ResolverError) -> ResolverError {
        if let Ok(failed) = self.status.transition_to(ResolutionStatus::Failed) {
            self.status = failed;
            self.failure = Some(error.clone());
        }
        error
    }
}
