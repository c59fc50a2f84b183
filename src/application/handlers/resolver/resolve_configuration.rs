//! ResolveConfigurationHandler - Drives a resolution session to completion.
//!
//! One round: submit the document to the rule engine, adopt its output, and
//! if anything is missing, ask each question in the order received and write
//! the answers into a working copy of the document. The copy replaces the
//! session document only once the whole round is answered, so a failed round
//! leaves the engine's last output untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::SessionConfig;
use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::resolver::{
    inject, translate, Document, DocumentPath, MissingElementDescriptor, ModelTarget,
    QuestionSpec, Resolution, ResolutionSession, ResolverError, RoundStage,
};
use crate::ports::{AnswerRequest, AnswerSource, ConfigurationEngine, ConfigureRequest};

/// Limits applied to every session the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Rounds allowed before the session fails with `NonConvergence`.
    pub max_rounds: u32,
    /// Times a question is asked before a rejected answer fails the round.
    pub max_answer_attempts: u32,
    /// Wall-clock budget for one round, engine call and answers included.
    pub round_timeout: Option<Duration>,
    /// Probe the engine before the first round.
    pub probe_before_start: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            max_answer_attempts: 3,
            round_timeout: None,
            probe_before_start: true,
        }
    }
}

impl From<&SessionConfig> for ResolverSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            max_rounds: config.max_rounds,
            max_answer_attempts: config.max_answer_attempts,
            round_timeout: config.round_timeout(),
            probe_before_start: config.probe_before_start,
        }
    }
}

/// Command to resolve a skeleton document against one engine model.
#[derive(Debug, Clone)]
pub struct ResolveConfigurationCommand {
    pub target: ModelTarget,
    pub lang: String,
    pub document: Document,
}

/// Handler for resolution sessions.
pub struct ResolveConfigurationHandler<E: ?Sized + ConfigurationEngine, A: ?Sized + AnswerSource> {
    engine: Arc<E>,
    answers: Arc<A>,
    settings: ResolverSettings,
}

impl<E, A> ResolveConfigurationHandler<E, A>
where
    E: ?Sized + ConfigurationEngine,
    A: ?Sized + AnswerSource,
{
    pub fn new(engine: Arc<E>, answers: Arc<A>, settings: ResolverSettings) -> Self {
        Self {
            engine,
            answers,
            settings,
        }
    }

    /// Starts a new session for the command and runs it to completion.
    pub async fn handle(
        &self,
        cmd: ResolveConfigurationCommand,
    ) -> Result<Resolution, ResolverError> {
        let mut session = ResolutionSession::new(cmd.target, cmd.lang, cmd.document);
        self.run(&mut session).await
    }

    /// Runs an existing session until it is resolved or fails.
    ///
    /// On failure the session is left in `Failed` with the error recorded
    /// and its document at the last state the engine returned.
    pub async fn run(&self, session: &mut ResolutionSession) -> Result<Resolution, ResolverError> {
        if session.status().is_terminal() {
            return Err(ResolverError::InvalidTransition(ValidationError::invalid_format(
                "session",
                format!("session {} is already {}", session.id(), session.status()),
            )));
        }

        let span = info_span!(
            "resolution",
            session_id = %session.id(),
            app_path = %session.target().app_path(),
            operation = %session.target().operation(),
        );

        async {
            if self.settings.probe_before_start && session.round() == 0 {
                if !self.engine.probe().await {
                    warn!("Rule engine probe failed; not starting session");
                    return Err(session.fail(ResolverError::EngineUnavailable));
                }
                debug!("Rule engine is available");
            }

            match self.drive(session).await {
                Ok(resolution) => {
                    info!(rounds = resolution.rounds, "Configuration resolved");
                    Ok(resolution)
                }
                Err(error) => {
                    warn!(round = session.round(), %error, "Resolution failed");
                    Err(session.fail(error))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, session: &mut ResolutionSession) -> Result<Resolution, ResolverError> {
        loop {
            if session.round() >= self.settings.max_rounds {
                return Err(ResolverError::NonConvergence {
                    max_rounds: self.settings.max_rounds,
                });
            }

            let round = session.begin_round()?;
            let deadline = self.settings.round_timeout.map(|limit| Instant::now() + limit);

            let request = ConfigureRequest::new(
                session.target().clone(),
                session.lang(),
                session.document().clone(),
            );
            debug!(round, "Sending document to rule engine");
            let response = within(deadline, round, RoundStage::Engine, self.engine.configure(request))
                .await?
                .map_err(|e| ResolverError::EngineRequestFailed {
                    round,
                    status: e.status(),
                    message: e.to_string(),
                })?;

            let resolved = response.is_resolved();
            let output = response
                .output
                .unwrap_or_else(|| session.document().clone());
            session.adopt_engine_output(output, response.computation_details);

            if resolved {
                return session.resolve();
            }
            let missing = response.missing_data;
            debug!(round, missing = missing.len(), "Rule engine reported missing data");

            let questions = missing
                .iter()
                .map(|descriptor| translate(descriptor).map_err(|e| e.in_round(round)))
                .collect::<Result<Vec<_>, _>>()?;
            session.await_answers(questions.clone())?;

            let mut working = session.document().clone();
            for (descriptor, question) in missing.iter().zip(questions) {
                self.answer_into(&mut working, descriptor, question, round, deadline)
                    .await?;
            }
            session.commit_answers(working)?;
        }
    }

    /// Asks one question and injects the answer, re-asking on rejected answers.
    async fn answer_into(
        &self,
        working: &mut Document,
        descriptor: &MissingElementDescriptor,
        question: QuestionSpec,
        round: u32,
        deadline: Option<Instant>,
    ) -> Result<(), ResolverError> {
        // Don't ask a question whose answer has nowhere to go.
        DocumentPath::parse(&descriptor.target)
            .resolve_container(working)
            .map_err(|e| e.with_descriptor(descriptor).in_round(round))?;

        let path = question.path.clone();
        let mut request = AnswerRequest::new(question, round);
        loop {
            let answer = within(deadline, round, RoundStage::Answer, self.answers.answer(&request))
                .await?
                .map_err(|e| {
                    ResolverError::answer_unavailable(path.clone(), e.to_string())
                        .with_descriptor(descriptor)
                        .in_round(round)
                })?;

            match inject(working, descriptor, &answer) {
                Ok(_) => return Ok(()),
                Err(error)
                    if error.is_recoverable() && request.attempt < self.settings.max_answer_attempts =>
                {
                    warn!(%path, attempt = request.attempt, %error, "Answer rejected; asking again");
                    request = request.retry(error.to_string());
                }
                Err(error) => return Err(error.with_descriptor(descriptor).in_round(round)),
            }
        }
    }
}

/// Awaits `future`, bounded by the round deadline when one is set.
async fn within<F: Future>(
    deadline: Option<Instant>,
    round: u32,
    stage: RoundStage,
    future: F,
) -> Result<F::Output, ResolverError> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future)
            .await
            .map_err(|_| ResolverError::RoundDeadlineExceeded { round, stage }),
        None => Ok(future.await),
    }
}
