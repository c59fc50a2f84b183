//! Error taxonomy for configuration resolution.

use std::fmt;

use crate::domain::foundation::ValidationError;

use super::MissingElementDescriptor;

/// Where a round was waiting when its deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStage {
    /// Waiting for the rule engine's configure response.
    Engine,
    /// Waiting for the answer source.
    Answer,
}

impl fmt::Display for RoundStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundStage::Engine => write!(f, "waiting for the rule engine"),
            RoundStage::Answer => write!(f, "waiting for an answer"),
        }
    }
}

/// Errors raised while resolving a configuration document.
///
/// Every variant that relates to a specific missing element carries its
/// path, and the round number once the session loop has attached it, so a
/// caller can report or retry without re-deriving context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolverError {
    /// The liveness probe failed before the session started.
    #[error("rule engine is unavailable")]
    EngineUnavailable,

    /// The configure call failed (non-success status, unreachable, malformed body).
    #[error("rule engine request failed in round {round}: {message}")]
    EngineRequestFailed {
        round: u32,
        status: Option<u16>,
        message: String,
    },

    /// A missing-element descriptor lacks mandatory content.
    #[error("cannot map missing element '{path}': {reason}")]
    DescriptorMapping {
        path: String,
        round: Option<u32>,
        reason: String,
        descriptor: Box<MissingElementDescriptor>,
    },

    /// The descriptor's target does not exist in the current document.
    #[error("path '{path}' does not resolve to an object in the current document")]
    PathResolution {
        path: String,
        round: Option<u32>,
        descriptor: Option<Box<MissingElementDescriptor>>,
    },

    /// The answer cannot be coerced to the declared member type.
    #[error("cannot use '{value}' as {member_type} for '{path}': {reason}")]
    ValueCoercion {
        path: String,
        member_type: String,
        value: String,
        reason: String,
        round: Option<u32>,
        descriptor: Option<Box<MissingElementDescriptor>>,
    },

    /// A collection accepts several element types and the answer did not pick one.
    #[error("'{path}' accepts several element types ({}); choose one", .candidates.join(", "))]
    AmbiguousElementType {
        path: String,
        candidates: Vec<String>,
        round: Option<u32>,
        descriptor: Option<Box<MissingElementDescriptor>>,
    },

    /// The answer source could not provide an answer.
    #[error("no answer for '{path}': {message}")]
    AnswerUnavailable {
        path: String,
        message: String,
        round: Option<u32>,
        descriptor: Option<Box<MissingElementDescriptor>>,
    },

    /// The per-round deadline expired.
    #[error("round {round} exceeded its deadline while {stage}")]
    RoundDeadlineExceeded { round: u32, stage: RoundStage },

    /// The round ceiling was reached without the engine reporting completion.
    #[error("configuration did not converge within {max_rounds} rounds")]
    NonConvergence { max_rounds: u32 },

    /// The session was driven through a transition its state does not allow.
    #[error("invalid session transition: {0}")]
    InvalidTransition(#[from] ValidationError),
}

impl ResolverError {
    /// Creates a path resolution error for a dotted path.
    pub fn path_resolution(path: impl Into<String>) -> Self {
        Self::PathResolution {
            path: path.into(),
            round: None,
            descriptor: None,
        }
    }

    /// Creates a value coercion error for a descriptor and the rejected answer.
    pub fn value_coercion(
        descriptor: &MissingElementDescriptor,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValueCoercion {
            path: descriptor.path(),
            member_type: descriptor.member_type.clone(),
            value: value.into(),
            reason: reason.into(),
            round: None,
            descriptor: Some(Box::new(descriptor.clone())),
        }
    }

    /// Creates an ambiguity error listing the candidate element types.
    pub fn ambiguous_element_type(
        descriptor: &MissingElementDescriptor,
        candidates: Vec<String>,
    ) -> Self {
        Self::AmbiguousElementType {
            path: descriptor.path(),
            candidates,
            round: None,
            descriptor: Some(Box::new(descriptor.clone())),
        }
    }

    /// Creates an error for an answer source that produced no answer.
    pub fn answer_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AnswerUnavailable {
            path: path.into(),
            message: message.into(),
            round: None,
            descriptor: None,
        }
    }

    /// Attaches the round number to errors that track it.
    pub fn in_round(mut self, current: u32) -> Self {
        match &mut self {
            Self::DescriptorMapping { round, .. }
            | Self::PathResolution { round, .. }
            | Self::ValueCoercion { round, .. }
            | Self::AmbiguousElementType { round, .. }
            | Self::AnswerUnavailable { round, .. } => {
                *round = Some(current);
            }
            _ => {}
        }
        self
    }

    /// Attaches the offending descriptor to errors about a single missing element.
    pub fn with_descriptor(mut self, source: &MissingElementDescriptor) -> Self {
        match &mut self {
            Self::PathResolution { descriptor, .. }
            | Self::ValueCoercion { descriptor, .. }
            | Self::AmbiguousElementType { descriptor, .. }
            | Self::AnswerUnavailable { descriptor, .. } => {
                *descriptor = Some(Box::new(source.clone()));
            }
            _ => {}
        }
        self
    }

    /// Returns true if asking for a different answer can fix this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ValueCoercion { .. } | Self::AmbiguousElementType { .. }
        )
    }

    /// Returns the round the error occurred in, when known.
    pub fn round(&self) -> Option<u32> {
        match self {
            Self::EngineRequestFailed { round, .. } | Self::RoundDeadlineExceeded { round, .. } => {
                Some(*round)
            }
            Self::DescriptorMapping { round, .. }
            | Self::PathResolution { round, .. }
            | Self::ValueCoercion { round, .. }
            | Self::AmbiguousElementType { round, .. }
            | Self::AnswerUnavailable { round, .. } => *round,
            _ => None,
        }
    }

    /// Returns the raw descriptor the error concerns, when known.
    pub fn descriptor(&self) -> Option<&MissingElementDescriptor> {
        match self {
            Self::DescriptorMapping { descriptor, .. } => Some(descriptor.as_ref()),
            Self::PathResolution { descriptor, .. }
            | Self::ValueCoercion { descriptor, .. }
            | Self::AmbiguousElementType { descriptor, .. }
            | Self::AnswerUnavailable { descriptor, .. } => descriptor.as_deref(),
            _ => None,
        }
    }
}
