//! ResolutionStatus enum for tracking the protocol state of a resolution session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Protocol state of a resolution session.
///
/// ```text
/// AwaitingEngineResponse --(missing data)--> AwaitingAnswers
/// AwaitingEngineResponse --(no missing data)--> Resolved
/// AwaitingAnswers --(round answered)--> AwaitingEngineResponse
/// any non-terminal --> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    #[default]
    AwaitingEngineResponse,
    AwaitingAnswers,
    Resolved,
    Failed,
}

impl ResolutionStatus {
    /// Returns true if the session finished with a complete document.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionStatus::Resolved)
    }

    /// Returns true if the session stopped on an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolutionStatus::Failed)
    }
}

impl StateMachine for ResolutionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use ResolutionStatus::*;
        match self {
            AwaitingEngineResponse => vec![AwaitingAnswers, Resolved, Failed],
            AwaitingAnswers => vec![AwaitingEngineResponse, Failed],
            Resolved | Failed => vec![],
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionStatus::AwaitingEngineResponse => "AwaitingEngineResponse",
            ResolutionStatus::AwaitingAnswers => "AwaitingAnswers",
            ResolutionStatus::Resolved => "Resolved",
            ResolutionStatus::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResolutionStatus::*;

    #[test]
    fn default_is_awaiting_engine_response() {
        assert_eq!(ResolutionStatus::default(), AwaitingEngineResponse);
    }

    #[test]
    fn engine_response_leads_to_answers_or_resolution() {
        assert!(AwaitingEngineResponse.can_transition_to(&AwaitingAnswers));
        assert!(AwaitingEngineResponse.can_transition_to(&Resolved));
        assert!(AwaitingEngineResponse.can_transition_to(&Failed));
    }

    #[test]
    fn answers_lead_back_to_engine() {
        assert!(AwaitingAnswers.can_transition_to(&AwaitingEngineResponse));
        assert!(!AwaitingAnswers.can_transition_to(&Resolved));
    }

    #[test]
    fn resolved_and_failed_are_terminal() {
        assert!(Resolved.is_terminal());
        assert!(Failed.is_terminal());
        assert!(Resolved.transition_to(AwaitingEngineResponse).is_err());
        assert!(Failed.transition_to(AwaitingAnswers).is_err());
    }

    #[test]
    fn non_terminal_states_can_fail() {
        for status in [AwaitingEngineResponse, AwaitingAnswers] {
            assert!(!status.is_terminal());
            assert_eq!(status.transition_to(Failed), Ok(Failed));
        }
    }

    #[test]
    fn display_works_correctly() {
        assert_eq!(format!("{}", AwaitingAnswers), "AwaitingAnswers");
        assert_eq!(format!("{}", Resolved), "Resolved");
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&AwaitingEngineResponse).unwrap(),
            "\"awaiting_engine_response\""
        );
        assert_eq!(serde_json::to_string(&Failed).unwrap(), "\"failed\"");
    }
}
