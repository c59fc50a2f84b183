//! State machine trait for status enums.
//!
//! Gives lifecycle enums a single way to validate transitions, so callers
//! never assign a new status without checking it against the allowed graph.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their outgoing edges once in [`valid_transitions`];
/// `can_transition_to`, `transition_to` and `is_terminal` derive from it.
///
/// # Example
///
/// ```ignore
/// let next = ResolutionStatus::AwaitingEngineResponse
///     .transition_to(ResolutionStatus::AwaitingAnswers)?;
/// ```
///
/// [`valid_transitions`]: StateMachine::valid_transitions
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Light {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Off => vec![Light::On, Light::Broken],
                Light::On => vec![Light::Off, Light::Broken],
                Light::Broken => vec![],
            }
        }
    }

    #[test]
    fn can_transition_to_follows_valid_transitions() {
        assert!(Light::Off.can_transition_to(&Light::On));
        assert!(!Light::Off.can_transition_to(&Light::Off));
    }

    #[test]
    fn transition_to_reports_both_states_on_failure() {
        let err = Light::Broken.transition_to(Light::On).unwrap_err();
        assert!(err.to_string().contains("Cannot transition from Broken to On"));
    }

    #[test]
    fn is_terminal_only_for_states_without_edges() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::On.is_terminal());
    }
}
