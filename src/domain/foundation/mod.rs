//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, time values, the state machine trait and the
//! validation error type shared by the resolver domain.

mod errors;
mod ids;
mod resolution_status;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ResolutionSessionId;
pub use resolution_status::ResolutionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
