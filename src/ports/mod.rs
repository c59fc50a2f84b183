//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the resolver and the outside world. Adapters implement these ports.
//!
//! - `ConfigurationEngine` - The rule engine that completes documents
//! - `AnswerSource` - Whoever answers the generated questions

mod answer_source;
mod configuration_engine;

pub use answer_source::{AnswerError, AnswerRequest, AnswerSource};
pub use configuration_engine::{ConfigurationEngine, ConfigureRequest, EngineError, EngineResponse};
