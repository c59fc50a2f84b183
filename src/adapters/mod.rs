//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the resolver to external systems:
//! - `engine` - Rule engine clients (HTTP, mock)
//! - `answers` - Answer sources (terminal prompt, scripted)

pub mod answers;
pub mod engine;

pub use answers::{PromptAnswerSource, ScriptedAnswerSource};
pub use engine::{HttpConfigurationEngine, HttpEngineConfig, MockConfigurationEngine};
