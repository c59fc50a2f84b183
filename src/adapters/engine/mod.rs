//! Rule Engine Adapters.
//!
//! Implementations of the ConfigurationEngine port.
//!
//! - `HttpConfigurationEngine` - The engine's REST API over reqwest
//! - `MockConfigurationEngine` - Scripted engine for testing

mod http_engine;
mod mock_engine;

pub use http_engine::{HttpConfigurationEngine, HttpEngineConfig};
pub use mock_engine::{MockConfigurationEngine, MockEngineReply};
