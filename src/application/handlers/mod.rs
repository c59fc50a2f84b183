//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod resolver;

pub use resolver::{ResolveConfigurationCommand, ResolveConfigurationHandler, ResolverSettings};
