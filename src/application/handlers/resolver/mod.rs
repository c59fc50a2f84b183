//! Resolver handlers - Running resolution sessions against the rule engine.

mod resolve_configuration;

pub use resolve_configuration::{
    ResolveConfigurationCommand, ResolveConfigurationHandler, ResolverSettings,
};
