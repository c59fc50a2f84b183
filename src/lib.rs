//! SaaS Configurator - Interactive configuration resolver
//!
//! Drives an external rule engine to complete a partial configuration
//! document: the engine reports which elements are still missing, each one is
//! turned into a typed question, and the answers are written back into the
//! document until the engine has nothing left to ask.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
