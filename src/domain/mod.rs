//! Domain layer - Pure resolution logic with no I/O.

pub mod foundation;
pub mod resolver;
