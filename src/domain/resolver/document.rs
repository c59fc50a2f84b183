//! Dotted-path navigation over configuration documents.
//!
//! A document is plain JSON. Paths address nested mappings by key only;
//! indexed segments such as `brokers[1]` are not interpreted and are looked
//! up as literal keys, so they fail to resolve against real documents.

use serde_json::{Map, Value};
use std::fmt;

use super::ResolverError;

/// The configuration document exchanged with the rule engine each round.
pub type Document = Value;

/// A dot-separated path to a mapping inside a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Splits a dotted path into its key segments.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns the key segments in navigation order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns a new path with `member` appended.
    pub fn child(&self, member: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(member.to_string());
        Self { segments }
    }

    /// Finds the mapping this path points at without modifying the document.
    pub fn resolve_container<'a>(
        &self,
        document: &'a Document,
    ) -> Result<&'a Map<String, Value>, ResolverError> {
        let mut current = document;
        for segment in &self.segments {
            current = current
                .as_object()
                .and_then(|map| map.get(segment))
                .ok_or_else(|| self.unresolved())?;
        }
        current.as_object().ok_or_else(|| self.unresolved())
    }

    /// Finds the mapping this path points at for mutation.
    ///
    /// Never creates missing keys: an absent segment, or a segment that holds
    /// a non-mapping value, is a [`ResolverError::PathResolution`].
    pub fn resolve_container_mut<'a>(
        &self,
        document: &'a mut Document,
    ) -> Result<&'a mut Map<String, Value>, ResolverError> {
        let mut current = document;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get_mut(segment).ok_or_else(|| self.unresolved())?,
                _ => return Err(self.unresolved()),
            };
        }
        match current {
            Value::Object(map) => Ok(map),
            _ => Err(self.unresolved()),
        }
    }

    fn unresolved(&self) -> ResolverError {
        ResolverError::path_resolution(self.to_string())
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
