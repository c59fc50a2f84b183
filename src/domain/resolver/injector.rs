//! Writes answers back into the document at a descriptor's location.

use serde_json::{Map, Value};
use tracing::debug;

use super::{
    simple_name, CollectionInfo, Document, DocumentPath, MemberType, MissingElementDescriptor,
    ResolverError, ScalarType,
};

/// Key the rule engine uses to tag an object with its type.
pub const TYPE_TAG_KEY: &str = "LGType_";

/// Most placeholder elements one collection answer may create, whatever the
/// descriptor's own `max`.
pub const MAX_COLLECTION_ELEMENTS: u64 = 1_000;

const TRUTHY: [&str; 4] = ["true", "t", "y", "yes"];

/// An answer to one question.
///
/// `value` is always the raw text the answer source produced. For object
/// collections that accept several element types, `element_type` carries the
/// caller's choice (qualified or simple name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub value: String,
    pub element_type: Option<String>,
}

impl Answer {
    /// Creates a plain text answer.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            element_type: None,
        }
    }

    /// Selects the element type for a collection answer.
    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::new(value)
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::new(value)
    }
}

/// Injects an answer into `document` at `descriptor.target`.`descriptor.member`.
///
/// The target container must already exist; nothing is created on the way.
/// On error the document is left untouched.
pub fn inject<'a>(
    document: &'a mut Document,
    descriptor: &MissingElementDescriptor,
    answer: &Answer,
) -> Result<&'a mut Document, ResolverError> {
    {
        let container = DocumentPath::parse(&descriptor.target)
            .resolve_container_mut(document)
            .map_err(|err| err.with_descriptor(descriptor))?;
        let value = coerce_answer(descriptor, answer)?;
        container.insert(descriptor.member.clone(), value);
    }

    debug!(path = %descriptor.path(), member_type = %descriptor.member_type, "Injected answer");
    Ok(document)
}

/// Converts a raw answer into the JSON value stored for the descriptor's member type.
pub fn coerce_answer(
    descriptor: &MissingElementDescriptor,
    answer: &Answer,
) -> Result<Value, ResolverError> {
    let member_type = descriptor.parsed_member_type();
    match member_type {
        MemberType::Scalar(ScalarType::Boolean) => Ok(Value::Bool(is_truthy(&answer.value))),
        MemberType::Scalar(ScalarType::Integer) => answer
            .value
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| {
                ResolverError::value_coercion(descriptor, &answer.value, "expected a base-10 integer")
            }),
        MemberType::Collection { .. } => placeholder_collection(descriptor, &member_type, answer),
        _ => Ok(Value::String(answer.value.clone())),
    }
}

/// Returns true for `true`, `t`, `y` and `yes`, ignoring case and surrounding space.
pub fn is_truthy(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    TRUTHY.contains(&normalized.as_str())
}

fn placeholder_collection(
    descriptor: &MissingElementDescriptor,
    member_type: &MemberType,
    answer: &Answer,
) -> Result<Value, ResolverError> {
    let count: u64 = answer.value.trim().parse().map_err(|_| {
        ResolverError::value_coercion(
            descriptor,
            &answer.value,
            "expected the number of elements to create",
        )
    })?;

    let info = descriptor.collection_info().unwrap_or_default();
    if count < info.min {
        return Err(ResolverError::value_coercion(
            descriptor,
            &answer.value,
            format!("at least {} elements are required", info.min),
        ));
    }
    let max = info
        .max
        .map_or(MAX_COLLECTION_ELEMENTS, |max| max.min(MAX_COLLECTION_ELEMENTS));
    let len = usize::try_from(count)
        .ok()
        .filter(|_| count <= max)
        .ok_or_else(|| {
            ResolverError::value_coercion(
                descriptor,
                &answer.value,
                format!("at most {} elements are allowed", max),
            )
        })?;
    if member_type.scalar_element().is_some() {
        return Ok(Value::Array(vec![Value::Null; len]));
    }
    if len == 0 {
        return Ok(Value::Array(Vec::new()));
    }

    let placeholder = match element_type(descriptor, &info, answer)? {
        Some(element_type) => {
            let mut tagged = Map::new();
            tagged.insert(TYPE_TAG_KEY.to_string(), Value::String(element_type));
            Value::Object(tagged)
        }
        None => Value::Object(Map::new()),
    };
    Ok(Value::Array(vec![placeholder; len]))
}

/// Picks the element type for placeholders.
///
/// A caller choice must name one of the candidates. Without a choice the
/// single candidate is used; several candidates are reported as ambiguous
/// rather than guessed.
fn element_type(
    descriptor: &MissingElementDescriptor,
    info: &CollectionInfo,
    answer: &Answer,
) -> Result<Option<String>, ResolverError> {
    let candidates = &info.possible_element_types;
    match &answer.element_type {
        Some(chosen) if candidates.is_empty() => Ok(Some(chosen.clone())),
        Some(chosen) => candidates
            .iter()
            .find(|candidate| *candidate == chosen || simple_name(candidate) == chosen)
            .map(|candidate| Some(candidate.clone()))
            .ok_or_else(|| {
                ResolverError::value_coercion(
                    descriptor,
                    chosen,
                    format!("element type must be one of {}", candidates.join(", ")),
                )
            }),
        None => match candidates.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.clone())),
            _ => Err(ResolverError::ambiguous_element_type(descriptor, candidates.clone())),
        },
    }
}
