//! Missing-element descriptors as reported by the rule engine.
//!
//! Every field is decoded leniently: a field of the wrong shape reads as
//! absent instead of rejecting the whole engine response. Absent routing
//! fields (`target`, `member`, `memberType`) decode as empty strings and are
//! rejected per descriptor by the translator.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{LabelValuePair, MemberType};

/// One field the rule engine still needs before the document is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingElementDescriptor {
    /// Dotted path to the object that owns the missing member.
    #[serde(default, deserialize_with = "lenient_field")]
    pub target: String,
    /// Name of the missing member inside `target`.
    #[serde(default, deserialize_with = "lenient_field")]
    pub member: String,
    /// Wire type tag, e.g. `Integer` or `List[demo.config.Broker]`.
    #[serde(default, deserialize_with = "lenient_field")]
    pub member_type: String,
    #[serde(default)]
    pub details: DescriptorDetails,
}

/// Human-facing details of a missing element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorDetails {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Value>,
}

fn lenient_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

impl MissingElementDescriptor {
    /// Creates a descriptor with a question and no restriction.
    pub fn new(
        target: impl Into<String>,
        member: impl Into<String>,
        member_type: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            member: member.into(),
            member_type: member_type.into(),
            details: DescriptorDetails {
                question: Some(question.into()),
                ..DescriptorDetails::default()
            },
        }
    }

    /// Sets the explanatory info text.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.details.info = Some(info.into());
        self
    }

    /// Sets the raw restriction object.
    pub fn with_restriction(mut self, restriction: Value) -> Self {
        self.details.restriction = Some(restriction);
        self
    }

    /// Sets the raw collection object.
    pub fn with_collection(mut self, collection: Value) -> Self {
        self.details.collection = Some(collection);
        self
    }

    /// Returns `target.member`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.target, self.member)
    }

    /// Returns the wire name of the first empty routing field, if any.
    pub fn missing_routing_field(&self) -> Option<&'static str> {
        [
            ("target", &self.target),
            ("member", &self.member),
            ("memberType", &self.member_type),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Decodes `memberType`.
    pub fn parsed_member_type(&self) -> MemberType {
        MemberType::parse(&self.member_type)
    }

    /// Decodes `details.restriction`, if it is a recognised restriction.
    pub fn restriction(&self) -> Option<Restriction> {
        self.details.restriction.as_ref().and_then(Restriction::from_value)
    }

    /// Decodes `details.collection`, if present as an object.
    pub fn collection_info(&self) -> Option<CollectionInfo> {
        self.details.collection.as_ref().and_then(CollectionInfo::from_value)
    }
}

/// Which numeric domain a numeric restriction applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericUnderlying {
    Integer,
    Number,
}

/// A decoded `details.restriction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    Enum {
        possible_values: Vec<LabelValuePair>,
    },
    Text {
        regex: Option<String>,
        min_length: Option<u64>,
        max_length: Option<u64>,
    },
    Numeric {
        underlying: NumericUnderlying,
        min: Option<String>,
        max: Option<String>,
        step: Option<String>,
    },
    /// Bounds for `Date` and `DateTime` members, as ISO-8601 strings.
    Date {
        min: Option<String>,
        max: Option<String>,
    },
}

impl Restriction {
    /// Decodes a restriction object. Returns `None` for non-objects and
    /// unknown restriction types.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        match object.get("type").and_then(Value::as_str)? {
            "enum" => Some(Restriction::Enum {
                possible_values: object
                    .get("possibleValues")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().filter_map(label_value_pair).collect())
                    .unwrap_or_default(),
            }),
            "text" => Some(Restriction::Text {
                regex: object
                    .get("regex")
                    .and_then(Value::as_str)
                    .filter(|regex| !regex.is_empty())
                    .map(str::to_string),
                min_length: positive_integer(object.get("minLength")),
                max_length: positive_integer(object.get("maxLength")),
            }),
            "numeric" => Some(Restriction::Numeric {
                underlying: match object.get("underlying").and_then(Value::as_str) {
                    Some("Integer") => NumericUnderlying::Integer,
                    _ => NumericUnderlying::Number,
                },
                min: object.get("min").and_then(bound),
                max: object.get("max").and_then(bound),
                step: object.get("step").and_then(scalar_string),
            }),
            "date" => Some(Restriction::Date {
                min: object.get("min").and_then(bound),
                max: object.get("max").and_then(bound),
            }),
            _ => None,
        }
    }
}

/// A decoded `details.collection`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionInfo {
    pub min: u64,
    pub max: Option<u64>,
    /// Fully qualified element type names.
    pub possible_element_types: Vec<String>,
}

impl CollectionInfo {
    /// Decodes a collection object; malformed members read as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            min: object.get("min").and_then(Value::as_u64).unwrap_or(0),
            max: object.get("max").and_then(Value::as_u64),
            possible_element_types: object
                .get("possibleElementTypes")
                .and_then(Value::as_array)
                .map(|types| {
                    types
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn label_value_pair(value: &Value) -> Option<LabelValuePair> {
    let v = value.get("v").and_then(scalar_string)?;
    let label = value
        .get("label")
        .or_else(|| value.get("l"))
        .and_then(scalar_string)
        .unwrap_or_else(|| v.clone());
    Some(LabelValuePair { v, label })
}

/// Reads `{bound: x}` or a bare scalar as a string.
fn bound(value: &Value) -> Option<String> {
    match value.get("bound") {
        Some(inner) => scalar_string(inner),
        None => scalar_string(value),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Zero counts as falsy, like an absent constraint.
fn positive_integer(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64).filter(|n| *n > 0)
}
