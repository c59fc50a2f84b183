//! UI-ready question specifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value with a display label, used for enum options and collection element types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValuePair {
    pub v: String,
    #[serde(rename = "l", alias = "label")]
    pub label: String,
}

impl LabelValuePair {
    /// Creates a new pair.
    pub fn new(v: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            label: label.into(),
        }
    }
}

/// Bounds and granularity for numeric questions, kept as strings for UI inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl NumericRange {
    /// Creates an unbounded range with the given step.
    pub fn with_step(step: impl Into<String>) -> Self {
        Self {
            min: None,
            max: None,
            step: Some(step.into()),
        }
    }
}

/// Bounds for date and date-time questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// The widget a question should be rendered with, with its constraints.
///
/// Decoded once from the wire vocabulary by the translator; nothing
/// downstream inspects raw type tags again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeInfo {
    NumberType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<NumericRange>,
    },
    TextType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        regex: Option<String>,
        #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
        min_length: Option<u64>,
        #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u64>,
    },
    EnumType {
        #[serde(rename = "possibleValues")]
        possible_values: Vec<LabelValuePair>,
    },
    BooleanType,
    DateType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<DateRange>,
    },
    DateTimeType {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<DateRange>,
    },
    ObjectCollectionType {
        #[serde(rename = "minSize")]
        min_size: u64,
        #[serde(rename = "maxSize", default, skip_serializing_if = "Option::is_none")]
        max_size: Option<u64>,
        #[serde(rename = "possibleTypes")]
        possible_types: Vec<LabelValuePair>,
    },
    SimpleCollectionType {
        #[serde(rename = "minSize")]
        min_size: u64,
        #[serde(rename = "maxSize", default, skip_serializing_if = "Option::is_none")]
        max_size: Option<u64>,
        #[serde(rename = "elementType")]
        element_type: String,
    },
}

impl TypeInfo {
    /// Free text without constraints.
    pub fn text() -> Self {
        TypeInfo::TextType {
            regex: None,
            min_length: None,
            max_length: None,
        }
    }

    /// Number input with the given step and no bounds.
    pub fn number_with_step(step: impl Into<String>) -> Self {
        TypeInfo::NumberType {
            range: Some(NumericRange::with_step(step)),
        }
    }
}

/// A question derived from one missing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    /// `target.member` of the missing element.
    pub path: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// The raw `memberType` the engine declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_type_name: Option<String>,
    pub type_info: TypeInfo,
}
