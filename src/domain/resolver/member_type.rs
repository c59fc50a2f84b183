//! Closed decoding of the rule engine's `memberType` tags.

use std::fmt;

/// Scalar wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Text,
    Integer,
    Number,
    Date,
    DateTime,
}

impl ScalarType {
    /// Decodes an exact scalar tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Boolean" => Some(ScalarType::Boolean),
            "Text" => Some(ScalarType::Text),
            "Integer" => Some(ScalarType::Integer),
            "Number" => Some(ScalarType::Number),
            "Date" => Some(ScalarType::Date),
            "DateTime" => Some(ScalarType::DateTime),
            _ => None,
        }
    }

    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "Boolean",
            ScalarType::Text => "Text",
            ScalarType::Integer => "Integer",
            ScalarType::Number => "Number",
            ScalarType::Date => "Date",
            ScalarType::DateTime => "DateTime",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection tag families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `List[...]`
    List,
    /// `NEList[...]`
    NonEmptyList,
    /// `Option[...]`
    Option,
}

// `NEList[` must be tested before `List[`, which it contains.
const COLLECTION_MARKERS: [(&str, CollectionKind); 3] = [
    ("NEList[", CollectionKind::NonEmptyList),
    ("List[", CollectionKind::List),
    ("Option[", CollectionKind::Option),
];

/// A decoded `memberType`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberType {
    Scalar(ScalarType),
    Collection {
        kind: CollectionKind,
        /// Raw tag between the brackets, e.g. `x.y.Broker` or `Text`.
        element: String,
    },
    /// A tag this client does not know; treated as free text.
    Unknown(String),
}

impl MemberType {
    /// Decodes a wire tag. Collection tags are recognised by substring, so
    /// decorated tags such as `scala.List[x.Foo]` still count as collections.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        if let Some(scalar) = ScalarType::from_tag(tag) {
            return MemberType::Scalar(scalar);
        }

        for (marker, kind) in COLLECTION_MARKERS {
            if let Some(start) = tag.find(marker) {
                let inner = &tag[start + marker.len()..];
                let element = match inner.rfind(']') {
                    Some(end) => &inner[..end],
                    None => inner,
                };
                return MemberType::Collection {
                    kind,
                    element: element.trim().to_string(),
                };
            }
        }

        MemberType::Unknown(tag.to_string())
    }

    /// Returns true for `List[...]`, `NEList[...]` and `Option[...]` tags.
    pub fn is_collection(&self) -> bool {
        matches!(self, MemberType::Collection { .. })
    }

    /// Returns the scalar element type of a collection such as `List[Text]`.
    pub fn scalar_element(&self) -> Option<ScalarType> {
        match self {
            MemberType::Collection { element, .. } => ScalarType::from_tag(element),
            _ => None,
        }
    }
}
