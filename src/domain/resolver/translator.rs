//! Descriptor translation: engine vocabulary in, typed questions out.

use super::{
    CollectionInfo, DateRange, LabelValuePair, MemberType, MissingElementDescriptor,
    NumericRange, NumericUnderlying, QuestionSpec, ResolverError, Restriction, ScalarType,
    TypeInfo,
};

/// Step used for integer inputs.
pub const INTEGER_STEP: &str = "1";
/// Step used for decimal inputs.
pub const DECIMAL_STEP: &str = "0.01";

/// Maps a missing-element descriptor to a question.
///
/// Pure: no I/O. Unknown type tags and malformed optional details degrade to
/// free-text questions. A descriptor fails to map only when it lacks question
/// text or one of its routing fields.
pub fn translate(descriptor: &MissingElementDescriptor) -> Result<QuestionSpec, ResolverError> {
    if let Some(field) = descriptor.missing_routing_field() {
        return Err(ResolverError::DescriptorMapping {
            path: descriptor.path(),
            round: None,
            reason: format!("descriptor has no {}", field),
            descriptor: Box::new(descriptor.clone()),
        });
    }

    let text = descriptor
        .details
        .question
        .clone()
        .ok_or_else(|| ResolverError::DescriptorMapping {
            path: descriptor.path(),
            round: None,
            reason: "descriptor has no question text".to_string(),
            descriptor: Box::new(descriptor.clone()),
        })?;

    let member_type = descriptor.parsed_member_type();
    let type_info = match descriptor.restriction() {
        Some(restriction) => restricted_type(restriction, &member_type),
        None => base_type(&member_type, descriptor.collection_info().unwrap_or_default()),
    };

    Ok(QuestionSpec {
        path: descriptor.path(),
        text,
        info: descriptor.details.info.clone(),
        default_value: descriptor.details.default_value.clone(),
        common_type_name: Some(descriptor.member_type.clone()),
        type_info,
    })
}

/// Strips the package qualifier from a type name: `x.y.Foo` becomes `Foo`.
pub fn simple_name(qualified: &str) -> &str {
    match qualified.rsplit_once('.') {
        Some((_, name)) => name,
        None => qualified,
    }
}

fn base_type(member_type: &MemberType, collection: CollectionInfo) -> TypeInfo {
    match member_type {
        MemberType::Scalar(ScalarType::Boolean) => TypeInfo::BooleanType,
        MemberType::Scalar(ScalarType::Integer) => TypeInfo::number_with_step(INTEGER_STEP),
        MemberType::Scalar(ScalarType::Number) => TypeInfo::number_with_step(DECIMAL_STEP),
        MemberType::Scalar(ScalarType::Date) => TypeInfo::DateType { range: None },
        MemberType::Scalar(ScalarType::DateTime) => TypeInfo::DateTimeType { range: None },
        MemberType::Collection { .. } => match member_type.scalar_element() {
            Some(element) => TypeInfo::SimpleCollectionType {
                min_size: collection.min,
                max_size: collection.max,
                element_type: element.to_string(),
            },
            None => TypeInfo::ObjectCollectionType {
                min_size: collection.min,
                max_size: collection.max,
                possible_types: collection
                    .possible_element_types
                    .iter()
                    .map(|qualified| LabelValuePair::new(qualified.as_str(), simple_name(qualified)))
                    .collect(),
            },
        },
        MemberType::Scalar(ScalarType::Text) | MemberType::Unknown(_) => TypeInfo::text(),
    }
}

fn restricted_type(restriction: Restriction, member_type: &MemberType) -> TypeInfo {
    match restriction {
        Restriction::Enum { possible_values } => TypeInfo::EnumType { possible_values },
        Restriction::Text {
            regex,
            min_length,
            max_length,
        } => TypeInfo::TextType {
            regex,
            min_length,
            max_length,
        },
        Restriction::Numeric {
            underlying,
            min,
            max,
            step,
        } => {
            let default_step = match underlying {
                NumericUnderlying::Integer => INTEGER_STEP,
                NumericUnderlying::Number => DECIMAL_STEP,
            };
            TypeInfo::NumberType {
                range: Some(NumericRange {
                    min,
                    max,
                    step: Some(step.unwrap_or_else(|| default_step.to_string())),
                }),
            }
        }
        Restriction::Date { min, max } => {
            let range = (min.is_some() || max.is_some()).then_some(DateRange { min, max });
            match member_type {
                MemberType::Scalar(ScalarType::DateTime) => TypeInfo::DateTimeType { range },
                _ => TypeInfo::DateType { range },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn descriptor(member_type: &str) -> MissingElementDescriptor {
        MissingElementDescriptor::new("customer", "field", member_type, "Q")
    }

    #[test]
    fn boolean_maps_to_boolean_type() {
        let question = translate(&descriptor("Boolean")).unwrap();
        assert_eq!(question.type_info, TypeInfo::BooleanType);
        assert_eq!(question.path, "customer.field");
        assert_eq!(question.text, "Q");
        assert_eq!(question.common_type_name.as_deref(), Some("Boolean"));
    }

    #[test]
    fn text_maps_to_unconstrained_text() {
        assert_eq!(translate(&descriptor("Text")).unwrap().type_info, TypeInfo::text());
    }

    #[test]
    fn integer_and_number_get_default_steps() {
        assert_eq!(
            translate(&descriptor("Integer")).unwrap().type_info,
            TypeInfo::number_with_step("1")
        );
        assert_eq!(
            translate(&descriptor("Number")).unwrap().type_info,
            TypeInfo::number_with_step("0.01")
        );
    }

    #[test]
    fn dates_map_to_date_widgets() {
        assert_eq!(
            translate(&descriptor("Date")).unwrap().type_info,
            TypeInfo::DateType { range: None }
        );
        assert_eq!(
            translate(&descriptor("DateTime")).unwrap().type_info,
            TypeInfo::DateTimeType { range: None }
        );
    }

    #[test]
    fn date_restriction_bounds_the_date_widget() {
        let restriction = json!({ "type": "date", "min": { "bound": "2024-01-01" } });
        assert_eq!(
            translate(&descriptor("Date").with_restriction(restriction.clone()))
                .unwrap()
                .type_info,
            TypeInfo::DateType {
                range: Some(DateRange {
                    min: Some("2024-01-01".to_string()),
                    max: None,
                })
            }
        );
        assert_eq!(
            translate(&descriptor("DateTime").with_restriction(restriction))
                .unwrap()
                .type_info,
            TypeInfo::DateTimeType {
                range: Some(DateRange {
                    min: Some("2024-01-01".to_string()),
                    max: None,
                })
            }
        );
    }

    #[test]
    fn empty_date_restriction_leaves_range_unset() {
        let question =
            translate(&descriptor("Date").with_restriction(json!({ "type": "date" }))).unwrap();
        assert_eq!(question.type_info, TypeInfo::DateType { range: None });
    }

    #[test]
    fn unknown_member_type_degrades_to_text() {
        let question = translate(&descriptor("Mystery")).unwrap();
        assert_eq!(question.type_info, TypeInfo::text());
        assert_eq!(question.common_type_name.as_deref(), Some("Mystery"));
    }

    #[test]
    fn numeric_restriction_overrides_base_type() {
        let question = translate(&descriptor("Integer").with_restriction(json!({
            "type": "numeric",
            "underlying": "Integer",
            "min": { "bound": 1 },
            "max": { "bound": 10 }
        })))
        .unwrap();

        assert_eq!(
            question.type_info,
            TypeInfo::NumberType {
                range: Some(NumericRange {
                    min: Some("1".to_string()),
                    max: Some("10".to_string()),
                    step: Some("1".to_string()),
                })
            }
        );
    }

    #[test]
    fn numeric_restriction_keeps_supplied_step() {
        let question = translate(&descriptor("Number").with_restriction(json!({
            "type": "numeric", "underlying": "Number", "step": "0.5"
        })))
        .unwrap();
        assert_eq!(question.type_info, TypeInfo::number_with_step("0.5"));
    }

    #[test]
    fn numeric_restriction_on_decimals_defaults_to_cents() {
        let question = translate(&descriptor("Number").with_restriction(json!({
            "type": "numeric", "underlying": "Number", "min": { "bound": 0 }
        })))
        .unwrap();
        assert_eq!(
            question.type_info,
            TypeInfo::NumberType {
                range: Some(NumericRange {
                    min: Some("0".to_string()),
                    max: None,
                    step: Some("0.01".to_string()),
                })
            }
        );
    }

    #[test]
    fn enum_restriction_overrides_text() {
        let question = translate(&descriptor("Text").with_restriction(json!({
            "type": "enum",
            "possibleValues": [{ "v": "AWS", "label": "Amazon Web Services" }]
        })))
        .unwrap();
        assert_eq!(
            question.type_info,
            TypeInfo::EnumType {
                possible_values: vec![LabelValuePair::new("AWS", "Amazon Web Services")]
            }
        );
    }

    #[test]
    fn text_restriction_carries_constraints() {
        let question = translate(&descriptor("Text").with_restriction(json!({
            "type": "text", "regex": "^[a-z]+$", "maxLength": 12
        })))
        .unwrap();
        assert_eq!(
            question.type_info,
            TypeInfo::TextType {
                regex: Some("^[a-z]+$".to_string()),
                min_length: None,
                max_length: Some(12),
            }
        );
    }

    #[test]
    fn unknown_restriction_type_keeps_base_type() {
        let question =
            translate(&descriptor("Boolean").with_restriction(json!({ "type": "geo" }))).unwrap();
        assert_eq!(question.type_info, TypeInfo::BooleanType);
    }

    #[test]
    fn object_collection_lists_simple_names() {
        let question = translate(&descriptor("List[x.y.Foo]").with_collection(json!({
            "min": 1, "max": 5, "possibleElementTypes": ["x.y.Foo"]
        })))
        .unwrap();

        assert_eq!(
            question.type_info,
            TypeInfo::ObjectCollectionType {
                min_size: 1,
                max_size: Some(5),
                possible_types: vec![LabelValuePair::new("x.y.Foo", "Foo")],
            }
        );
    }

    #[test]
    fn collection_without_details_is_unbounded() {
        let question = translate(&descriptor("NEList[x.Broker]")).unwrap();
        assert_eq!(
            question.type_info,
            TypeInfo::ObjectCollectionType {
                min_size: 0,
                max_size: None,
                possible_types: vec![],
            }
        );
    }

    #[test]
    fn scalar_collection_becomes_simple_collection() {
        let question = translate(&descriptor("List[Text]").with_collection(json!({ "min": 2 })))
            .unwrap();
        assert_eq!(
            question.type_info,
            TypeInfo::SimpleCollectionType {
                min_size: 2,
                max_size: None,
                element_type: "Text".to_string(),
            }
        );
    }

    #[test]
    fn default_value_and_info_are_carried_over() {
        let mut source = descriptor("Text").with_info("Shown below the input");
        source.details.default_value = Some(json!("AWS"));
        let question = translate(&source).unwrap();
        assert_eq!(question.info.as_deref(), Some("Shown below the input"));
        assert_eq!(question.default_value, Some(json!("AWS")));
    }

    #[test]
    fn missing_question_is_a_mapping_error() {
        let mut source = descriptor("Text");
        source.details.question = None;
        let err = translate(&source).unwrap_err();
        assert!(matches!(
            err,
            ResolverError::DescriptorMapping { ref path, .. } if path == "customer.field"
        ));
    }

    #[test]
    fn descriptor_without_member_is_a_mapping_error() {
        let mut source = descriptor("Text");
        source.member = String::new();
        match translate(&source).unwrap_err() {
            ResolverError::DescriptorMapping { reason, descriptor, .. } => {
                assert_eq!(reason, "descriptor has no member");
                assert_eq!(descriptor.target, "customer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn simple_name_strips_qualifier() {
        assert_eq!(simple_name("x.y.Foo"), "Foo");
        assert_eq!(simple_name("Foo"), "Foo");
        assert_eq!(simple_name("x.y."), "");
    }

    proptest! {
        #[test]
        fn simple_name_never_contains_a_dot(name in "[a-zA-Z.]{0,24}") {
            prop_assert!(!simple_name(&name).contains('.'));
            prop_assert!(name.ends_with(simple_name(&name)));
        }

        #[test]
        fn translation_never_fails_with_a_question(tag in "[a-zA-Z\\[][\\PC]{0,23}") {
            let question = translate(&descriptor(&tag));
            prop_assert!(question.is_ok());
        }
    }
}
