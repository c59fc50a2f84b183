//! Resolver domain - Interactive configuration resolution.
//!
//! Turns the rule engine's missing-data descriptors into typed questions,
//! writes answers back into the document, and tracks the protocol state of
//! one resolution session.

mod descriptor;
mod document;
mod errors;
mod injector;
mod member_type;
mod question;
mod session;
mod translator;

pub use descriptor::{
    CollectionInfo, DescriptorDetails, MissingElementDescriptor, NumericUnderlying, Restriction,
};
pub use document::{Document, DocumentPath};
pub use errors::{ResolverError, RoundStage};
pub use injector::{
    coerce_answer, inject, is_truthy, Answer, MAX_COLLECTION_ELEMENTS, TYPE_TAG_KEY,
};
pub use member_type::{CollectionKind, MemberType, ScalarType};
pub use question::{DateRange, LabelValuePair, NumericRange, QuestionSpec, TypeInfo};
pub use session::{ComputationDetails, ModelTarget, Resolution, ResolutionSession, RoundRecord};
pub use translator::{simple_name, translate, DECIMAL_STEP, INTEGER_STEP};
