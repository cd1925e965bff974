//! Owner-scoped generic type references for IDE-style analyses.
//!
//! The crate reads a declared-type universe ([`TypeUniverse`]) and builds transient
//! [`TypeRef`] trees describing "a type as used at one point". On top of the reference model it
//! answers the questions call resolution keeps asking:
//!
//! - is one type usable where another is expected ([`ConformanceComputer`])
//! - what an open type parameter stands for ([`TypeArgumentContext`], [`Substitutor`])
//! - what function shape a single-abstract-operation type has ([`FunctionTypeConversion`])
//! - which candidate members can be the target of a usage ([`ApplicabilityPredicate`])
//!
//! Every reference is tagged with the [`Owner`] that built it; mixing owners is an error, copying
//! with [`TypeRef::copy_into`] is not.

#![forbid(unsafe_code)]

mod applicability;
mod config;
mod conformance;
mod context;
mod error;
mod function;
mod minimal_jdk;
mod owner;
mod reference;
mod substitutor;
mod universe;

pub use applicability::{
    ApplicabilityPredicate, Candidate, CandidateKind, ReferenceContainer, UsageKind, UsageShape,
};
pub use config::{json_schema, AnalysisConfig};
pub use conformance::ConformanceComputer;
pub use context::TypeArgumentContext;
pub use error::{ConfigError, InvalidConstructionReason, TypeRefError};
pub use function::{FunctionShape, FunctionTypeConversion};
pub use minimal_jdk::{FUNCTIONS_PREFIX, MAX_FUNCTION_ARITY};
pub use owner::{Owner, OwnerId};
pub use reference::{
    ArrayRef, CompoundRef, ParameterizedRef, TypeParamRef, TypeRef, UnknownRef, WildcardRef,
};
pub use substitutor::Substitutor;
pub use universe::{
    FieldDef, OperationDef, PrimitiveType, TypeDef, TypeDefId, TypeDefKind, TypeExpr,
    TypeParamDef, TypeParamId, TypeStore, TypeUniverse, Visibility, VisibilityPolicy,
    WellKnownTypes,
};
