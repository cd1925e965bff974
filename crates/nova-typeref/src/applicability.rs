//! Candidate filtering for call-like usages.
//!
//! Before a call is resolved, every visible member with the right name is a candidate. The
//! [`ApplicabilityPredicate`] drops the ones that cannot possibly be the target: wrong arity,
//! incompatible argument types, or a member kind that doesn't fit the usage. Ranking the
//! survivors is left to the caller.

use crate::conformance::ConformanceComputer;
use crate::{FieldDef, OperationDef, Owner, TypeArgumentContext, TypeExpr, TypeRef};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Operation,
    Field,
    Variable,
    Parameter,
}

/// A member or local that a usage might refer to.
#[derive(Clone, Copy, Debug)]
pub enum Candidate<'d> {
    Operation(&'d OperationDef),
    Field(&'d FieldDef),
    /// A local variable. `ty` is `None` while its type is still being inferred.
    Variable {
        writable: bool,
        ty: Option<&'d TypeRef>,
    },
    Parameter,
}

impl Candidate<'_> {
    pub fn kind(&self) -> CandidateKind {
        match self {
            Candidate::Operation(_) => CandidateKind::Operation,
            Candidate::Field(_) => CandidateKind::Field,
            Candidate::Variable { .. } => CandidateKind::Variable,
            Candidate::Parameter => CandidateKind::Parameter,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UsageKind {
    BinaryOperation,
    Assignment,
    MemberCall,
    FeatureCall,
    UnaryOperation,
}

/// Structural description of a call-like expression. `None` marks a type that isn't known (yet);
/// checks that need it are skipped.
#[derive(Clone, Debug)]
pub enum UsageShape {
    /// `left op right`: the candidate is invoked on `left` with `right` as its argument.
    BinaryOperation {
        left: Option<TypeRef>,
        right: Option<TypeRef>,
    },
    /// `target = value`.
    Assignment { value: Option<TypeRef> },
    /// `receiver.name` or `receiver.name(args)`.
    MemberCall {
        arguments: Vec<Option<TypeRef>>,
        explicit_operation_call: bool,
    },
    /// `name` or `name(args)` without a receiver.
    FeatureCall {
        arguments: Vec<Option<TypeRef>>,
        explicit_operation_call: bool,
    },
    /// `op operand`.
    UnaryOperation { operand: Option<TypeRef> },
}

impl UsageShape {
    pub fn kind(&self) -> UsageKind {
        match self {
            UsageShape::BinaryOperation { .. } => UsageKind::BinaryOperation,
            UsageShape::Assignment { .. } => UsageKind::Assignment,
            UsageShape::MemberCall { .. } => UsageKind::MemberCall,
            UsageShape::FeatureCall { .. } => UsageKind::FeatureCall,
            UsageShape::UnaryOperation { .. } => UsageKind::UnaryOperation,
        }
    }
}

/// The syntactic slot being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceContainer {
    /// The feature slot every call-like usage has.
    AnyFeatureCall,
    /// A slot only the given usage kind has.
    Usage(UsageKind),
}

impl ReferenceContainer {
    pub fn admits(self, usage: UsageKind) -> bool {
        match self {
            ReferenceContainer::AnyFeatureCall => true,
            ReferenceContainer::Usage(kind) => kind == usage,
        }
    }
}

pub struct ApplicabilityPredicate<'a, 'env> {
    owner: &'a Owner<'env>,
}

impl<'a, 'env> ApplicabilityPredicate<'a, 'env> {
    pub fn new(owner: &'a Owner<'env>) -> Self {
        Self { owner }
    }

    /// `true` if `candidate` may be the target of `usage`.
    ///
    /// A usage the `container` slot doesn't belong to comes from content assist on an incomplete
    /// expression; everything is accepted then. Declared parameter and field types are resolved
    /// through `context` before they are compared.
    pub fn accept(
        &self,
        candidate: Candidate<'_>,
        usage: &UsageShape,
        container: ReferenceContainer,
        context: &TypeArgumentContext,
    ) -> bool {
        if !container.admits(usage.kind()) {
            return true;
        }
        let accepted = self.dispatch(candidate, usage, context);
        if !accepted {
            tracing::trace!(
                target: "nova.typeref",
                candidate = ?candidate.kind(),
                usage = ?usage.kind(),
                "candidate not applicable"
            );
        }
        accepted
    }

    fn dispatch(
        &self,
        candidate: Candidate<'_>,
        usage: &UsageShape,
        context: &TypeArgumentContext,
    ) -> bool {
        match (candidate, usage) {
            (Candidate::Operation(op), UsageShape::BinaryOperation { left, right }) => {
                let [param] = op.params.as_slice() else {
                    return false;
                };
                match (left, right) {
                    (Some(_), Some(right)) => {
                        self.is_compatible_argument(param, Some(right), context)
                    }
                    _ => true,
                }
            }
            (Candidate::Operation(op), UsageShape::Assignment { value }) => {
                let [param] = op.params.as_slice() else {
                    return false;
                };
                self.is_compatible_argument(param, value.as_ref(), context)
            }
            (Candidate::Field(field), UsageShape::Assignment { value }) => {
                !field.is_final
                    && !field.is_static
                    && self.is_compatible_argument(&field.ty, value.as_ref(), context)
            }
            (Candidate::Variable { writable, ty }, UsageShape::Assignment { value }) => {
                writable
                    && match (ty, value) {
                        (Some(ty), Some(value)) => {
                            ConformanceComputer::new(self.owner).is_conformant(ty, value)
                        }
                        _ => true,
                    }
            }
            (Candidate::Operation(op), UsageShape::MemberCall { arguments, .. }) => {
                self.check_operation(op, arguments, context)
            }
            (
                Candidate::Field(field),
                UsageShape::MemberCall {
                    arguments,
                    explicit_operation_call,
                },
            ) => arguments.is_empty() && !explicit_operation_call && !field.is_static,
            (Candidate::Variable { .. } | Candidate::Parameter, UsageShape::FeatureCall { .. }) => {
                true
            }
            (
                Candidate::Field(field),
                UsageShape::FeatureCall {
                    explicit_operation_call,
                    ..
                },
            ) => !field.is_static && !explicit_operation_call,
            (Candidate::Operation(op), UsageShape::FeatureCall { arguments, .. }) => {
                !op.is_static && self.check_operation(op, arguments, context)
            }
            (Candidate::Operation(op), UsageShape::UnaryOperation { .. }) => op.params.is_empty(),
            _ => false,
        }
    }

    fn check_operation(
        &self,
        op: &OperationDef,
        arguments: &[Option<TypeRef>],
        context: &TypeArgumentContext,
    ) -> bool {
        let variable_arity =
            op.is_varargs && self.owner.config().variable_arity && !op.params.is_empty();
        let fixed = if variable_arity {
            op.params.len() - 1
        } else {
            op.params.len()
        };
        let arity_ok = if variable_arity {
            arguments.len() >= fixed
        } else {
            arguments.len() == fixed
        };
        if !arity_ok {
            return false;
        }

        let (fixed_args, rest) = arguments.split_at(fixed);
        let fixed_ok = op
            .params
            .iter()
            .zip(fixed_args)
            .all(|(param, arg)| self.is_compatible_argument(param, arg.as_ref(), context));
        if !fixed_ok {
            return false;
        }
        let Some(last) = op.params.last().filter(|_| variable_arity) else {
            return true;
        };

        // The trailing parameter takes either the remaining arguments one by one or a single
        // array in its place.
        let element = match last {
            TypeExpr::Array(element) => element.as_ref(),
            other => other,
        };
        match rest {
            [single] if self.is_compatible_argument(last, single.as_ref(), context) => true,
            _ => rest
                .iter()
                .all(|arg| self.is_compatible_argument(element, arg.as_ref(), context)),
        }
    }

    /// Missing argument types and the `Void` wrapper (the type of `null`) are always compatible.
    fn is_compatible_argument(
        &self,
        declared: &TypeExpr,
        actual: Option<&TypeRef>,
        context: &TypeArgumentContext,
    ) -> bool {
        let Some(actual) = actual else {
            return true;
        };
        let owner = self.owner;
        if actual.is_type(owner.env().well_known().void_wrapper) {
            return true;
        }
        let declared = context.resolve(owner, &owner.to_reference(declared));
        ConformanceComputer::new(owner).is_conformant(&declared, actual)
    }
}
