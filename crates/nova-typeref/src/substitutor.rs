use std::collections::HashSet;

use crate::reference::{ArrayRef, CompoundRef, ParameterizedRef, WildcardRef};
use crate::{Owner, TypeArgumentContext, TypeParamId, TypeRef};

/// Where a substituted reference ends up. Wildcards are only legal as type arguments (and at the
/// top level); elsewhere a captured wildcard collapses to one of its bounds.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    TopLevel,
    Argument,
    UpperBound,
    LowerBound,
}

/// Rewrites reference trees by applying a [`TypeArgumentContext`]. Results are owned by the
/// substitutor's owner and share nothing with the input.
pub struct Substitutor<'a, 'env> {
    owner: &'a Owner<'env>,
    context: &'a TypeArgumentContext,
}

impl<'a, 'env> Substitutor<'a, 'env> {
    pub fn new(owner: &'a Owner<'env>, context: &'a TypeArgumentContext) -> Self {
        Self { owner, context }
    }

    pub fn substitute(&self, reference: &TypeRef) -> TypeRef {
        let mut visiting = HashSet::new();
        self.substitute_in(reference, Position::TopLevel, &mut visiting)
    }

    fn substitute_in(
        &self,
        reference: &TypeRef,
        position: Position,
        visiting: &mut HashSet<TypeParamId>,
    ) -> TypeRef {
        let owner_id = self.owner.id();
        let substituted = match reference {
            TypeRef::Parameterized(r) => {
                let mut result = ParameterizedRef::new(owner_id, r.def());
                for arg in r.type_arguments() {
                    result.push_argument(self.substitute_in(arg, Position::Argument, visiting));
                }
                TypeRef::Parameterized(result)
            }
            TypeRef::Array(r) => {
                let element = self.substitute_in(r.element(), Position::UpperBound, visiting);
                ArrayRef::build(owner_id, element, r.dimensions())
            }
            TypeRef::Wildcard(r) => {
                let upper = r
                    .upper()
                    .map(|upper| self.substitute_in(upper, Position::UpperBound, visiting));
                let lower = r
                    .lower()
                    .map(|lower| self.substitute_in(lower, Position::LowerBound, visiting))
                    .filter(|lower| !matches!(lower, TypeRef::Wildcard(_)));
                TypeRef::Wildcard(WildcardRef::new(owner_id, upper, lower))
            }
            TypeRef::Compound(r) => CompoundRef::build(
                owner_id,
                r.components()
                    .iter()
                    .map(|c| self.substitute_in(c, Position::UpperBound, visiting))
                    .collect(),
            ),
            TypeRef::TypeParameter(r) => self.substitute_param(reference, r.param(), visiting),
            TypeRef::Unknown(_) => reference.rebind(owner_id),
        };
        // Only wildcards that substitution introduced are collapsed; written ones stay as given.
        match reference {
            TypeRef::TypeParameter(_) => self.collapse(substituted, position),
            _ => substituted,
        }
    }

    fn substitute_param(
        &self,
        reference: &TypeRef,
        param: TypeParamId,
        visiting: &mut HashSet<TypeParamId>,
    ) -> TypeRef {
        if let Some(mapped) = self.context.get(param) {
            return mapped.rebind(self.owner.id());
        }
        let Some(anchor) = self.context.anchor() else {
            return reference.rebind(self.owner.id());
        };

        // Bounds are expanded on demand; a parameter reached again through its own bounds
        // (`E extends Enum<E>`) is captured as `?`.
        if !visiting.insert(param) {
            return TypeRef::Wildcard(WildcardRef::new(self.owner.id(), None, None));
        }
        let bounds: Vec<TypeRef> = self
            .owner
            .env()
            .type_param(param)
            .map(|def| {
                def.upper_bounds
                    .iter()
                    .map(|bound| {
                        let bound = self.owner.to_reference(bound);
                        self.substitute_in(&bound, Position::UpperBound, visiting)
                    })
                    .collect()
            })
            .unwrap_or_default();
        visiting.remove(&param);

        let upper = if bounds.is_empty() {
            self.owner.raw_unchecked(anchor)
        } else {
            CompoundRef::build(self.owner.id(), bounds)
        };
        TypeRef::Wildcard(WildcardRef::new(self.owner.id(), Some(upper), None))
    }

    fn collapse(&self, reference: TypeRef, position: Position) -> TypeRef {
        let TypeRef::Wildcard(wildcard) = &reference else {
            return reference;
        };
        match position {
            Position::TopLevel | Position::Argument => reference,
            Position::UpperBound => match wildcard.upper() {
                Some(upper) => upper.clone(),
                None => self.anchor_or_object(),
            },
            // Callers drop a lower bound that stays a wildcard.
            Position::LowerBound => match wildcard.lower() {
                Some(lower) => lower.clone(),
                None => reference,
            },
        }
    }

    fn anchor_or_object(&self) -> TypeRef {
        match self.context.anchor() {
            Some(anchor) => self.owner.raw_unchecked(anchor),
            None => self.owner.object(),
        }
    }
}
