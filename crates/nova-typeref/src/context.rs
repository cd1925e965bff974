//! Type-argument contexts: what each type parameter stands for at one use site.

use std::collections::{HashMap, HashSet};

use crate::reference::ParameterizedRef;
use crate::substitutor::Substitutor;
use crate::{Owner, TypeDefId, TypeParamId, TypeRef, TypeUniverse};

/// Immutable mapping from type parameters to references, plus the anchor used to capture
/// parameters the mapping doesn't mention.
///
/// With an anchor, an absent parameter becomes `? extends <its bounds>` (the raw anchor when it
/// has none). Without one the context is the identity for absent parameters.
#[derive(Clone, Debug, Default)]
pub struct TypeArgumentContext {
    mapping: HashMap<TypeParamId, TypeRef>,
    anchor: Option<TypeDefId>,
}

impl TypeArgumentContext {
    /// Leaves every type parameter untouched.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn new(mapping: HashMap<TypeParamId, TypeRef>, anchor: Option<TypeDefId>) -> Self {
        Self { mapping, anchor }
    }

    /// No explicit mappings; every parameter is captured against `anchor`.
    pub fn capturing(anchor: TypeDefId) -> Self {
        Self::new(HashMap::new(), Some(anchor))
    }

    /// Explicit call-site type arguments. A count mismatch drops the explicit list, leaving only
    /// the capturing anchor.
    pub fn from_explicit(
        type_params: &[TypeParamId],
        type_args: &[TypeRef],
        anchor: Option<TypeDefId>,
    ) -> Self {
        if type_params.len() != type_args.len() {
            tracing::debug!(
                target: "nova.typeref",
                expected = type_params.len(),
                found = type_args.len(),
                "explicit type argument count mismatch"
            );
            return Self::new(HashMap::new(), anchor);
        }
        let mapping = type_params
            .iter()
            .copied()
            .zip(type_args.iter().cloned())
            .collect();
        Self::new(mapping, anchor)
    }

    /// Declared parameters of `reference`'s type mapped to its arguments, nothing else.
    pub(crate) fn for_declared_arguments(
        env: &dyn TypeUniverse,
        reference: &ParameterizedRef,
    ) -> Self {
        let mut mapping = HashMap::new();
        if let Some(def) = env.type_def(reference.def()) {
            if def.type_params.len() == reference.type_arguments().len() {
                for (param, arg) in def.type_params.iter().zip(reference.type_arguments()) {
                    mapping.insert(*param, arg.clone());
                }
            }
        }
        Self::new(mapping, None)
    }

    /// Context of a receiver: the declared type's parameters and those of every supertype, as
    /// instantiated by `receiver`.
    ///
    /// `ArrayList<String>` maps `ArrayList.E`, `List.E`, `Collection.E` and `Iterable.T` to
    /// `String`. Raw receivers capture every parameter against the root object type. Type
    /// parameters and wildcards use their first parameterized bound.
    pub fn for_receiver(owner: &Owner<'_>, receiver: &TypeRef) -> Self {
        let env = owner.env();
        match receiver {
            TypeRef::Parameterized(r) => {
                if r.is_raw(env) {
                    return Self::capturing(env.well_known().object);
                }
                let mut context = Self::for_declared_arguments(env, r);
                let mut seen = HashSet::new();
                context.collect_super_arguments(owner, receiver, &mut seen);
                context
            }
            TypeRef::TypeParameter(_) | TypeRef::Wildcard(_) | TypeRef::Compound(_) => {
                let bound = receiver
                    .super_types(owner)
                    .into_iter()
                    .find(|bound| matches!(bound, TypeRef::Parameterized(_)));
                match bound {
                    Some(bound) => Self::for_receiver(owner, &bound),
                    None => Self::identity(),
                }
            }
            TypeRef::Array(_) | TypeRef::Unknown(_) => Self::identity(),
        }
    }

    fn collect_super_arguments(
        &mut self,
        owner: &Owner<'_>,
        current: &TypeRef,
        seen: &mut HashSet<TypeDefId>,
    ) {
        let Some(def) = current.type_def() else {
            return;
        };
        if !seen.insert(def) {
            return;
        }
        for super_type in current.super_types(owner) {
            let TypeRef::Parameterized(p) = &super_type else {
                continue;
            };
            let direct = Self::for_declared_arguments(owner.env(), p);
            for (param, arg) in direct.mapping {
                self.mapping.entry(param).or_insert(arg);
            }
            self.collect_super_arguments(owner, &super_type, seen);
        }
    }

    pub fn get(&self, param: TypeParamId) -> Option<&TypeRef> {
        self.mapping.get(&param)
    }

    pub fn anchor(&self) -> Option<TypeDefId> {
        self.anchor
    }

    pub fn is_identity(&self) -> bool {
        self.mapping.is_empty() && self.anchor.is_none()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, &TypeRef)> + '_ {
        self.mapping.iter().map(|(param, arg)| (*param, arg))
    }

    /// Substitute `reference` into `owner` with this context.
    pub fn resolve(&self, owner: &Owner<'_>, reference: &TypeRef) -> TypeRef {
        Substitutor::new(owner, self).substitute(reference)
    }
}
