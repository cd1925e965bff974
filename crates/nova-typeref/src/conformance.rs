//! Assignability between type references.

use crate::reference::{ArrayRef, ParameterizedRef, WildcardRef};
use crate::{Owner, TypeRef};

/// Decides whether a value of one type may be used where another is expected.
///
/// Conformance is total: it never fails, it answers `false`. Unknown or missing type information
/// answers [`AnalysisConfig::permissive_unknown`](crate::AnalysisConfig::permissive_unknown).
/// Intermediate references (aligned supertypes, boxed primitives) are built in the computer's
/// owner; the inputs may belong to any owner.
pub struct ConformanceComputer<'a, 'env> {
    owner: &'a Owner<'env>,
}

impl<'a, 'env> ConformanceComputer<'a, 'env> {
    pub fn new(owner: &'a Owner<'env>) -> Self {
        Self { owner }
    }

    /// `true` iff `source` may be used where `target` is expected.
    pub fn is_conformant(&self, target: &TypeRef, source: &TypeRef) -> bool {
        let conformant = self.conforms(target, source, 0);
        if !conformant {
            let env = self.owner.env();
            tracing::trace!(
                target: "nova.typeref",
                expected = %target.simple_name(env),
                actual = %source.simple_name(env),
                "not conformant"
            );
        }
        conformant
    }

    /// Like [`ConformanceComputer::is_conformant`], with absent references treated as unknown.
    pub fn is_conformant_opt(&self, target: Option<&TypeRef>, source: Option<&TypeRef>) -> bool {
        match (target, source) {
            (Some(target), Some(source)) => self.is_conformant(target, source),
            _ => self.permissive(),
        }
    }

    fn permissive(&self) -> bool {
        self.owner.config().permissive_unknown
    }

    fn conforms(&self, target: &TypeRef, source: &TypeRef, depth: u32) -> bool {
        let max_depth = self.owner.config().max_depth;
        if depth > max_depth {
            tracing::warn!(
                target: "nova.typeref",
                max_depth,
                "conformance check exceeded the recursion limit"
            );
            return self.permissive();
        }
        let depth = depth + 1;

        // The `Void` wrapper only has the null value, which every reference type holds.
        let env = self.owner.env();
        if source.is_type(env.well_known().void_wrapper)
            && !matches!(target, TypeRef::Unknown(_))
            && !target.is_primitive(env)
            && !target.is_void(env)
        {
            return true;
        }

        match (target, source) {
            (TypeRef::Unknown(_), _) | (_, TypeRef::Unknown(_)) => self.permissive(),
            (TypeRef::Wildcard(t), _) => self.wildcard_contains(t, source, depth),
            (_, TypeRef::Wildcard(s)) => match s.upper() {
                Some(upper) => self.conforms(target, upper, depth),
                None => self.conforms(target, &self.owner.object(), depth),
            },
            (TypeRef::Compound(t), _) => t
                .components()
                .iter()
                .all(|component| self.conforms(component, source, depth)),
            (_, TypeRef::Compound(s)) => s
                .components()
                .iter()
                .any(|component| self.conforms(target, component, depth)),
            (TypeRef::TypeParameter(t), TypeRef::TypeParameter(s)) if t.param() == s.param() => {
                true
            }
            (_, TypeRef::TypeParameter(_)) => source
                .super_types(self.owner)
                .iter()
                .any(|bound| self.conforms(target, bound, depth)),
            (TypeRef::TypeParameter(_), _) => false,
            (TypeRef::Array(t), TypeRef::Array(s)) => self.array_conforms(t, s, depth),
            (TypeRef::Parameterized(t), TypeRef::Array(_)) => {
                self.owner.env().well_known().is_array_supertype(t.def())
            }
            (TypeRef::Array(_), TypeRef::Parameterized(_)) => false,
            (TypeRef::Parameterized(t), TypeRef::Parameterized(s)) => {
                self.parameterized_conforms(target, t, source, s, depth)
            }
        }
    }

    /// Wildcard containment: `? extends U` holds anything conforming to `U`, `? super L` anything
    /// `L` conforms to. A wildcard source must itself be contained.
    fn wildcard_contains(&self, target: &WildcardRef, source: &TypeRef, depth: u32) -> bool {
        if let TypeRef::Wildcard(s) = source {
            let upper_ok = match target.upper() {
                Some(t_upper) => match s.upper() {
                    Some(s_upper) => self.conforms(t_upper, s_upper, depth),
                    None => self.conforms(t_upper, &self.owner.object(), depth),
                },
                None => true,
            };
            let lower_ok = match target.lower() {
                Some(t_lower) => s
                    .lower()
                    .is_some_and(|s_lower| self.conforms(s_lower, t_lower, depth)),
                None => true,
            };
            return upper_ok && lower_ok;
        }
        target
            .upper()
            .map_or(true, |upper| self.conforms(upper, source, depth))
            && target
                .lower()
                .map_or(true, |lower| self.conforms(source, lower, depth))
    }

    fn array_conforms(&self, target: &ArrayRef, source: &ArrayRef, depth: u32) -> bool {
        let env = self.owner.env();
        let (t_elem, s_elem) = (target.element(), source.element());
        if target.dimensions() == source.dimensions() {
            if t_elem.is_unknown() || s_elem.is_unknown() {
                return self.permissive();
            }
            if t_elem.is_primitive(env) || s_elem.is_primitive(env) {
                return t_elem.primitive(env) == s_elem.primitive(env);
            }
            return self.conforms(t_elem, s_elem, depth);
        }
        // `Object[]` holds `String[][]`: the surplus source dimensions form an array component.
        target.dimensions() < source.dimensions()
            && t_elem
                .type_def()
                .is_some_and(|def| env.well_known().is_array_supertype(def))
    }

    fn parameterized_conforms(
        &self,
        target: &TypeRef,
        t: &ParameterizedRef,
        source: &TypeRef,
        s: &ParameterizedRef,
        depth: u32,
    ) -> bool {
        let env = self.owner.env();
        let wk = env.well_known();

        let (t_void, s_void) = (t.def() == wk.void, s.def() == wk.void);
        if t_void || s_void {
            return t_void && s_void;
        }

        match (target.primitive(env), source.primitive(env)) {
            (Some(t_prim), Some(s_prim)) => return s_prim.widens_to(t_prim),
            (Some(t_prim), None) => {
                return wk
                    .unboxed(s.def())
                    .is_some_and(|s_prim| s_prim.widens_to(t_prim));
            }
            (None, Some(_)) => {
                let boxed = source.wrapper_if_primitive(self.owner);
                return self.conforms(target, &boxed, depth);
            }
            (None, None) => {}
        }

        if t.def() == s.def() {
            if t.type_arguments().is_empty() || s.type_arguments().is_empty() {
                return true;
            }
            return self.arguments_conform(t.type_arguments(), s.type_arguments(), depth);
        }

        let Some(aligned) = source.super_type(self.owner, t.def()) else {
            return false;
        };
        // Raw on either side: ancestry is enough.
        if t.type_arguments().is_empty() || aligned.type_arguments().is_empty() {
            return true;
        }
        self.arguments_conform(t.type_arguments(), aligned.type_arguments(), depth)
    }

    fn arguments_conform(&self, targets: &[TypeRef], sources: &[TypeRef], depth: u32) -> bool {
        targets.len() == sources.len()
            && targets
                .iter()
                .zip(sources)
                .all(|(target, source)| self.argument_conforms(target, source, depth))
    }

    fn argument_conforms(&self, target: &TypeRef, source: &TypeRef, depth: u32) -> bool {
        if target.is_unknown() || source.is_unknown() {
            return self.permissive();
        }
        match (target, source) {
            (TypeRef::Wildcard(t), _) => self.wildcard_contains(t, source, depth),
            (_, TypeRef::Wildcard(_)) => false,
            _ => self.conforms(target, source, depth) && self.conforms(source, target, depth),
        }
    }
}
