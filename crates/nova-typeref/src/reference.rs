//! Owner-scoped type references.
//!
//! A [`TypeRef`] describes a type as used at one point of the analyzed program. References are
//! trees, built per request and thrown away afterwards.

use std::collections::HashSet;

use crate::context::TypeArgumentContext;
use crate::error::TypeRefError;
use crate::substitutor::Substitutor;
use crate::{
    Owner, OwnerId, PrimitiveType, TypeDefId, TypeDefKind, TypeParamId, TypeUniverse,
    VisibilityPolicy,
};

const LIST_TYPE: &str = "java.util.List";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Parameterized(ParameterizedRef),
    Array(ArrayRef),
    Wildcard(WildcardRef),
    Compound(CompoundRef),
    TypeParameter(TypeParamRef),
    Unknown(UnknownRef),
}

/// A declared type plus its type arguments. No arguments over a generic declared type means the
/// reference is raw.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterizedRef {
    owner: OwnerId,
    def: TypeDefId,
    args: Vec<TypeRef>,
    resolved: bool,
}

impl ParameterizedRef {
    pub(crate) fn new(owner: OwnerId, def: TypeDefId) -> Self {
        Self {
            owner,
            def,
            args: Vec::new(),
            resolved: true,
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn def(&self) -> TypeDefId {
        self.def
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn add_type_argument(&mut self, argument: TypeRef) -> Result<(), TypeRefError> {
        if let Some(found) = argument.foreign_owner(self.owner) {
            return Err(TypeRefError::OwnershipViolation {
                expected: self.owner,
                found,
            });
        }
        self.push_argument(argument);
        Ok(())
    }

    pub(crate) fn push_argument(&mut self, argument: TypeRef) {
        self.resolved = self.resolved && argument.is_resolved();
        self.args.push(argument);
    }

    /// Generic declared type referenced without arguments.
    pub fn is_raw(&self, env: &dyn TypeUniverse) -> bool {
        self.args.is_empty()
            && env
                .type_def(self.def)
                .is_some_and(|def| !def.type_params.is_empty())
    }
}

/// Non-array element plus dimension count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayRef {
    owner: OwnerId,
    element: Box<TypeRef>,
    dimensions: u32,
}

impl ArrayRef {
    /// Build `element[]..` with `dimensions` levels, flattening an array element into the count.
    pub(crate) fn build(owner: OwnerId, element: TypeRef, dimensions: u32) -> TypeRef {
        match element {
            TypeRef::Array(inner) => TypeRef::Array(ArrayRef {
                owner,
                element: inner.element,
                dimensions: inner.dimensions + dimensions,
            }),
            element => TypeRef::Array(ArrayRef {
                owner,
                element: Box::new(element),
                dimensions,
            }),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn element(&self) -> &TypeRef {
        &self.element
    }

    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// The type of one component: `String[][]` -> `String[]`.
    pub fn component(&self) -> TypeRef {
        if self.dimensions <= 1 {
            return (*self.element).clone();
        }
        TypeRef::Array(ArrayRef {
            owner: self.owner,
            element: self.element.clone(),
            dimensions: self.dimensions - 1,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardRef {
    owner: OwnerId,
    upper: Option<Box<TypeRef>>,
    lower: Option<Box<TypeRef>>,
}

impl WildcardRef {
    pub(crate) fn new(owner: OwnerId, upper: Option<TypeRef>, lower: Option<TypeRef>) -> Self {
        Self {
            owner,
            upper: upper.map(Box::new),
            lower: lower.map(Box::new),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn upper(&self) -> Option<&TypeRef> {
        self.upper.as_deref()
    }

    pub fn lower(&self) -> Option<&TypeRef> {
        self.lower.as_deref()
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper.is_none() && self.lower.is_none()
    }
}

/// Intersection of its components. Component order carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompoundRef {
    owner: OwnerId,
    components: Vec<TypeRef>,
}

impl CompoundRef {
    /// Nested compounds are flattened; a single component stands for itself.
    pub(crate) fn build(owner: OwnerId, components: Vec<TypeRef>) -> TypeRef {
        let mut flat = Vec::with_capacity(components.len());
        for component in components {
            match component {
                TypeRef::Compound(inner) => flat.extend(inner.components),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(single) = flat.pop() {
                return single;
            }
        }
        TypeRef::Compound(CompoundRef {
            owner,
            components: flat,
        })
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn components(&self) -> &[TypeRef] {
        &self.components
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamRef {
    owner: OwnerId,
    param: TypeParamId,
}

impl TypeParamRef {
    pub(crate) fn new(owner: OwnerId, param: TypeParamId) -> Self {
        Self { owner, param }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn param(&self) -> TypeParamId {
        self.param
    }
}

/// Placeholder for missing or unresolvable type information.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownRef {
    owner: OwnerId,
    name: Option<String>,
}

impl UnknownRef {
    pub(crate) fn new(owner: OwnerId, name: Option<String>) -> Self {
        Self { owner, name }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NameStyle {
    Qualified,
    Simple,
}

impl TypeRef {
    pub fn owner(&self) -> OwnerId {
        match self {
            TypeRef::Parameterized(r) => r.owner,
            TypeRef::Array(r) => r.owner,
            TypeRef::Wildcard(r) => r.owner,
            TypeRef::Compound(r) => r.owner,
            TypeRef::TypeParameter(r) => r.owner,
            TypeRef::Unknown(r) => r.owner,
        }
    }

    /// The first owner other than `owner` found anywhere in this tree.
    pub(crate) fn foreign_owner(&self, owner: OwnerId) -> Option<OwnerId> {
        if self.owner() != owner {
            return Some(self.owner());
        }
        match self {
            TypeRef::Parameterized(r) => r.args.iter().find_map(|arg| arg.foreign_owner(owner)),
            TypeRef::Array(r) => r.element.foreign_owner(owner),
            TypeRef::Wildcard(r) => r
                .upper
                .iter()
                .chain(r.lower.iter())
                .find_map(|bound| bound.foreign_owner(owner)),
            TypeRef::Compound(r) => r.components.iter().find_map(|c| c.foreign_owner(owner)),
            TypeRef::TypeParameter(_) | TypeRef::Unknown(_) => None,
        }
    }

    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.foreign_owner(owner).is_none()
    }

    /// `true` iff no type parameter node is reachable from this reference.
    pub fn is_resolved(&self) -> bool {
        match self {
            TypeRef::Parameterized(r) => r.resolved,
            TypeRef::Array(r) => r.element.is_resolved(),
            TypeRef::Wildcard(r) => {
                r.upper.as_deref().map_or(true, TypeRef::is_resolved)
                    && r.lower.as_deref().map_or(true, TypeRef::is_resolved)
            }
            TypeRef::Compound(r) => r.components.iter().all(TypeRef::is_resolved),
            TypeRef::TypeParameter(_) => false,
            TypeRef::Unknown(_) => true,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeRef::Unknown(_))
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedRef> {
        match self {
            TypeRef::Parameterized(r) => Some(r),
            _ => None,
        }
    }

    /// Declared type of a parameterized reference.
    pub fn type_def(&self) -> Option<TypeDefId> {
        self.as_parameterized().map(ParameterizedRef::def)
    }

    /// Type arguments of a parameterized reference; empty for every other variant.
    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameterized(r) => &r.args,
            _ => &[],
        }
    }

    /// Exact declared-type test.
    pub fn is_type(&self, def: TypeDefId) -> bool {
        self.type_def() == Some(def)
    }

    /// Canonical name including type arguments, e.g. `java.util.Map<java.lang.String, ? extends
    /// java.lang.Number>` or `int[][]`.
    pub fn identifier(&self, env: &dyn TypeUniverse) -> String {
        let mut out = String::new();
        self.render(env, NameStyle::Qualified, &mut out);
        out
    }

    /// Like [`TypeRef::identifier`] with simple names: `Map<String, ? extends Number>`.
    pub fn simple_name(&self, env: &dyn TypeUniverse) -> String {
        let mut out = String::new();
        self.render(env, NameStyle::Simple, &mut out);
        out
    }

    fn render(&self, env: &dyn TypeUniverse, style: NameStyle, out: &mut String) {
        match self {
            TypeRef::Parameterized(r) => {
                match env.type_def(r.def) {
                    Some(def) => match style {
                        NameStyle::Qualified => out.push_str(&def.name),
                        NameStyle::Simple => out.push_str(def.simple_name()),
                    },
                    None => out.push_str("<unknown>"),
                }
                if !r.args.is_empty() {
                    out.push('<');
                    for (idx, arg) in r.args.iter().enumerate() {
                        if idx > 0 {
                            out.push_str(", ");
                        }
                        arg.render(env, style, out);
                    }
                    out.push('>');
                }
            }
            TypeRef::Array(r) => {
                r.element.render(env, style, out);
                for _ in 0..r.dimensions {
                    out.push_str("[]");
                }
            }
            TypeRef::Wildcard(r) => {
                out.push('?');
                if let Some(lower) = &r.lower {
                    out.push_str(" super ");
                    lower.render(env, style, out);
                } else if let Some(upper) = &r.upper {
                    out.push_str(" extends ");
                    upper.render(env, style, out);
                }
            }
            TypeRef::Compound(r) => {
                for (idx, component) in r.components.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(" & ");
                    }
                    component.render(env, style, out);
                }
            }
            TypeRef::TypeParameter(r) => match env.type_param(r.param) {
                Some(param) => out.push_str(&param.name),
                None => out.push_str("<unknown>"),
            },
            TypeRef::Unknown(r) => out.push_str(r.name.as_deref().unwrap_or("<unknown>")),
        }
    }

    /// Structural equality ignoring owners and compound component order.
    pub fn structurally_eq(&self, other: &TypeRef) -> bool {
        match (self, other) {
            (TypeRef::Parameterized(a), TypeRef::Parameterized(b)) => {
                a.def == b.def
                    && a.args.len() == b.args.len()
                    && a.args.iter().zip(&b.args).all(|(x, y)| x.structurally_eq(y))
            }
            (TypeRef::Array(a), TypeRef::Array(b)) => {
                a.dimensions == b.dimensions && a.element.structurally_eq(&b.element)
            }
            (TypeRef::Wildcard(a), TypeRef::Wildcard(b)) => {
                opt_structurally_eq(a.upper.as_deref(), b.upper.as_deref())
                    && opt_structurally_eq(a.lower.as_deref(), b.lower.as_deref())
            }
            (TypeRef::Compound(a), TypeRef::Compound(b)) => {
                a.components.len() == b.components.len()
                    && a
                        .components
                        .iter()
                        .all(|x| b.components.iter().any(|y| x.structurally_eq(y)))
                    && b
                        .components
                        .iter()
                        .all(|y| a.components.iter().any(|x| x.structurally_eq(y)))
            }
            (TypeRef::TypeParameter(a), TypeRef::TypeParameter(b)) => a.param == b.param,
            (TypeRef::Unknown(a), TypeRef::Unknown(b)) => a.name == b.name,
            _ => false,
        }
    }

    /// Raw-type test: a generic declared type without arguments, a type parameter whose bound is
    /// raw, or an array of a raw element.
    pub fn is_raw(&self, env: &dyn TypeUniverse) -> bool {
        let mut seen = HashSet::new();
        self.is_raw_inner(env, &mut seen)
    }

    fn is_raw_inner(&self, env: &dyn TypeUniverse, seen: &mut HashSet<TypeParamId>) -> bool {
        match self {
            TypeRef::Parameterized(r) => r.is_raw(env),
            TypeRef::Array(r) => r.element.is_raw_inner(env, seen),
            TypeRef::TypeParameter(r) => {
                if !seen.insert(r.param) {
                    return false;
                }
                let Some(param) = env.type_param(r.param) else {
                    return false;
                };
                param.upper_bounds.iter().any(|bound| match bound {
                    crate::TypeExpr::Class { def, args } => {
                        args.is_empty()
                            && env
                                .type_def(*def)
                                .is_some_and(|def| !def.type_params.is_empty())
                    }
                    crate::TypeExpr::Param(other) => {
                        TypeRef::TypeParameter(TypeParamRef::new(r.owner, *other))
                            .is_raw_inner(env, seen)
                    }
                    _ => false,
                })
            }
            TypeRef::Wildcard(_) | TypeRef::Compound(_) | TypeRef::Unknown(_) => false,
        }
    }

    /// Deep copy into `owner`, preserving structure.
    pub fn copy_into(&self, owner: &Owner<'_>) -> TypeRef {
        self.rebind(owner.id())
    }

    pub(crate) fn rebind(&self, owner: OwnerId) -> TypeRef {
        match self {
            TypeRef::Parameterized(r) => {
                let mut copy = ParameterizedRef::new(owner, r.def);
                for arg in &r.args {
                    copy.push_argument(arg.rebind(owner));
                }
                TypeRef::Parameterized(copy)
            }
            TypeRef::Array(r) => TypeRef::Array(ArrayRef {
                owner,
                element: Box::new(r.element.rebind(owner)),
                dimensions: r.dimensions,
            }),
            TypeRef::Wildcard(r) => TypeRef::Wildcard(WildcardRef::new(
                owner,
                r.upper.as_deref().map(|u| u.rebind(owner)),
                r.lower.as_deref().map(|l| l.rebind(owner)),
            )),
            TypeRef::Compound(r) => TypeRef::Compound(CompoundRef {
                owner,
                components: r.components.iter().map(|c| c.rebind(owner)).collect(),
            }),
            TypeRef::TypeParameter(r) => TypeRef::TypeParameter(TypeParamRef::new(owner, r.param)),
            TypeRef::Unknown(r) => TypeRef::Unknown(UnknownRef::new(owner, r.name.clone())),
        }
    }

    /// This reference with all type arguments erased, owned by `owner`.
    pub fn raw_type(&self, owner: &Owner<'_>) -> TypeRef {
        match self {
            TypeRef::Parameterized(r) => owner.raw_unchecked(r.def),
            TypeRef::Array(r) => {
                ArrayRef::build(owner.id(), r.element.raw_type(owner), r.dimensions)
            }
            TypeRef::Wildcard(r) => match r.upper.as_deref() {
                Some(upper) => upper.raw_type(owner),
                None => owner.object(),
            },
            TypeRef::Compound(r) => CompoundRef::build(
                owner.id(),
                r.components.iter().map(|c| c.raw_type(owner)).collect(),
            ),
            TypeRef::TypeParameter(r) => {
                let bound = owner
                    .env()
                    .type_param(r.param)
                    .and_then(|param| param.upper_bounds.first());
                match bound {
                    Some(crate::TypeExpr::Class { def, .. }) => owner.raw_unchecked(*def),
                    _ => owner.object(),
                }
            }
            TypeRef::Unknown(_) => self.copy_into(owner),
        }
    }

    /// The wildcard's upper bound (or the root object type); other references unchanged.
    pub fn upper_bound_substitute(&self, owner: &Owner<'_>) -> TypeRef {
        match self {
            TypeRef::Wildcard(r) => match r.upper.as_deref() {
                Some(upper) => upper.copy_into(owner),
                None => owner.object(),
            },
            other => other.copy_into(owner),
        }
    }

    /// The bound a wildcard can be instantiated with: its lower bound when present, else its
    /// upper bound.
    pub fn invariant_bound_substitute(&self, owner: &Owner<'_>) -> TypeRef {
        match self {
            TypeRef::Wildcard(r) => match (r.lower.as_deref(), r.upper.as_deref()) {
                (Some(lower), _) => lower.copy_into(owner),
                (None, Some(upper)) => upper.copy_into(owner),
                (None, None) => owner.object(),
            },
            other => other.copy_into(owner),
        }
    }

    /// Projection to the instance level: each type argument is replaced by its invariant bound.
    ///
    /// `ArrayList<? extends Iterable<? extends String>>` becomes
    /// `ArrayList<Iterable<? extends String>>`, which can be instantiated. Other variants are
    /// copied unchanged.
    pub fn to_instance_type_reference(&self, owner: &Owner<'_>) -> TypeRef {
        let TypeRef::Parameterized(r) = self else {
            return self.copy_into(owner);
        };
        let mut result = ParameterizedRef::new(owner.id(), r.def);
        for arg in &r.args {
            result.push_argument(arg.invariant_bound_substitute(owner));
        }
        TypeRef::Parameterized(result)
    }

    /// View this reference as a `java.util.List`.
    ///
    /// Lists and their subtypes come back as they are. `T[]` becomes `List<T>` with a primitive
    /// component boxed. Anything else, or a universe without a list type, gives `None`.
    pub fn try_convert_to_list_type(&self, owner: &Owner<'_>) -> Option<TypeRef> {
        let list = owner.env().lookup_type(LIST_TYPE)?;
        match self {
            TypeRef::Parameterized(_) => self
                .super_type(owner, list)
                .map(|_| self.copy_into(owner)),
            TypeRef::Array(r) => {
                let mut result = ParameterizedRef::new(owner.id(), list);
                result.push_argument(r.component().wrapper_if_primitive(owner));
                Some(TypeRef::Parameterized(result))
            }
            _ => None,
        }
    }

    pub fn primitive(&self, env: &dyn TypeUniverse) -> Option<PrimitiveType> {
        let def = env.type_def(self.type_def()?)?;
        match def.kind {
            TypeDefKind::Primitive(prim) => Some(prim),
            _ => None,
        }
    }

    pub fn is_primitive(&self, env: &dyn TypeUniverse) -> bool {
        self.primitive(env).is_some()
    }

    pub fn is_void(&self, env: &dyn TypeUniverse) -> bool {
        self.is_type(env.well_known().void)
    }

    pub fn is_wrapper(&self, env: &dyn TypeUniverse) -> bool {
        self.type_def()
            .is_some_and(|def| env.well_known().unboxed(def).is_some())
    }

    pub fn wrapper_if_primitive(&self, owner: &Owner<'_>) -> TypeRef {
        match self.primitive(owner.env()) {
            Some(prim) => owner.raw_unchecked(owner.env().well_known().wrapper(prim)),
            None => self.copy_into(owner),
        }
    }

    pub fn primitive_if_wrapper(&self, owner: &Owner<'_>) -> TypeRef {
        let unboxed = self
            .type_def()
            .and_then(|def| owner.env().well_known().unboxed(def));
        match unboxed {
            Some(prim) => owner.primitive(prim),
            None => self.copy_into(owner),
        }
    }

    /// `true` if the declared types of this reference and all its arguments are visible.
    pub fn is_visible(&self, env: &dyn TypeUniverse, policy: &dyn VisibilityPolicy) -> bool {
        match self {
            TypeRef::Parameterized(r) => {
                is_def_visible(env, policy, r.def)
                    && r.args.iter().all(|a| a.is_visible(env, policy))
            }
            TypeRef::Array(r) => r.element.is_visible(env, policy),
            TypeRef::Wildcard(r) => r
                .upper
                .iter()
                .chain(r.lower.iter())
                .all(|bound| bound.is_visible(env, policy)),
            TypeRef::Compound(r) => r.components.iter().all(|c| c.is_visible(env, policy)),
            TypeRef::TypeParameter(_) | TypeRef::Unknown(_) => true,
        }
    }

    /// This reference if it is visible, otherwise the nearest visible supertype (depth-first over
    /// declared supertypes), with hidden arguments replaced the same way.
    ///
    /// A hidden type met again while its own replacement is being computed
    /// (`class Node implements Comparable<Node>`) becomes `?` in argument position and the root
    /// object type elsewhere.
    pub fn visible_type(&self, owner: &Owner<'_>, policy: &dyn VisibilityPolicy) -> TypeRef {
        let mut resolving = HashSet::new();
        self.visible_type_in(owner, policy, &mut resolving)
    }

    fn visible_type_in(
        &self,
        owner: &Owner<'_>,
        policy: &dyn VisibilityPolicy,
        resolving: &mut HashSet<TypeDefId>,
    ) -> TypeRef {
        let env = owner.env();
        match self {
            TypeRef::Parameterized(r) => {
                if !is_def_visible(env, policy, r.def) {
                    if !resolving.insert(r.def) {
                        return owner.object();
                    }
                    let mut seen = HashSet::new();
                    let found = self
                        .nearest_visible_supertype(owner, policy, &mut seen, resolving)
                        .unwrap_or_else(|| owner.object());
                    resolving.remove(&r.def);
                    return found;
                }
                let mut copy = ParameterizedRef::new(owner.id(), r.def);
                for arg in &r.args {
                    let pending = arg.type_def().is_some_and(|def| resolving.contains(&def));
                    if pending {
                        copy.push_argument(TypeRef::Wildcard(WildcardRef::new(
                            owner.id(),
                            None,
                            None,
                        )));
                    } else {
                        copy.push_argument(arg.visible_type_in(owner, policy, resolving));
                    }
                }
                TypeRef::Parameterized(copy)
            }
            TypeRef::Array(r) => ArrayRef::build(
                owner.id(),
                r.element.visible_type_in(owner, policy, resolving),
                r.dimensions,
            ),
            TypeRef::Wildcard(r) => {
                let upper = r
                    .upper
                    .as_deref()
                    .map(|u| u.visible_type_in(owner, policy, resolving));
                let lower = r
                    .lower
                    .as_deref()
                    .map(|l| l.visible_type_in(owner, policy, resolving));
                TypeRef::Wildcard(WildcardRef::new(owner.id(), upper, lower))
            }
            TypeRef::Compound(r) => CompoundRef::build(
                owner.id(),
                r.components
                    .iter()
                    .map(|c| c.visible_type_in(owner, policy, resolving))
                    .collect(),
            ),
            TypeRef::TypeParameter(_) | TypeRef::Unknown(_) => self.copy_into(owner),
        }
    }

    fn nearest_visible_supertype(
        &self,
        owner: &Owner<'_>,
        policy: &dyn VisibilityPolicy,
        seen: &mut HashSet<TypeDefId>,
        resolving: &mut HashSet<TypeDefId>,
    ) -> Option<TypeRef> {
        for super_type in self.super_types(owner) {
            let Some(def) = super_type.type_def() else {
                continue;
            };
            if !seen.insert(def) {
                continue;
            }
            if is_def_visible(owner.env(), policy, def) {
                return Some(super_type.visible_type_in(owner, policy, resolving));
            }
            let found = super_type.nearest_visible_supertype(owner, policy, seen, resolving);
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Direct supertypes with this reference's type arguments substituted in. Raw references
    /// have raw supertypes. Interfaces without declared supertypes report the root object type.
    pub fn super_types(&self, owner: &Owner<'_>) -> Vec<TypeRef> {
        let env = owner.env();
        match self {
            TypeRef::Parameterized(r) => {
                let Some(def) = env.type_def(r.def) else {
                    return vec![];
                };
                if matches!(def.kind, TypeDefKind::Primitive(_) | TypeDefKind::Void) {
                    return vec![];
                }
                if def.super_types.is_empty() {
                    if def.is_interface() {
                        return vec![owner.object()];
                    }
                    return vec![];
                }
                let raw = r.is_raw(env);
                let context = TypeArgumentContext::for_declared_arguments(env, r);
                let substitutor = Substitutor::new(owner, &context);
                def.super_types
                    .iter()
                    .map(|expr| {
                        let declared = owner.to_reference(expr);
                        if raw {
                            declared.raw_type(owner)
                        } else {
                            substitutor.substitute(&declared)
                        }
                    })
                    .collect()
            }
            TypeRef::Array(_) => {
                let wk = env.well_known();
                vec![
                    owner.object(),
                    owner.raw_unchecked(wk.cloneable),
                    owner.raw_unchecked(wk.serializable),
                ]
            }
            TypeRef::Wildcard(_) => vec![self.upper_bound_substitute(owner)],
            TypeRef::Compound(r) => r.components.iter().map(|c| c.copy_into(owner)).collect(),
            TypeRef::TypeParameter(r) => match env.type_param(r.param) {
                Some(param) if !param.upper_bounds.is_empty() => param
                    .upper_bounds
                    .iter()
                    .map(|bound| owner.to_reference(bound))
                    .collect(),
                _ => vec![owner.object()],
            },
            TypeRef::Unknown(_) => vec![],
        }
    }

    /// View this reference as its ancestor `target`, substituting type arguments along the way.
    ///
    /// Example: `ArrayList<String>` viewed as `java.util.List` is `List<String>`. Returns `None`
    /// when `target` is not an ancestor.
    pub fn super_type(&self, owner: &Owner<'_>, target: TypeDefId) -> Option<TypeRef> {
        let mut seen_types = HashSet::new();
        let mut seen_params = HashSet::new();
        self.super_type_inner(owner, target, &mut seen_types, &mut seen_params)
    }

    fn super_type_inner(
        &self,
        owner: &Owner<'_>,
        target: TypeDefId,
        seen_types: &mut HashSet<TypeDefId>,
        seen_params: &mut HashSet<TypeParamId>,
    ) -> Option<TypeRef> {
        let env = owner.env();
        let wk = env.well_known();
        match self {
            TypeRef::Parameterized(r) => {
                if r.def == target {
                    return Some(self.copy_into(owner));
                }
                let def = env.type_def(r.def)?;
                if matches!(def.kind, TypeDefKind::Primitive(_) | TypeDefKind::Void) {
                    return None;
                }
                if target == wk.object {
                    return Some(owner.object());
                }
                // Interfaces never extend classes.
                if def.is_interface()
                    && env
                        .type_def(target)
                        .is_some_and(|t| t.kind == TypeDefKind::Class)
                {
                    return None;
                }
                if !seen_types.insert(r.def) {
                    return None;
                }
                for super_type in self.super_types(owner) {
                    if let Some(found) =
                        super_type.super_type_inner(owner, target, seen_types, seen_params)
                    {
                        return Some(found);
                    }
                }
                None
            }
            TypeRef::Array(_) => wk
                .is_array_supertype(target)
                .then(|| owner.raw_unchecked(target)),
            TypeRef::TypeParameter(r) => {
                if !seen_params.insert(r.param) {
                    return None;
                }
                let found = self.super_types(owner).into_iter().find_map(|bound| {
                    bound.super_type_inner(owner, target, seen_types, seen_params)
                });
                seen_params.remove(&r.param);
                found
            }
            TypeRef::Wildcard(_) | TypeRef::Compound(_) => {
                self.super_types(owner).into_iter().find_map(|super_type| {
                    super_type.super_type_inner(owner, target, seen_types, seen_params)
                })
            }
            TypeRef::Unknown(_) => None,
        }
    }
}

fn opt_structurally_eq(a: Option<&TypeRef>, b: Option<&TypeRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.structurally_eq(b),
        (None, None) => true,
        _ => false,
    }
}

fn is_def_visible(env: &dyn TypeUniverse, policy: &dyn VisibilityPolicy, def: TypeDefId) -> bool {
    match env.type_def(def).map(|d| d.kind) {
        Some(TypeDefKind::Class | TypeDefKind::Interface) => policy.is_visible(def),
        _ => true,
    }
}
