//! Function-type conversion.
//!
//! Bridges single-abstract-operation declared types (`Comparator<T>`, `Runnable`, ...) and the
//! structural `FunctionN<P1, .., PN, R>` types through a common [`FunctionShape`].

use std::collections::{HashMap, HashSet, VecDeque};

use crate::conformance::ConformanceComputer;
use crate::reference::{ArrayRef, ParameterizedRef, WildcardRef};
use crate::{
    OperationDef, Owner, TypeArgumentContext, TypeDefId, TypeExpr, TypeParamId, TypeRef,
    Visibility,
};

/// Canonical `(parameter types) -> return type` form of a function-like reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionShape {
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl FunctionShape {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The structural function type of this shape, e.g. `Function2<String, String, Integer>`
    /// for `(String, String) -> int`.
    ///
    /// Primitive positions are boxed and a `void` return becomes the `Void` wrapper. Returns
    /// `None` when the universe has no function type of this arity.
    pub fn to_function_reference(&self, owner: &Owner<'_>) -> Option<TypeRef> {
        let name = format!(
            "{}Function{}",
            owner.config().function_type_prefix,
            self.arity()
        );
        let def = owner.env().lookup_type(&name)?;
        let mut reference = owner.parameterized(def).ok()?;
        for param in &self.params {
            reference.push_argument(as_type_argument(owner, param));
        }
        reference.push_argument(as_type_argument(owner, &self.return_type));
        Some(TypeRef::Parameterized(reference))
    }
}

/// Type arguments can't be primitive: box them, and turn `void` into its wrapper.
fn as_type_argument(owner: &Owner<'_>, reference: &TypeRef) -> TypeRef {
    let env = owner.env();
    if reference.is_void(env) {
        return owner.raw_unchecked(env.well_known().void_wrapper);
    }
    reference.wrapper_if_primitive(owner)
}

fn is_object_operation(operation: &OperationDef) -> bool {
    matches!(
        (operation.name.as_str(), operation.arity()),
        ("toString", 0) | ("equals", 1) | ("hashCode", 0)
    )
}

pub struct FunctionTypeConversion<'a, 'env> {
    owner: &'a Owner<'env>,
}

impl<'a, 'env> FunctionTypeConversion<'a, 'env> {
    pub fn new(owner: &'a Owner<'env>) -> Self {
        Self { owner }
    }

    /// `true` if `reference` names one of the structural function types, `{prefix}Function{N}`.
    pub fn is_function_type(&self, reference: &TypeRef) -> bool {
        let prefix = self.owner.config().function_type_prefix.as_str();
        reference
            .type_def()
            .and_then(|def| self.owner.env().type_def(def))
            .and_then(|def| def.name.strip_prefix(prefix)?.strip_prefix("Function"))
            .is_some_and(|arity| !arity.is_empty() && arity.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Convert a function-like reference into its shape.
    ///
    /// Structural function types carry the shape in their arguments (last one is the return
    /// type; no arguments means `() -> void`). Any other declared type converts when it has
    /// exactly one qualifying operation, resolved against the reference's own type arguments.
    pub fn to_function_shape(&self, reference: &TypeRef) -> Option<FunctionShape> {
        match reference {
            TypeRef::Parameterized(_) => {}
            TypeRef::Wildcard(_) => {
                return self.to_function_shape(&reference.upper_bound_substitute(self.owner));
            }
            _ => return None,
        }
        if self.is_function_type(reference) {
            return Some(self.structural_shape(reference));
        }
        let operation = self.find_single_operation(reference)?;
        let context = TypeArgumentContext::for_receiver(self.owner, reference);
        Some(self.operation_shape(operation, &context))
    }

    fn structural_shape(&self, reference: &TypeRef) -> FunctionShape {
        let owner = self.owner;
        match reference.type_arguments().split_last() {
            Some((return_type, params)) => FunctionShape {
                params: params
                    .iter()
                    .map(|param| param.invariant_bound_substitute(owner))
                    .collect(),
                return_type: return_type.upper_bound_substitute(owner),
            },
            None => FunctionShape {
                params: vec![],
                return_type: owner.void(),
            },
        }
    }

    fn operation_shape(
        &self,
        operation: &OperationDef,
        context: &TypeArgumentContext,
    ) -> FunctionShape {
        let owner = self.owner;
        let resolve = |expr: &TypeExpr| context.resolve(owner, &owner.to_reference(expr));
        FunctionShape {
            params: operation
                .params
                .iter()
                .map(|param| resolve(param).invariant_bound_substitute(owner))
                .collect(),
            return_type: resolve(&operation.return_type).upper_bound_substitute(owner),
        }
    }

    /// The single qualifying operation of `reference`'s declared type and its supertypes.
    ///
    /// Qualifying means public, non-static, not declared by the root object type and not one of
    /// `toString()`, `equals(x)`, `hashCode()`. Redeclarations of the same signature in a
    /// subtype count once. More than one distinct operation yields `None`.
    pub fn find_single_operation(&self, reference: &TypeRef) -> Option<&'env OperationDef> {
        let root = reference.type_def()?;
        let mut signatures = HashSet::new();
        let mut found: Option<&'env OperationDef> = None;
        for operation in self.all_operations(root) {
            if !self.qualifies(operation) || !signatures.insert(self.signature(operation)) {
                continue;
            }
            if let Some(first) = found {
                tracing::debug!(
                    target: "nova.typeref",
                    ty = %reference.simple_name(self.owner.env()),
                    first = %first.name,
                    second = %operation.name,
                    "ambiguous function type conversion"
                );
                return None;
            }
            found = Some(operation);
        }
        found
    }

    /// Operations of `root` and its supertypes, nearest declarations first.
    fn all_operations(&self, root: TypeDefId) -> Vec<&'env OperationDef> {
        let env = self.owner.env();
        let object = env.well_known().object;
        let mut seen = HashSet::new();
        let mut pending = VecDeque::from([root]);
        let mut operations = Vec::new();
        while let Some(id) = pending.pop_front() {
            if id == object || !seen.insert(id) {
                continue;
            }
            let Some(def) = env.type_def(id) else {
                continue;
            };
            operations.extend(def.operations.iter());
            pending.extend(def.super_types.iter().filter_map(TypeExpr::head));
        }
        operations
    }

    fn qualifies(&self, operation: &OperationDef) -> bool {
        operation.visibility == Visibility::Public
            && !operation.is_static
            && operation.declaring != self.owner.env().well_known().object
            && !is_object_operation(operation)
    }

    /// Name plus erased parameter types.
    fn signature(&self, operation: &OperationDef) -> (String, Vec<String>) {
        let owner = self.owner;
        let params = operation
            .params
            .iter()
            .map(|param| {
                owner
                    .to_reference(param)
                    .raw_type(owner)
                    .identifier(owner.env())
            })
            .collect();
        (operation.name.clone(), params)
    }

    /// `true` if both sides convert, have the same arity, every `right` parameter conforms to
    /// the corresponding `left` parameter and the `right` return type conforms to the `left` one.
    pub fn is_conformant(&self, left: &TypeRef, right: &TypeRef) -> bool {
        let (Some(left), Some(right)) =
            (self.to_function_shape(left), self.to_function_shape(right))
        else {
            return false;
        };
        if left.arity() != right.arity() {
            return false;
        }
        let computer = ConformanceComputer::new(self.owner);
        left.params
            .iter()
            .zip(&right.params)
            .all(|(l, r)| computer.is_conformant(l, r))
            && computer.is_conformant(&left.return_type, &right.return_type)
    }

    /// Parameterize `expected`'s declared type from the shape of `actual`.
    ///
    /// Each type parameter of the expected type is looked up in the return type of its single
    /// operation first, then in the parameters in order; later matches overwrite earlier ones.
    /// Unmatched parameters become `?`. When either side doesn't convert, `actual` is returned
    /// unchanged.
    pub fn get_resolved_expected_type(&self, expected: &TypeRef, actual: &TypeRef) -> TypeRef {
        let owner = self.owner;
        let unchanged = || actual.copy_into(owner);
        let Some(expected) = expected.as_parameterized() else {
            return unchanged();
        };
        let Some(def) = owner.env().type_def(expected.def()) else {
            return unchanged();
        };
        let (Some(declared), Some(actual_shape)) = (
            self.declared_shape(expected.def()),
            self.to_function_shape(actual),
        ) else {
            return unchanged();
        };

        let mut result = ParameterizedRef::new(owner.id(), expected.def());
        for &param in &def.type_params {
            let found = std::iter::once((&declared.return_type, &actual_shape.return_type))
                .chain(declared.params.iter().zip(&actual_shape.params))
                .filter_map(|(decl, info)| self.find_match(param, decl, info))
                .last();
            let argument = match found {
                Some(found) => as_type_argument(owner, &found),
                None => TypeRef::Wildcard(WildcardRef::new(owner.id(), None, None)),
            };
            result.push_argument(argument);
        }
        TypeRef::Parameterized(result)
    }

    /// Shape of `def`'s single operation in terms of `def`'s own type parameters.
    fn declared_shape(&self, def: TypeDefId) -> Option<FunctionShape> {
        let owner = self.owner;
        let type_def = owner.env().type_def(def)?;
        let mut self_reference = ParameterizedRef::new(owner.id(), def);
        for &param in &type_def.type_params {
            self_reference.push_argument(owner.type_param(param));
        }
        let self_reference = TypeRef::Parameterized(self_reference);
        let operation = self.find_single_operation(&self_reference)?;
        let context = TypeArgumentContext::for_receiver(owner, &self_reference);
        Some(self.operation_shape(operation, &context))
    }

    /// Find what `param` stands for in `information`, given that `declaration` mentions it at
    /// the structurally corresponding position.
    ///
    /// With `<T> List<T> foo()`, `find_match(T, List<T>, ArrayList<String>)` is `String`.
    pub fn find_match(
        &self,
        param: TypeParamId,
        declaration: &TypeRef,
        information: &TypeRef,
    ) -> Option<TypeRef> {
        let owner = self.owner;
        match (declaration, information) {
            (TypeRef::TypeParameter(d), _) if d.param() == param => {
                Some(information.copy_into(owner))
            }
            (TypeRef::Parameterized(d), TypeRef::Parameterized(i)) => {
                let aligned;
                let info_args = if d.def() == i.def() {
                    i.type_arguments()
                } else {
                    aligned = information.super_type(owner, d.def())?;
                    aligned.type_arguments()
                };
                d.type_arguments()
                    .iter()
                    .zip(info_args)
                    .find_map(|(decl, info)| self.find_match(param, decl, info))
            }
            (TypeRef::Array(d), TypeRef::Array(i)) if d.dimensions() <= i.dimensions() => {
                let surplus = i.dimensions() - d.dimensions();
                let info_element = if surplus == 0 {
                    i.element().clone()
                } else {
                    ArrayRef::build(owner.id(), i.element().rebind(owner.id()), surplus)
                };
                self.find_match(param, d.element(), &info_element)
            }
            (TypeRef::Wildcard(d), TypeRef::Wildcard(i)) => {
                let upper = match (d.upper(), i.upper()) {
                    (Some(decl), Some(info)) => self.find_match(param, decl, info),
                    _ => None,
                };
                upper.or_else(|| match (d.lower(), i.lower()) {
                    (Some(decl), Some(info)) => self.find_match(param, decl, info),
                    _ => None,
                })
            }
            (TypeRef::Wildcard(d), _) => {
                let bound_is_param = d
                    .upper()
                    .into_iter()
                    .chain(d.lower())
                    .any(|bound| matches!(bound, TypeRef::TypeParameter(p) if p.param() == param));
                bound_is_param.then(|| information.copy_into(owner))
            }
            _ => None,
        }
    }

    /// `true` if `param` occurs anywhere in `reference`.
    pub fn is_referenced(&self, param: TypeParamId, reference: &TypeRef) -> bool {
        match reference {
            TypeRef::TypeParameter(r) => r.param() == param,
            TypeRef::Parameterized(r) => r
                .type_arguments()
                .iter()
                .any(|arg| self.is_referenced(param, arg)),
            TypeRef::Array(r) => self.is_referenced(param, r.element()),
            TypeRef::Wildcard(r) => r
                .upper()
                .into_iter()
                .chain(r.lower())
                .any(|bound| self.is_referenced(param, bound)),
            TypeRef::Compound(r) => r
                .components()
                .iter()
                .any(|component| self.is_referenced(param, component)),
            TypeRef::Unknown(_) => false,
        }
    }

    /// Type-argument context for a call of a generic operation.
    ///
    /// Explicit type arguments win when their count matches the operation's type parameters.
    /// Otherwise each type parameter is taken from `expected_type` when the return type mentions
    /// it, else from the last argument whose declared parameter type yields a match. Parameters
    /// that stay open are captured against the root object type.
    pub fn infer_operation_context(
        &self,
        operation: &OperationDef,
        explicit_type_args: &[TypeRef],
        argument_types: &[Option<TypeRef>],
        expected_type: Option<&TypeRef>,
    ) -> TypeArgumentContext {
        let owner = self.owner;
        let object = owner.env().well_known().object;
        if operation.type_params.is_empty() {
            return TypeArgumentContext::capturing(object);
        }
        if explicit_type_args.len() == operation.type_params.len() {
            return TypeArgumentContext::from_explicit(
                &operation.type_params,
                explicit_type_args,
                Some(object),
            );
        }
        if !explicit_type_args.is_empty() {
            tracing::debug!(
                target: "nova.typeref",
                operation = %operation.name,
                expected = operation.type_params.len(),
                found = explicit_type_args.len(),
                "ignoring explicit type arguments"
            );
        }

        let return_type = owner.to_reference(&operation.return_type);
        let params: Vec<TypeRef> = operation
            .params
            .iter()
            .map(|param| owner.to_reference(param))
            .collect();
        let mut mapping = HashMap::new();
        for &param in &operation.type_params {
            let from_expected = expected_type
                .filter(|_| self.is_referenced(param, &return_type))
                .and_then(|expected| self.find_match(param, &return_type, expected));
            let found = from_expected.or_else(|| {
                params
                    .iter()
                    .zip(argument_types)
                    .filter(|(declared, _)| self.is_referenced(param, declared))
                    .filter_map(|(declared, actual)| {
                        self.find_match(param, declared, actual.as_ref()?)
                    })
                    .last()
            });
            if let Some(found) = found {
                mapping.insert(param, as_type_argument(owner, &found));
            }
        }
        TypeArgumentContext::new(mapping, Some(object))
    }
}
