//! Resolution scopes.
//!
//! Every [`TypeRef`] records the [`OwnerId`] of the scope that built it. Composing references
//! from different scopes is rejected; [`TypeRef::copy_into`] is the only way across.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{InvalidConstructionReason, TypeRefError};
use crate::reference::{
    ArrayRef, CompoundRef, ParameterizedRef, TypeParamRef, UnknownRef, WildcardRef,
};
use crate::{
    AnalysisConfig, PrimitiveType, TypeDef, TypeDefId, TypeDefKind, TypeExpr, TypeParamDef,
    TypeParamId, TypeRef, TypeUniverse, WellKnownTypes,
};

static NEXT_OWNER_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u32);

impl OwnerId {
    fn fresh() -> Self {
        OwnerId(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// A resolution scope: the universe being analyzed, the pass configuration, and a unique id that
/// tags every reference created through it.
///
/// Owners are cheap. Create one per analysis request (or per thread) instead of sharing.
pub struct Owner<'env> {
    id: OwnerId,
    env: &'env dyn TypeUniverse,
    config: AnalysisConfig,
}

impl fmt::Debug for Owner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'env> Owner<'env> {
    pub fn new(env: &'env dyn TypeUniverse) -> Self {
        Self::with_config(env, AnalysisConfig::default())
    }

    pub fn with_config(env: &'env dyn TypeUniverse, config: AnalysisConfig) -> Self {
        Self {
            id: OwnerId::fresh(),
            env,
            config,
        }
    }

    /// A new, independent scope over the same universe and configuration.
    pub fn fork(&self) -> Owner<'env> {
        Self::with_config(self.env, self.config.clone())
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn env(&self) -> &'env dyn TypeUniverse {
        self.env
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fails unless `reference` and all of its children belong to this scope.
    pub fn check_owned(&self, reference: &TypeRef) -> Result<(), TypeRefError> {
        match reference.foreign_owner(self.id) {
            Some(found) => Err(TypeRefError::OwnershipViolation {
                expected: self.id,
                found,
            }),
            None => Ok(()),
        }
    }

    /// Start a parameterized reference over `def`; add arguments with
    /// [`ParameterizedRef::add_type_argument`].
    pub fn parameterized(&self, def: TypeDefId) -> Result<ParameterizedRef, TypeRefError> {
        let Some(type_def) = self.env.type_def(def) else {
            return Err(InvalidConstructionReason::MissingTypeDef(def).into());
        };
        if type_def.kind == TypeDefKind::Array {
            return Err(InvalidConstructionReason::ArrayType(type_def.name.clone()).into());
        }
        Ok(ParameterizedRef::new(self.id, def))
    }

    pub fn class_ref(&self, def: TypeDefId, args: Vec<TypeRef>) -> Result<TypeRef, TypeRefError> {
        let mut reference = self.parameterized(def)?;
        for arg in args {
            reference.add_type_argument(arg)?;
        }
        Ok(TypeRef::Parameterized(reference))
    }

    /// `def` without type arguments. Raw when `def` declares type parameters.
    pub fn raw(&self, def: TypeDefId) -> Result<TypeRef, TypeRefError> {
        self.class_ref(def, vec![])
    }

    pub fn object(&self) -> TypeRef {
        self.raw_unchecked(self.well_known().object)
    }

    pub fn primitive(&self, prim: PrimitiveType) -> TypeRef {
        self.raw_unchecked(self.well_known().primitive(prim))
    }

    pub fn void(&self) -> TypeRef {
        self.raw_unchecked(self.well_known().void)
    }

    pub fn array(&self, element: TypeRef, dimensions: u32) -> Result<TypeRef, TypeRefError> {
        if dimensions == 0 {
            return Err(InvalidConstructionReason::ZeroDimensions.into());
        }
        self.check_owned(&element)?;
        Ok(ArrayRef::build(self.id, element, dimensions))
    }

    /// `?`, `? extends upper` or `? super lower`.
    pub fn wildcard(
        &self,
        upper: Option<TypeRef>,
        lower: Option<TypeRef>,
    ) -> Result<TypeRef, TypeRefError> {
        for bound in upper.iter().chain(lower.iter()) {
            self.check_owned(bound)?;
        }
        Ok(TypeRef::Wildcard(WildcardRef::new(self.id, upper, lower)))
    }

    pub fn compound(&self, components: Vec<TypeRef>) -> Result<TypeRef, TypeRefError> {
        for component in &components {
            self.check_owned(component)?;
        }
        Ok(CompoundRef::build(self.id, components))
    }

    pub fn type_param(&self, param: TypeParamId) -> TypeRef {
        TypeRef::TypeParameter(TypeParamRef::new(self.id, param))
    }

    pub fn unknown(&self) -> TypeRef {
        TypeRef::Unknown(UnknownRef::new(self.id, None))
    }

    pub fn unknown_named(&self, name: impl Into<String>) -> TypeRef {
        TypeRef::Unknown(UnknownRef::new(self.id, Some(name.into())))
    }

    /// Convert a declared type expression into a reference owned by this scope.
    ///
    /// Dangling ids and expressions that name the array declared type directly become
    /// [`TypeRef::Unknown`].
    pub fn to_reference(&self, expr: &TypeExpr) -> TypeRef {
        match expr {
            TypeExpr::Class { def, args } => match self.env.type_def(*def) {
                Some(type_def) if type_def.kind != TypeDefKind::Array => {
                    let mut reference = ParameterizedRef::new(self.id, *def);
                    for arg in args {
                        reference.push_argument(self.to_reference(arg));
                    }
                    TypeRef::Parameterized(reference)
                }
                Some(type_def) => self.unknown_named(type_def.name.clone()),
                None => self.unknown(),
            },
            TypeExpr::Param(param) => self.type_param(*param),
            TypeExpr::Array(element) => ArrayRef::build(self.id, self.to_reference(element), 1),
            TypeExpr::Wildcard { upper, lower } => TypeRef::Wildcard(WildcardRef::new(
                self.id,
                upper.as_deref().map(|u| self.to_reference(u)),
                lower.as_deref().map(|l| self.to_reference(l)),
            )),
            TypeExpr::Intersection(parts) => CompoundRef::build(
                self.id,
                parts.iter().map(|part| self.to_reference(part)).collect(),
            ),
            TypeExpr::Unknown => self.unknown(),
        }
    }

    pub(crate) fn raw_unchecked(&self, def: TypeDefId) -> TypeRef {
        TypeRef::Parameterized(ParameterizedRef::new(self.id, def))
    }
}

impl TypeUniverse for Owner<'_> {
    fn type_def(&self, id: TypeDefId) -> Option<&TypeDef> {
        self.env.type_def(id)
    }

    fn type_param(&self, id: TypeParamId) -> Option<&TypeParamDef> {
        self.env.type_param(id)
    }

    fn lookup_type(&self, name: &str) -> Option<TypeDefId> {
        self.env.lookup_type(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        self.env.well_known()
    }
}
