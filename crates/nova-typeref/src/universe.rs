//! The declared-type universe.
//!
//! Declared types are owned by the caller and only read by this crate. Signatures of supertypes,
//! bounds and members are stored as [`TypeExpr`], an owner-free description that gets converted
//! into owned [`crate::TypeRef`]s on demand.

use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDefId(pub(crate) u32);

impl TypeDefId {
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub(crate) u32);

impl TypeParamId {
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Char
                | PrimitiveType::Int
                | PrimitiveType::Long
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Double)
    }

    /// Position in the widening order. `char` sits next to `short` but neither widens to the
    /// other.
    fn rank(self) -> u8 {
        match self {
            PrimitiveType::Boolean => 0,
            PrimitiveType::Byte => 1,
            PrimitiveType::Short | PrimitiveType::Char => 2,
            PrimitiveType::Int => 3,
            PrimitiveType::Long => 4,
            PrimitiveType::Float => 5,
            PrimitiveType::Double => 6,
        }
    }

    /// Identity or widening primitive conversion from `self` to `target`.
    ///
    /// Narrowing is never implicit. `byte` does not widen to `char`, and `char` only widens to
    /// `int` and beyond.
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        if self == target {
            return true;
        }
        if self == PrimitiveType::Boolean || target == PrimitiveType::Boolean {
            return false;
        }
        if target == PrimitiveType::Char {
            return false;
        }
        if self == PrimitiveType::Char && target == PrimitiveType::Short {
            return false;
        }
        self.rank() < target.rank()
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    Class,
    Interface,
    Primitive(PrimitiveType),
    Void,
    /// The synthetic declared type behind array references. References to it are built through
    /// [`crate::Owner::array`], never as parameterized references.
    Array,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

/// A type as written in a declaration (supertype clause, bound, member signature).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Class { def: TypeDefId, args: Vec<TypeExpr> },
    Param(TypeParamId),
    Array(Box<TypeExpr>),
    Wildcard {
        upper: Option<Box<TypeExpr>>,
        lower: Option<Box<TypeExpr>>,
    },
    Intersection(Vec<TypeExpr>),
    Unknown,
}

impl TypeExpr {
    pub fn class(def: TypeDefId, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Class { def, args }
    }

    pub fn raw(def: TypeDefId) -> Self {
        TypeExpr::Class { def, args: vec![] }
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(element))
    }

    pub fn extends(upper: TypeExpr) -> Self {
        TypeExpr::Wildcard {
            upper: Some(Box::new(upper)),
            lower: None,
        }
    }

    pub fn super_of(lower: TypeExpr) -> Self {
        TypeExpr::Wildcard {
            upper: None,
            lower: Some(Box::new(lower)),
        }
    }

    pub fn unbounded() -> Self {
        TypeExpr::Wildcard {
            upper: None,
            lower: None,
        }
    }

    /// The declared type this expression is headed by, if it is a class expression.
    pub fn head(&self) -> Option<TypeDefId> {
        match self {
            TypeExpr::Class { def, .. } => Some(*def),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationDef {
    pub name: String,
    pub declaring: TypeDefId,
    pub visibility: Visibility,
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<TypeExpr>,
    pub return_type: TypeExpr,
    pub is_static: bool,
    pub is_varargs: bool,
}

impl OperationDef {
    /// A public, non-static, fixed-arity instance operation.
    pub fn new(
        name: impl Into<String>,
        declaring: TypeDefId,
        params: Vec<TypeExpr>,
        return_type: TypeExpr,
    ) -> Self {
        Self {
            name: name.into(),
            declaring,
            visibility: Visibility::Public,
            type_params: vec![],
            params,
            return_type,
            is_static: false,
            is_varargs: false,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub declaring: TypeDefId,
    pub visibility: Visibility,
    pub ty: TypeExpr,
    pub is_final: bool,
    pub is_static: bool,
}

impl FieldDef {
    /// A public, mutable instance field.
    pub fn new(name: impl Into<String>, declaring: TypeDefId, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            declaring,
            visibility: Visibility::Public,
            ty,
            is_final: false,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    /// Qualified name, e.g. `java.util.List` or `java.util.Map$Entry`.
    pub name: String,
    pub kind: TypeDefKind,
    pub visibility: Visibility,
    pub type_params: Vec<TypeParamId>,
    pub super_types: Vec<TypeExpr>,
    pub operations: Vec<OperationDef>,
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeDefKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            type_params: vec![],
            super_types: vec![],
            operations: vec![],
            fields: vec![],
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(|c| c == '.' || c == '$')
            .next()
            .unwrap_or(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeDefKind::Interface
    }
}

/// Ids of the declared types the algorithms need to know about by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: TypeDefId,
    pub string: TypeDefId,
    pub cloneable: TypeDefId,
    pub serializable: TypeDefId,
    pub void: TypeDefId,
    pub void_wrapper: TypeDefId,
    pub array: TypeDefId,
    /// `(primitive, wrapper)` pairs, indexed in [`PrimitiveType::ALL`] order.
    pub primitives: [(TypeDefId, TypeDefId); 8],
}

impl WellKnownTypes {
    pub fn primitive(&self, prim: PrimitiveType) -> TypeDefId {
        self.primitives[Self::index(prim)].0
    }

    pub fn wrapper(&self, prim: PrimitiveType) -> TypeDefId {
        self.primitives[Self::index(prim)].1
    }

    /// The primitive boxed by `def`, if `def` is one of the eight wrapper types.
    pub fn unboxed(&self, def: TypeDefId) -> Option<PrimitiveType> {
        PrimitiveType::ALL
            .iter()
            .copied()
            .find(|prim| self.wrapper(*prim) == def)
    }

    /// Structural supertypes every array conforms to.
    pub fn is_array_supertype(&self, def: TypeDefId) -> bool {
        def == self.object || def == self.cloneable || def == self.serializable
    }

    fn index(prim: PrimitiveType) -> usize {
        PrimitiveType::ALL
            .iter()
            .position(|p| *p == prim)
            .unwrap_or_default()
    }
}

/// Read-only query interface over the declared-type universe.
///
/// Implementations must be deterministic and must not change while an analysis pass runs.
pub trait TypeUniverse {
    fn type_def(&self, id: TypeDefId) -> Option<&TypeDef>;
    fn type_param(&self, id: TypeParamId) -> Option<&TypeParamDef>;
    fn lookup_type(&self, name: &str) -> Option<TypeDefId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// Decides whether a declared type may be named from the current analysis context.
pub trait VisibilityPolicy {
    fn is_visible(&self, def: TypeDefId) -> bool;
}

impl<F> VisibilityPolicy for F
where
    F: Fn(TypeDefId) -> bool,
{
    fn is_visible(&self, def: TypeDefId) -> bool {
        self(def)
    }
}

/// In-memory [`TypeUniverse`].
#[derive(Clone, Debug)]
pub struct TypeStore {
    types: Vec<TypeDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, TypeDefId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// A store holding only the types [`WellKnownTypes`] requires.
    ///
    /// With the `test-utils` feature, `TypeStore::with_minimal_jdk` builds a universe with
    /// collections and functional interfaces.
    pub fn new() -> Self {
        let placeholder = TypeDefId(0);
        let mut store = Self {
            types: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnownTypes {
                object: placeholder,
                string: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
                void: placeholder,
                void_wrapper: placeholder,
                array: placeholder,
                primitives: [(placeholder, placeholder); 8],
            },
        };

        let object = store.add_type(TypeDef::new("java.lang.Object", TypeDefKind::Class));
        let object_ty = TypeExpr::raw(object);

        let serializable =
            store.add_type(TypeDef::new("java.io.Serializable", TypeDefKind::Interface));
        let cloneable = store.add_type(TypeDef::new("java.lang.Cloneable", TypeDefKind::Interface));

        let mut string = TypeDef::new("java.lang.String", TypeDefKind::Class);
        string.super_types = vec![object_ty.clone(), TypeExpr::raw(serializable)];
        let string = store.add_type(string);

        let void = store.add_type(TypeDef::new("void", TypeDefKind::Void));
        let mut void_wrapper = TypeDef::new("java.lang.Void", TypeDefKind::Class);
        void_wrapper.super_types = vec![object_ty.clone()];
        let void_wrapper = store.add_type(void_wrapper);

        let array = store.add_type(TypeDef::new("<array>", TypeDefKind::Array));

        let mut number = TypeDef::new("java.lang.Number", TypeDefKind::Class);
        number.super_types = vec![object_ty.clone(), TypeExpr::raw(serializable)];
        let number = store.add_type(number);

        let mut primitives = [(placeholder, placeholder); 8];
        for (idx, prim) in PrimitiveType::ALL.iter().copied().enumerate() {
            let prim_id = store.add_type(TypeDef::new(prim.name(), TypeDefKind::Primitive(prim)));
            let mut wrapper = TypeDef::new(prim.wrapper_name(), TypeDefKind::Class);
            wrapper.super_types = if prim.is_integral() && prim != PrimitiveType::Char
                || prim.is_floating()
            {
                vec![TypeExpr::raw(number)]
            } else {
                vec![object_ty.clone(), TypeExpr::raw(serializable)]
            };
            let wrapper_id = store.add_type(wrapper);
            primitives[idx] = (prim_id, wrapper_id);
        }

        store.well_known = WellKnownTypes {
            object,
            string,
            cloneable,
            serializable,
            void,
            void_wrapper,
            array,
            primitives,
        };
        store
    }

    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bounds: Vec<TypeExpr>,
    ) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        id
    }

    /// Replace a type parameter's definition. Used for self-referential bounds
    /// (`E extends Enum<E>`), where the id must exist before the bound can mention it.
    pub fn define_type_param(&mut self, id: TypeParamId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.0 as usize) {
            *slot = def;
        }
    }

    pub fn add_type(&mut self, def: TypeDef) -> TypeDefId {
        let id = self.intern_type_id(&def.name);
        self.define_type(id, def);
        id
    }

    /// Reserve an id for `name` without defining it yet.
    pub fn intern_type_id(&mut self, name: &str) -> TypeDefId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = TypeDefId(self.types.len() as u32);
        self.types.push(TypeDef::new(name, TypeDefKind::Class));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn define_type(&mut self, id: TypeDefId, def: TypeDef) {
        let Some(slot) = self.types.get_mut(id.0 as usize) else {
            return;
        };
        if slot.name != def.name {
            self.by_name.remove(&slot.name);
            self.by_name.insert(def.name.clone(), id);
        }
        *slot = def;
    }

    pub fn type_mut(&mut self, id: TypeDefId) -> Option<&mut TypeDef> {
        self.types.get_mut(id.0 as usize)
    }

    pub fn type_id(&self, name: &str) -> Option<TypeDefId> {
        self.by_name.get(name).copied()
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse for TypeStore {
    fn type_def(&self, id: TypeDefId) -> Option<&TypeDef> {
        self.types.get(id.0 as usize)
    }

    fn type_param(&self, id: TypeParamId) -> Option<&TypeParamDef> {
        self.type_params.get(id.0 as usize)
    }

    fn lookup_type(&self, name: &str) -> Option<TypeDefId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        // Implicit `java.lang.*` lookup for simple names.
        if !name.contains('.') {
            return self.by_name.get(&format!("java.lang.{name}")).copied();
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
