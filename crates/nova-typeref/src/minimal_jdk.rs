#[cfg(any(test, feature = "test-utils"))]
use crate::{
    OperationDef, PrimitiveType, TypeDef, TypeDefKind, TypeExpr, TypeStore, TypeUniverse,
};

/// Prefix of the structural function types registered by `TypeStore::with_minimal_jdk`.
pub const FUNCTIONS_PREFIX: &str = "nova.lang.Functions$";

/// Highest arity of the structural `FunctionN` types in the minimal JDK.
pub const MAX_FUNCTION_ARITY: usize = 3;

// The fixture universe is only needed by tests; downstream suites enable `test-utils`.
#[cfg(any(test, feature = "test-utils"))]
impl TypeStore {
    /// A small, hand-written slice of the JDK that is enough for IDE-style tests: the root types,
    /// boxing, a few collections and functional interfaces, and the structural
    /// `nova.lang.Functions$FunctionN` types.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::new();
        let wk = store.well_known().clone();
        let object = TypeExpr::raw(wk.object);
        let boolean = TypeExpr::raw(wk.primitive(PrimitiveType::Boolean));
        let int = TypeExpr::raw(wk.primitive(PrimitiveType::Int));
        let string = TypeExpr::raw(wk.string);
        let void = TypeExpr::raw(wk.void);

        if let Some(def) = store.type_mut(wk.object) {
            def.operations = vec![
                OperationDef::new("toString", wk.object, vec![], string.clone()),
                OperationDef::new("equals", wk.object, vec![object.clone()], boolean.clone()),
                OperationDef::new("hashCode", wk.object, vec![], int.clone()),
            ];
        }

        // interface Comparable<T> { int compareTo(T o); }
        let comparable = store.intern_type_id("java.lang.Comparable");
        let comparable_t = store.add_type_param("T", vec![object.clone()]);
        let mut def = TypeDef::new("java.lang.Comparable", TypeDefKind::Interface);
        def.type_params = vec![comparable_t];
        def.operations = vec![OperationDef::new(
            "compareTo",
            comparable,
            vec![TypeExpr::Param(comparable_t)],
            int.clone(),
        )];
        store.define_type(comparable, def);

        let char_sequence =
            store.add_type(TypeDef::new("java.lang.CharSequence", TypeDefKind::Interface));
        if let Some(def) = store.type_mut(wk.string) {
            def.super_types.push(TypeExpr::class(comparable, vec![string.clone()]));
            def.super_types.push(TypeExpr::raw(char_sequence));
        }
        for prim in PrimitiveType::ALL {
            let wrapper = wk.wrapper(prim);
            if let Some(def) = store.type_mut(wrapper) {
                def.super_types
                    .push(TypeExpr::class(comparable, vec![TypeExpr::raw(wrapper)]));
            }
        }

        // interface Runnable { void run(); }
        let runnable = store.intern_type_id("java.lang.Runnable");
        let mut def = TypeDef::new("java.lang.Runnable", TypeDefKind::Interface);
        def.operations = vec![OperationDef::new("run", runnable, vec![], void.clone())];
        store.define_type(runnable, def);

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>
        let enum_id = store.intern_type_id("java.lang.Enum");
        let enum_e = store.add_type_param("E", vec![object.clone()]);
        store.define_type_param(
            enum_e,
            crate::TypeParamDef {
                name: "E".to_string(),
                upper_bounds: vec![TypeExpr::class(enum_id, vec![TypeExpr::Param(enum_e)])],
            },
        );
        let mut def = TypeDef::new("java.lang.Enum", TypeDefKind::Class);
        def.type_params = vec![enum_e];
        def.super_types = vec![
            object.clone(),
            TypeExpr::class(comparable, vec![TypeExpr::Param(enum_e)]),
            TypeExpr::raw(wk.serializable),
        ];
        store.define_type(enum_id, def);

        // interface Iterable<T>, Collection<E> extends Iterable<E>, List<E> extends Collection<E>
        let iterable = store.intern_type_id("java.lang.Iterable");
        let iterable_t = store.add_type_param("T", vec![object.clone()]);
        let mut def = TypeDef::new("java.lang.Iterable", TypeDefKind::Interface);
        def.type_params = vec![iterable_t];
        store.define_type(iterable, def);

        let collection = store.intern_type_id("java.util.Collection");
        let collection_e = store.add_type_param("E", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.Collection", TypeDefKind::Interface);
        def.type_params = vec![collection_e];
        def.super_types = vec![TypeExpr::class(iterable, vec![TypeExpr::Param(collection_e)])];
        def.operations = vec![
            OperationDef::new("size", collection, vec![], int.clone()),
            OperationDef::new(
                "add",
                collection,
                vec![TypeExpr::Param(collection_e)],
                boolean.clone(),
            ),
        ];
        store.define_type(collection, def);

        let list = store.intern_type_id("java.util.List");
        let list_e = store.add_type_param("E", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.List", TypeDefKind::Interface);
        def.type_params = vec![list_e];
        def.super_types = vec![TypeExpr::class(collection, vec![TypeExpr::Param(list_e)])];
        def.operations = vec![OperationDef::new(
            "get",
            list,
            vec![int.clone()],
            TypeExpr::Param(list_e),
        )];
        store.define_type(list, def);

        // class ArrayList<E> implements List<E>, Cloneable, Serializable
        let array_list = store.intern_type_id("java.util.ArrayList");
        let array_list_e = store.add_type_param("E", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.ArrayList", TypeDefKind::Class);
        def.type_params = vec![array_list_e];
        def.super_types = vec![
            object.clone(),
            TypeExpr::class(list, vec![TypeExpr::Param(array_list_e)]),
            TypeExpr::raw(wk.cloneable),
            TypeExpr::raw(wk.serializable),
        ];
        store.define_type(array_list, def);

        // interface Map<K, V>
        let map = store.intern_type_id("java.util.Map");
        let map_k = store.add_type_param("K", vec![object.clone()]);
        let map_v = store.add_type_param("V", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.Map", TypeDefKind::Interface);
        def.type_params = vec![map_k, map_v];
        def.operations = vec![
            OperationDef::new("get", map, vec![object.clone()], TypeExpr::Param(map_v)),
            OperationDef::new(
                "put",
                map,
                vec![TypeExpr::Param(map_k), TypeExpr::Param(map_v)],
                TypeExpr::Param(map_v),
            ),
        ];
        store.define_type(map, def);

        // interface Comparator<T> { int compare(T a, T b); boolean equals(Object o); }
        let comparator = store.intern_type_id("java.util.Comparator");
        let comparator_t = store.add_type_param("T", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.Comparator", TypeDefKind::Interface);
        def.type_params = vec![comparator_t];
        def.operations = vec![
            OperationDef::new(
                "compare",
                comparator,
                vec![TypeExpr::Param(comparator_t), TypeExpr::Param(comparator_t)],
                int.clone(),
            ),
            OperationDef::new("equals", comparator, vec![object.clone()], boolean.clone()),
        ];
        store.define_type(comparator, def);

        // interface Function<T, R> { R apply(T t); }
        let function = store.intern_type_id("java.util.function.Function");
        let function_t = store.add_type_param("T", vec![object.clone()]);
        let function_r = store.add_type_param("R", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.function.Function", TypeDefKind::Interface);
        def.type_params = vec![function_t, function_r];
        def.operations = vec![OperationDef::new(
            "apply",
            function,
            vec![TypeExpr::Param(function_t)],
            TypeExpr::Param(function_r),
        )];
        store.define_type(function, def);

        // interface Supplier<T> { T get(); }
        let supplier = store.intern_type_id("java.util.function.Supplier");
        let supplier_t = store.add_type_param("T", vec![object.clone()]);
        let mut def = TypeDef::new("java.util.function.Supplier", TypeDefKind::Interface);
        def.type_params = vec![supplier_t];
        def.operations = vec![OperationDef::new(
            "get",
            supplier,
            vec![],
            TypeExpr::Param(supplier_t),
        )];
        store.define_type(supplier, def);

        // Structural function types: FunctionN<P1, .., PN, R> { R apply(P1, .., PN); }
        for arity in 0..=MAX_FUNCTION_ARITY {
            let name = format!("{FUNCTIONS_PREFIX}Function{arity}");
            let id = store.intern_type_id(&name);
            let mut type_params = Vec::with_capacity(arity + 1);
            for idx in 1..=arity {
                type_params.push(store.add_type_param(format!("P{idx}"), vec![object.clone()]));
            }
            let result = store.add_type_param("Result", vec![object.clone()]);
            let params = type_params.iter().copied().map(TypeExpr::Param).collect();
            type_params.push(result);

            let mut def = TypeDef::new(name, TypeDefKind::Interface);
            def.type_params = type_params;
            def.operations = vec![OperationDef::new("apply", id, params, TypeExpr::Param(result))];
            store.define_type(id, def);
        }

        store
    }
}
