use nova_typeref::{
    ConformanceComputer, FunctionTypeConversion, OperationDef, Owner, PrimitiveType, TypeDef,
    TypeDefKind, TypeExpr, TypeRef, TypeStore, TypeUniverse,
};

use pretty_assertions::assert_eq;

use super::fixtures::CollectionsFixture;

fn named(owner: &Owner<'_>, store: &TypeStore, name: &str) -> TypeRef {
    owner.raw(store.type_id(name).unwrap()).unwrap()
}

fn function_n(owner: &Owner<'_>, store: &TypeStore, arity: usize, args: Vec<TypeRef>) -> TypeRef {
    let def = store
        .type_id(&format!("nova.lang.Functions$Function{arity}"))
        .unwrap();
    owner.class_ref(def, args).unwrap()
}

#[test]
fn comparator_round_trips_through_its_function_type() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let computer = ConformanceComputer::new(&owner);
    let comparator = store.type_id("java.util.Comparator").unwrap();
    let string = owner.raw(store.well_known().string).unwrap();
    let reference = owner.class_ref(comparator, vec![string]).unwrap();

    let shape = conversion.to_function_shape(&reference).unwrap();
    assert_eq!(shape.arity(), 2);
    assert_eq!(
        shape.return_type.primitive(&store),
        Some(PrimitiveType::Int)
    );

    let function = shape.to_function_reference(&owner).unwrap();
    assert_eq!(
        function.identifier(&store),
        "nova.lang.Functions$Function2<java.lang.String, java.lang.String, java.lang.Integer>"
    );

    let again = conversion.to_function_shape(&function).unwrap();
    assert_eq!(again.arity(), shape.arity());
    for (original, converted) in shape.params.iter().zip(&again.params) {
        assert!(computer.is_conformant(original, converted));
    }
    assert!(computer.is_conformant(&shape.return_type, &again.return_type));
}

#[test]
fn raw_comparator_compares_objects() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let comparator = named(&owner, &store, "java.util.Comparator");

    let shape = conversion.to_function_shape(&comparator).unwrap();
    let params: Vec<String> = shape.params.iter().map(|p| p.identifier(&store)).collect();
    assert_eq!(params, vec!["java.lang.Object", "java.lang.Object"]);
}

#[test]
fn function_conformance_compares_shapes() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let comparator = store.type_id("java.util.Comparator").unwrap();
    let string = owner.raw(store.well_known().string).unwrap();
    let integer = named(&owner, &store, "java.lang.Integer");
    let comparator_ref = owner.class_ref(comparator, vec![string.clone()]).unwrap();

    let two = function_n(&owner, &store, 2, vec![string.clone(), string.clone(), integer.clone()]);
    let one = function_n(&owner, &store, 1, vec![string, integer]);
    assert!(conversion.is_conformant(&comparator_ref, &two));
    assert!(!conversion.is_conformant(&comparator_ref, &one));

    let runnable = named(&owner, &store, "java.lang.Runnable");
    let raw_function0 = named(&owner, &store, "nova.lang.Functions$Function0");
    assert!(conversion.is_conformant(&runnable, &raw_function0));

    let map = named(&owner, &store, "java.util.Map");
    assert!(!conversion.is_conformant(&runnable, &map));
}

#[test]
fn expected_type_is_parameterized_from_the_actual_shape() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let string = owner.raw(store.well_known().string).unwrap();
    let supplier = named(&owner, &store, "java.util.function.Supplier");
    let actual = function_n(&owner, &store, 0, vec![string]);

    let resolved = conversion.get_resolved_expected_type(&supplier, &actual);
    assert_eq!(
        resolved.identifier(&store),
        "java.util.function.Supplier<java.lang.String>"
    );
}

#[test]
fn unmatched_type_parameters_become_wildcards() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = TypeExpr::raw(store.well_known().object);
    let producer = store.intern_type_id("com.example.Producer");
    let a = store.add_type_param("A", vec![object.clone()]);
    let b = store.add_type_param("B", vec![object.clone()]);
    let mut def = TypeDef::new("com.example.Producer", TypeDefKind::Interface);
    def.type_params = vec![a, b];
    def.operations = vec![OperationDef::new("make", producer, vec![], TypeExpr::Param(b))];
    store.define_type(producer, def);

    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let expected = owner.raw(producer).unwrap();
    let actual = function_n(
        &owner,
        &store,
        0,
        vec![owner.raw(store.well_known().string).unwrap()],
    );

    let resolved = conversion.get_resolved_expected_type(&expected, &actual);
    assert_eq!(resolved.simple_name(&store), "Producer<?, String>");
}

#[test]
fn later_parameter_matches_override_the_return_type() {
    let mut store = TypeStore::with_minimal_jdk();
    let object = TypeExpr::raw(store.well_known().object);
    let op_id = store.intern_type_id("com.example.Op");
    let t = store.add_type_param("T", vec![object]);
    let mut def = TypeDef::new("com.example.Op", TypeDefKind::Interface);
    def.type_params = vec![t];
    def.operations = vec![OperationDef::new(
        "apply",
        op_id,
        vec![TypeExpr::Param(t)],
        TypeExpr::Param(t),
    )];
    store.define_type(op_id, def);

    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let string = owner.raw(store.well_known().string).unwrap();
    let integer = named(&owner, &store, "java.lang.Integer");
    let actual = function_n(&owner, &store, 1, vec![string, integer]);

    let resolved = conversion.get_resolved_expected_type(&owner.raw(op_id).unwrap(), &actual);
    assert_eq!(resolved.simple_name(&store), "Op<String>");
}

#[test]
fn non_function_actuals_are_returned_unchanged() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let conversion = FunctionTypeConversion::new(&owner);
    let supplier = named(&owner, &store, "java.util.function.Supplier");
    let map = named(&owner, &store, "java.util.Map");

    let resolved = conversion.get_resolved_expected_type(&supplier, &map);
    assert!(resolved.structurally_eq(&map));
}

#[test]
fn explicit_type_arguments_win_when_the_count_matches() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.singleton_list;
    let string = owner.raw(store.well_known().string).unwrap();
    let integer = named(&owner, store, "java.lang.Integer");

    let context = conversion.infer_operation_context(op, &[string], &[Some(integer)], None);
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.identifier(store), "java.util.List<java.lang.String>");
}

#[test]
fn argument_types_are_boxed_into_the_context() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.singleton_list;

    let context = conversion.infer_operation_context(
        op,
        &[],
        &[Some(owner.primitive(PrimitiveType::Int))],
        None,
    );
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.simple_name(store), "List<Integer>");
}

#[test]
fn expected_type_wins_over_arguments() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.singleton_list;
    let string = owner.raw(store.well_known().string).unwrap();
    let expected = owner.class_ref(fixture.list, vec![string]).unwrap();
    let integer = named(&owner, store, "java.lang.Integer");

    let context = conversion.infer_operation_context(op, &[], &[Some(integer)], Some(&expected));
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.simple_name(store), "List<String>");
}

#[test]
fn unknown_arguments_leave_the_parameter_captured() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.singleton_list;

    let context = conversion.infer_operation_context(op, &[], &[None], None);
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(
        returned.identifier(store),
        "java.util.List<? extends java.lang.Object>"
    );
}

#[test]
fn surplus_array_dimensions_bind_to_the_parameter() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.first;
    let string = owner.raw(store.well_known().string).unwrap();
    let matrix = owner.array(string, 2).unwrap();

    let context = conversion.infer_operation_context(op, &[], &[Some(matrix)], None);
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.identifier(store), "java.lang.String[]");
}

#[test]
fn the_last_matching_argument_binds_the_parameter() {
    let fixture = CollectionsFixture::new();
    let store = &fixture.store;
    let owner = Owner::new(store);
    let conversion = FunctionTypeConversion::new(&owner);
    let op = &fixture.pick;
    let string = owner.raw(store.well_known().string).unwrap();
    let integer = named(&owner, store, "java.lang.Integer");

    let context =
        conversion.infer_operation_context(op, &[], &[Some(string.clone()), Some(integer)], None);
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.simple_name(store), "Integer");

    let context = conversion.infer_operation_context(op, &[], &[Some(string), None], None);
    let returned = context.resolve(&owner, &owner.to_reference(&op.return_type));
    assert_eq!(returned.simple_name(store), "String");
}
