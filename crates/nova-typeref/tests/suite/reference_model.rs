use nova_typeref::{
    ConformanceComputer, InvalidConstructionReason, Owner, PrimitiveType, TypeExpr, TypeRef,
    TypeRefError, TypeStore, TypeUniverse,
};

use pretty_assertions::assert_eq;

use super::fixtures::pair_store;

#[test]
fn foreign_type_arguments_are_rejected() {
    let store = TypeStore::with_minimal_jdk();
    let s1 = Owner::new(&store);
    let s2 = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();
    let string = s2.raw(store.well_known().string).unwrap();

    let mut reference = s1.parameterized(list).unwrap();
    let err = reference.add_type_argument(string.clone()).unwrap_err();
    assert_eq!(
        err,
        TypeRefError::OwnershipViolation {
            expected: s1.id(),
            found: s2.id(),
        }
    );
    assert!(reference.type_arguments().is_empty());

    reference.add_type_argument(string.copy_into(&s1)).unwrap();
    assert_eq!(
        TypeRef::Parameterized(reference).identifier(&store),
        "java.util.List<java.lang.String>"
    );
}

#[test]
fn nested_foreign_arguments_are_rejected_too() {
    let store = TypeStore::with_minimal_jdk();
    let s1 = Owner::new(&store);
    let s2 = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();

    let foreign_inner = s2
        .class_ref(list, vec![s2.raw(store.well_known().string).unwrap()])
        .unwrap();
    let err = s1.array(foreign_inner.clone(), 1).unwrap_err();
    assert!(matches!(err, TypeRefError::OwnershipViolation { .. }));
    let err = s1.compound(vec![s1.object(), foreign_inner]).unwrap_err();
    assert!(matches!(err, TypeRefError::OwnershipViolation { .. }));
}

#[test]
fn array_kind_declared_types_cannot_be_parameterized() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let err = owner.parameterized(store.well_known().array).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid type reference: `<array>` is an array type and cannot be parameterized"
    );
    assert!(matches!(
        err,
        TypeRefError::InvalidConstruction {
            reason: InvalidConstructionReason::ArrayType(_)
        }
    ));
}

#[test]
fn pair_is_viewed_as_comparable_of_itself() {
    let (store, pair) = pair_store();
    let owner = Owner::new(&store);
    let comparable = store.type_id("java.lang.Comparable").unwrap();
    let integer = owner.raw(store.type_id("java.lang.Integer").unwrap()).unwrap();
    let string = owner.raw(store.well_known().string).unwrap();

    let reference = owner.class_ref(pair, vec![integer, string]).unwrap();
    let found = reference.super_type(&owner, comparable).unwrap();
    assert_eq!(
        found.identifier(&store),
        "java.lang.Comparable<com.example.Pair<java.lang.Integer, java.lang.String>>"
    );
    assert!(found.is_owned_by(owner.id()));
}

#[test]
fn interfaces_never_reach_classes() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();
    let array_list = store.type_id("java.util.ArrayList").unwrap();
    let reference = owner.class_ref(list, vec![owner.object()]).unwrap();

    assert_eq!(reference.super_type(&owner, array_list), None);
    let object = reference.super_type(&owner, store.well_known().object).unwrap();
    assert_eq!(object.identifier(&store), "java.lang.Object");
}

#[test]
fn resolved_flag_tracks_type_parameters() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let map = store.type_id("java.util.Map").unwrap();
    let params = store.type_def(map).unwrap().type_params.clone();

    let open = owner.to_reference(&TypeExpr::class(
        map,
        vec![TypeExpr::raw(store.well_known().string), TypeExpr::Param(params[1])],
    ));
    assert!(!open.is_resolved());
    assert!(!owner.array(open.clone(), 1).unwrap().is_resolved());
    assert!(!owner.wildcard(Some(open), None).unwrap().is_resolved());

    let closed = owner.to_reference(&TypeExpr::class(
        map,
        vec![
            TypeExpr::raw(store.well_known().string),
            TypeExpr::extends(TypeExpr::raw(store.well_known().object)),
        ],
    ));
    assert!(closed.is_resolved());
    assert_eq!(
        closed.simple_name(&store),
        "Map<String, ? extends Object>"
    );
}

#[test]
fn raw_arrays_and_raw_types_are_detected() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();

    let raw_list = owner.raw(list).unwrap();
    assert!(raw_list.is_raw(&store));
    assert!(owner.array(raw_list, 2).unwrap().is_raw(&store));
    assert!(!owner.raw(store.well_known().string).unwrap().is_raw(&store));
    assert!(!owner
        .array(owner.primitive(PrimitiveType::Int), 1)
        .unwrap()
        .is_raw(&store));
}

#[test]
fn owners_on_separate_threads_work_independently() {
    let store = TypeStore::with_minimal_jdk();
    let ids = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let owner = Owner::new(&store);
                    let list = store.type_id("java.util.List").unwrap();
                    let number = store.type_id("java.lang.Number").unwrap();
                    let integer = store.type_id("java.lang.Integer").unwrap();
                    let target = owner
                        .class_ref(
                            list,
                            vec![owner
                                .wildcard(Some(owner.raw(number).unwrap()), None)
                                .unwrap()],
                        )
                        .unwrap();
                    let source = owner
                        .class_ref(list, vec![owner.raw(integer).unwrap()])
                        .unwrap();
                    assert!(ConformanceComputer::new(&owner).is_conformant(&target, &source));
                    owner.id()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}
