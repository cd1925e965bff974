use std::collections::HashMap;

use nova_typeref::{
    Owner, PrimitiveType, Substitutor, TypeArgumentContext, TypeExpr, TypeRef, TypeStore,
    TypeUniverse,
};

use pretty_assertions::assert_eq;

fn closed_references(owner: &Owner<'_>, store: &TypeStore) -> Vec<TypeRef> {
    let wk = store.well_known();
    let list = store.type_id("java.util.List").unwrap();
    let map = store.type_id("java.util.Map").unwrap();
    let number = store.type_id("java.lang.Number").unwrap();
    let string = owner.raw(wk.string).unwrap();

    let extends_number = owner
        .wildcard(Some(owner.raw(number).unwrap()), None)
        .unwrap();
    let list_of_numbers = owner.class_ref(list, vec![extends_number.clone()]).unwrap();
    let cloneable = owner.raw(wk.cloneable).unwrap();
    vec![
        owner.object(),
        owner.primitive(PrimitiveType::Long),
        owner.raw(list).unwrap(),
        owner
            .class_ref(map, vec![string.clone(), list_of_numbers])
            .unwrap(),
        owner.array(string.clone(), 2).unwrap(),
        owner.wildcard(None, Some(string)).unwrap(),
        owner
            .compound(vec![
                owner.raw(wk.cloneable).unwrap(),
                owner.raw(wk.serializable).unwrap(),
            ])
            .unwrap(),
        owner.unknown_named("Missing"),
        owner
            .compound(vec![extends_number.clone(), cloneable.clone()])
            .unwrap(),
        owner.array(extends_number.clone(), 1).unwrap(),
        owner
            .wildcard(Some(owner.compound(vec![extends_number, cloneable]).unwrap()), None)
            .unwrap(),
    ]
}

#[test]
fn closed_references_are_unchanged_by_any_context() {
    let store = TypeStore::with_minimal_jdk();
    let source = Owner::new(&store);
    let target = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();
    let e = store.type_def(list).unwrap().type_params[0];

    let contexts = vec![
        TypeArgumentContext::identity(),
        TypeArgumentContext::capturing(store.well_known().object),
        TypeArgumentContext::new(
            HashMap::from([(e, source.raw(store.well_known().string).unwrap())]),
            Some(store.well_known().object),
        ),
    ];
    for reference in closed_references(&source, &store) {
        assert!(reference.is_resolved(), "{}", reference.identifier(&store));
        for context in &contexts {
            let substituted = Substitutor::new(&target, context).substitute(&reference);
            assert!(
                substituted.structurally_eq(&reference),
                "{} became {}",
                reference.identifier(&store),
                substituted.identifier(&store)
            );
            assert!(substituted.is_owned_by(target.id()));
        }
    }
}

#[test]
fn self_referential_bounds_are_expanded_once() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let comparable = store.type_id("java.lang.Comparable").unwrap();
    let enum_id = store.type_id("java.lang.Enum").unwrap();
    let e = store.type_def(enum_id).unwrap().type_params[0];

    let declared = owner.to_reference(&TypeExpr::class(comparable, vec![TypeExpr::Param(e)]));
    let context = TypeArgumentContext::capturing(store.well_known().object);
    let result = context.resolve(&owner, &declared);
    assert_eq!(result.simple_name(&store), "Comparable<? extends Enum<?>>");
    assert!(result.is_resolved());
}

#[test]
fn receiver_context_resolves_member_signatures() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let map = store.type_id("java.util.Map").unwrap();
    let integer = owner.raw(store.type_id("java.lang.Integer").unwrap()).unwrap();
    let string = owner.raw(store.well_known().string).unwrap();
    let receiver = owner.class_ref(map, vec![string, integer]).unwrap();

    let context = TypeArgumentContext::for_receiver(&owner, &receiver);
    let put = store
        .type_def(map)
        .unwrap()
        .operations
        .iter()
        .find(|op| op.name == "put")
        .unwrap();
    let params: Vec<String> = put
        .params
        .iter()
        .map(|param| context.resolve(&owner, &owner.to_reference(param)).simple_name(&store))
        .collect();
    assert_eq!(params, vec!["String", "Integer"]);
    let returned = context.resolve(&owner, &owner.to_reference(&put.return_type));
    assert_eq!(returned.simple_name(&store), "Integer");
}

#[test]
fn inherited_members_see_the_subtype_arguments() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let array_list = store.type_id("java.util.ArrayList").unwrap();
    let collection = store.type_id("java.util.Collection").unwrap();
    let receiver = owner
        .class_ref(array_list, vec![owner.raw(store.well_known().string).unwrap()])
        .unwrap();

    let context = TypeArgumentContext::for_receiver(&owner, &receiver);
    let add = &store.type_def(collection).unwrap().operations[1];
    assert_eq!(add.name, "add");
    let param = context.resolve(&owner, &owner.to_reference(&add.params[0]));
    assert_eq!(param.identifier(&store), "java.lang.String");
}

#[test]
fn raw_receivers_capture_member_types() {
    let store = TypeStore::with_minimal_jdk();
    let owner = Owner::new(&store);
    let list = store.type_id("java.util.List").unwrap();
    let get = &store.type_def(list).unwrap().operations[0];

    let context = TypeArgumentContext::for_receiver(&owner, &owner.raw(list).unwrap());
    let returned = context.resolve(&owner, &owner.to_reference(&get.return_type));
    assert_eq!(returned.simple_name(&store), "? extends Object");
    assert_eq!(
        returned.upper_bound_substitute(&owner).simple_name(&store),
        "Object"
    );
}
