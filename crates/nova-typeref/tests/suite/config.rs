use nova_typeref::{
    json_schema, AnalysisConfig, ApplicabilityPredicate, Candidate, ConformanceComputer,
    OperationDef, Owner, ReferenceContainer, TypeArgumentContext, TypeExpr, TypeRef, TypeStore,
    TypeUniverse, UsageShape,
};

use pretty_assertions::assert_eq;

#[test]
fn strict_configs_reject_unknown_types() {
    let store = TypeStore::with_minimal_jdk();
    let string = store.well_known().string;

    let lenient = Owner::new(&store);
    assert!(ConformanceComputer::new(&lenient)
        .is_conformant(&lenient.raw(string).unwrap(), &lenient.unknown()));
    assert!(ConformanceComputer::new(&lenient).is_conformant_opt(None, None));

    let config = AnalysisConfig::from_toml_str("permissive_unknown = false").unwrap();
    let strict = Owner::with_config(&store, config);
    let computer = ConformanceComputer::new(&strict);
    assert!(!computer.is_conformant(&strict.raw(string).unwrap(), &strict.unknown()));
    assert!(!computer.is_conformant_opt(Some(&strict.object()), None));
}

#[test]
fn variable_arity_is_opt_in() {
    let store = TypeStore::with_minimal_jdk();
    let wk = store.well_known();
    let mut format = OperationDef::new(
        "format",
        wk.string,
        vec![
            TypeExpr::raw(wk.string),
            TypeExpr::array(TypeExpr::raw(wk.object)),
        ],
        TypeExpr::raw(wk.string),
    );
    format.is_varargs = true;

    let fixed = Owner::new(&store);
    let pattern = fixed.raw(wk.string).unwrap();
    let three = vec![
        Some(pattern.clone()),
        Some(fixed.object()),
        Some(fixed.object()),
    ];
    assert!(!call(&fixed, &format, three));

    let config = AnalysisConfig::from_toml_str("variable_arity = true").unwrap();
    let varargs = Owner::with_config(&store, config);
    let pattern = varargs.raw(wk.string).unwrap();
    assert!(call(&varargs, &format, vec![Some(pattern.clone())]));
    assert!(call(
        &varargs,
        &format,
        vec![
            Some(pattern.clone()),
            Some(varargs.object()),
            Some(varargs.raw(wk.string).unwrap()),
        ]
    ));
    let objects = varargs.array(varargs.object(), 1).unwrap();
    assert!(call(&varargs, &format, vec![Some(pattern.clone()), Some(objects)]));
    assert!(!call(&varargs, &format, vec![]));
}

fn call(owner: &Owner<'_>, operation: &OperationDef, arguments: Vec<Option<TypeRef>>) -> bool {
    ApplicabilityPredicate::new(owner).accept(
        Candidate::Operation(operation),
        &UsageShape::MemberCall {
            arguments,
            explicit_operation_call: true,
        },
        ReferenceContainer::AnyFeatureCall,
        &TypeArgumentContext::identity(),
    )
}

#[test]
fn misspelled_keys_are_reported() {
    let err = AnalysisConfig::from_toml_str("permisive_unknown = false").unwrap_err();
    assert!(err.to_string().contains("permisive_unknown"), "{err}");
}

#[test]
fn schema_describes_the_config() {
    let schema = schema_title(&json_schema());
    assert_eq!(schema.as_deref(), Some("AnalysisConfig"));
}

fn schema_title(schema: &schemars::schema::RootSchema) -> Option<String> {
    schema
        .schema
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.title.clone())
}
