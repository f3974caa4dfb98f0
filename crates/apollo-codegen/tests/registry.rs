use crate::fixtures::*;
use apollo_codegen::error::DiagnosticData;
use apollo_codegen::CodegenError;
use apollo_codegen::DocumentRegistry;
use apollo_codegen::ErrorKind;
use pretty_assertions::assert_eq;

fn names<'a>(names: impl IntoIterator<Item = &'a apollo_codegen::Name>) -> Vec<&'a str> {
    names.into_iter().map(|name| name.as_str()).collect()
}

#[test]
fn names_are_unique_across_documents() {
    let err = registry(&[
        ("a.graphql", "fragment F on Droid { name }"),
        ("b.graphql", "fragment F on Human { name }"),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "the fragment `F` is defined multiple times in the document set"
    );

    let err = registry(&[
        ("a.graphql", "query Hero { hero { name } }"),
        ("b.graphql", "query Hero { hero { id } }"),
    ])
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "the operation `Hero` is defined multiple times in the document set"
    );
}

#[test]
fn names_are_unique_within_a_document() {
    let err = registry(&[(
        "a.graphql",
        "query Hero { hero { name } } query Hero { hero { id } }",
    )])
    .unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Validation(ref error)
            if matches!(error.data, DiagnosticData::OperationNameCollision { .. })
    ));
}

#[test]
fn operations_and_fragments_have_separate_namespaces() {
    let registry = registry(&[(
        "a.graphql",
        "query Hero { hero { ...Hero } } fragment Hero on Character { name }",
    )])
    .unwrap();
    assert_eq!(names(registry.operations().keys()), ["Hero"]);
    assert_eq!(names(registry.fragments().keys()), ["Hero"]);
}

#[test]
fn failed_additions_leave_the_registry_unchanged() {
    let mut parser = star_wars_config().parser();
    let mut registry = DocumentRegistry::new();
    registry
        .parse_and_add(&mut parser, "query A { hero { name } }", "a.graphql")
        .unwrap();
    registry
        .parse_and_add(
            &mut parser,
            "query B { hero { name } } fragment F on Droid { id } query A { hero { id } }",
            "b.graphql",
        )
        .unwrap_err();
    assert_eq!(names(registry.operations().keys()), ["A"]);
    assert!(registry.fragments().is_empty());
}

#[test]
fn rejected_documents_are_kept_as_sources() {
    let mut parser = star_wars_config().parser();
    let mut registry = DocumentRegistry::new();
    let err = registry
        .parse_and_add(&mut parser, "{ hero { name } }", "anonymous.graphql")
        .unwrap_err();
    let file_id = err.location().unwrap().file_id();
    let sources = registry.sources();
    assert_eq!(sources[&file_id].path().to_str(), Some("anonymous.graphql"));
    assert!(registry.operations().is_empty());
}

#[test]
fn type_system_definitions_are_rejected() {
    let err = registry(&[(
        "types.graphql",
        "type Foo { a: Int } query Q { hero { name } }",
    )])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "an executable document must not contain an object type definition"
    );
    assert!(err.location().is_some());

    for (text, describe) in [
        ("schema { query: Query }", "a schema definition"),
        ("directive @cached on FIELD", "a directive definition"),
        ("extend type Query { extra: Int }", "an object type extension"),
        ("scalar Date", "a scalar type definition"),
    ] {
        let err = registry(&[("types.graphql", text)]).unwrap_err();
        assert!(
            matches!(
                err,
                CodegenError::Validation(ref error)
                    if error.data == (DiagnosticData::TypeSystemDefinition { describe })
            ),
            "{text}: {err}"
        );
    }
}

#[test]
fn anonymous_operations_are_rejected() {
    let err = registry(&[("a.graphql", "{ hero { name } }")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "anonymous query operations are not supported, every operation must have a name"
    );
    assert!(err.location().is_some());
}

#[test]
fn syntax_errors_keep_their_source() {
    let mut parser = star_wars_config().parser();
    let mut registry = DocumentRegistry::new();
    let err = registry
        .parse_and_add(&mut parser, "query Q { hero {", "broken.graphql")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parsing);
    assert!(
        err.to_string().starts_with("failed to parse document `broken.graphql`"),
        "{err}"
    );
    assert_eq!(registry.sources().len(), 1);
    assert!(registry.operations().is_empty());
}

#[test]
fn compiles_in_registration_order() {
    let compiled = registry(&[
        ("a.graphql", "query Second { hero { name } } fragment Names on Character { name }"),
        ("b.graphql", "query First { droid(id: 1) { ...Names } }"),
    ])
    .unwrap()
    .compile(&catalog())
    .unwrap();
    assert_eq!(names(compiled.operations.keys()), ["Second", "First"]);
    assert_eq!(names(compiled.fragments.keys()), ["Names"]);
    assert_eq!(compiled.sources.len(), 2);
    assert!(compiled.warnings().is_empty());
}

#[test]
fn operations_are_lowered_before_fragments() {
    let err = compile("fragment Bad on Ghost { id } query Broken { hero { nope } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "type `Character` does not have a field `nope` (at query Broken → hero)"
    );
}

#[test]
fn registries_can_be_compiled_against_several_catalogs() {
    let registry = registry(&[("a.graphql", "query Hero { hero { name } }")]).unwrap();
    let first = registry.compile(&catalog()).unwrap();
    let second = registry.compile(&catalog()).unwrap();
    assert_eq!(first.operations, second.operations);
}
