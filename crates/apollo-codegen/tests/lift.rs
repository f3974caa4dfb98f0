use crate::fixtures::*;
use pretty_assertions::assert_eq;

fn keys<'a>(names: impl IntoIterator<Item = &'a apollo_codegen::NamedType>) -> Vec<&'a str> {
    names.into_iter().map(|name| name.as_str()).collect()
}

#[test]
fn self_referencing_inputs_are_lifted_once() {
    let compiled =
        compile("query F($filter: Filter) { search(filter: $filter) { __typename } }").unwrap();
    let lifted = &compiled.operations["F"].lifted;
    assert_eq!(keys(lifted.input_objects.keys()), ["Filter"]);
    assert_eq!(keys(lifted.enums.keys()), ["Episode"]);

    let filter = &lifted.input_objects["Filter"];
    assert_eq!(filter.name(), "Filter");
    let fields: Vec<(&str, String, Option<&str>)> = filter
        .fields
        .iter()
        .map(|field| (field.name().as_str(), field.ty.to_string(), field.default_value()))
        .collect();
    assert_eq!(
        fields,
        [
            ("sub", "Filter?".to_owned(), None),
            ("episode", "Episode?".to_owned(), None),
            ("limit", "i32?".to_owned(), Some("10")),
        ]
    );
}

#[test]
fn scalar_variables_lift_nothing() {
    let compiled = compile(r#"query D($id: ID!) { droid(id: $id) { name } }"#).unwrap();
    assert!(compiled.operations["D"].lifted.is_empty());
    assert!(compiled.dependencies.is_empty());
}

#[test]
fn dependencies_are_aggregated_across_definitions() {
    let compiled = registry(&[
        ("a.graphql", "query A($r: ReviewInput) { hero { name } }"),
        ("c.graphql", "fragment C on Character { appearsIn }"),
        ("b.graphql", "query B($f: Filter) { hero { name } }"),
    ])
    .unwrap()
    .compile(&catalog())
    .unwrap();

    assert_eq!(
        keys(compiled.operations["A"].lifted.input_objects.keys()),
        ["ReviewInput", "Filter"]
    );
    assert!(compiled.fragments["C"].lifted.input_objects.is_empty());
    assert_eq!(keys(compiled.dependencies.enums.keys()), ["Episode"]);
    assert_eq!(
        keys(compiled.dependencies.input_objects.keys()),
        ["ReviewInput", "Filter"]
    );
}
