use crate::fixtures::*;
use apollo_codegen::schema::CompositeKind;
use apollo_codegen::ErrorKind;
use expect_test::expect;
use pretty_assertions::assert_eq;

const DOG_FIELDS: &str = "fragment DogFields on Dog { barkVolume }";

#[test]
fn spreads_need_overlapping_possible_types() {
    let err = registry(&[
        ("query.graphql", "query Q { cat { ...DogFields } }"),
        ("dog.graphql", DOG_FIELDS),
    ])
    .unwrap()
    .compile(&catalog())
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "fragment `DogFields` cannot be spread here: its type condition `Dog` \
         has no possible types in common with parent type `Cat` (at query Q → cat)"
    );
}

#[test]
fn spreads_into_abstract_types() {
    let compiled = registry(&[
        ("query.graphql", "query P { pets { ...DogFields } }"),
        ("dog.graphql", DOG_FIELDS),
    ])
    .unwrap()
    .compile(&catalog())
    .unwrap();
    expect![[r#"
        __typename: String
        pets: [Pet] on Pet
          __typename: String
          ...DogFields
    "#]]
    .assert_eq(&outline(&compiled.operations["P"].selection_set));

    let fragment = &compiled.fragments["DogFields"];
    assert_eq!(fragment.type_condition, "Dog");
    expect![[r#"
        barkVolume: i32?
        __typename: String
    "#]]
    .assert_eq(&outline(&fragment.selection_set));
}

#[test]
fn spreads_refer_to_known_fragments() {
    let err = compile("query M { pets { ...Nope } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot find fragment `Nope` in this document set (at query M → pets)"
    );
}

#[test]
fn fragment_type_conditions_are_composite_types() {
    let err = compile("fragment F on Ghost { id }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "type condition `Ghost` of fragment `F` \
         is not an object, interface, or union type of the schema (at fragment F)"
    );

    let err = compile("fragment F on Episode { id }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = compile("query Q { hero { ...F } } fragment F on Ghost { id }").unwrap_err();
    assert!(err.to_string().ends_with("(at query Q → hero)"), "{err}");
}

#[test]
fn fragments_only_lift_enums() {
    let compiled = compile("fragment CharacterFields on Character { name appearsIn }").unwrap();
    let fragment = &compiled.fragments["CharacterFields"];
    let enums: Vec<&str> = fragment.lifted.enums.keys().map(|name| name.as_str()).collect();
    assert_eq!(enums, ["Episode"]);
    assert!(fragment.lifted.input_objects.is_empty());
    assert_eq!(fragment.selection_set.type_kind, CompositeKind::Interface);
}

#[test]
fn selections_on_unions() {
    let compiled = compile(
        "query S {
            search {
                ... on Droid { primaryFunction }
                ... on Human { height }
            }
        }",
    )
    .unwrap();
    let search = &compiled.operations["S"].selection_set.object_fields[0];
    assert_eq!(search.selection_set.type_kind, CompositeKind::Union);
    expect![[r#"
        __typename: String
        search: [SearchResult?]? on SearchResult
          __typename: String
          ... AsDroid
            primaryFunction: String?
            __typename: String
          ... AsHuman
            height: f64?
            __typename: String
    "#]]
    .assert_eq(&outline(&compiled.operations["S"].selection_set));
}

#[test]
fn fields_of_union_members_can_be_selected_directly() {
    let compiled = compile("query S { search { name } }").unwrap();
    let search = &compiled.operations["S"].selection_set.object_fields[0];
    assert_eq!(search.selection_set.scalar_fields[0].name, "name");
}
