use crate::fixtures::*;
use apollo_codegen::encode::EncodableValue;
use apollo_codegen::error::InternalError;
use apollo_codegen::schema::CompositeKind;
use apollo_codegen::ErrorKind;
use expect_test::expect;
use pretty_assertions::assert_eq;

fn keys<'a>(names: impl IntoIterator<Item = &'a apollo_codegen::NamedType>) -> Vec<&'a str> {
    names.into_iter().map(|name| name.as_str()).collect()
}

#[test]
fn lowers_nested_selections() {
    let compiled =
        compile("query Q { hero(episode: JEDI) { name ... on Droid { primaryFunction } } }")
            .unwrap();
    let query = &compiled.operations["Q"];
    assert_eq!(query.name, "Q");
    assert_eq!(query.type_name_suffix(), "Query");
    assert_eq!(query.selection_set.type_name, "Query");
    assert_eq!(query.selection_set.type_kind, CompositeKind::Object);
    expect![[r#"
        __typename: String
        hero: Character? on Character
          name: String
          __typename: String
          ... AsDroid
            primaryFunction: String?
            __typename: String
    "#]]
    .assert_eq(&outline(&query.selection_set));

    let hero = &query.selection_set.object_fields[0];
    assert_eq!(hero.field.arguments.len(), 1);
    assert_eq!(hero.selection_set.type_kind, CompositeKind::Interface);
    assert_eq!(hero.selection_set.path(), "hero");
    let droid = &hero.selection_set.inline_fragments[0];
    assert_eq!(droid.variable_identifier(), "asDroid");
    assert_eq!(droid.selection_set.type_kind, CompositeKind::Object);
    assert_eq!(droid.selection_set.path(), "hero");
    assert!(query.lifted.is_empty());
}

#[test]
fn typename_is_never_duplicated() {
    let compiled = compile("query T { hero { __typename name } }").unwrap();
    let hero = &compiled.operations["T"].selection_set.object_fields[0];
    let keys: Vec<&str> = hero
        .selection_set
        .scalar_fields
        .iter()
        .map(|field| field.response_key().as_str())
        .collect();
    assert_eq!(keys, ["__typename", "name"]);
    assert_eq!(hero.selection_set.scalar_fields[0].ty.to_string(), "String");
}

#[test]
fn aliases_are_response_keys() {
    let compiled = compile("query Al { hero { title: name } }").unwrap();
    let hero = &compiled.operations["Al"].selection_set.object_fields[0];
    let title = &hero.selection_set.scalar_fields[0];
    assert_eq!(title.response_key(), "title");
    assert_eq!(title.name, "name");
    assert_eq!(title.declared_type().to_string(), "String!");
}

#[test]
fn field_metadata_comes_from_the_schema() {
    let compiled = compile(r#"query D { droid(id: "2001") { serialNumber } }"#).unwrap();
    let droid = &compiled.operations["D"].selection_set.object_fields[0];
    assert_eq!(droid.field.ty.to_string(), "Droid?");
    let serial = &droid.selection_set.scalar_fields[0];
    assert_eq!(serial.description(), Some("Factory serial number"));
    assert!(serial.is_deprecated());
    assert_eq!(serial.deprecation_reason(), Some("Use `id`"));
    assert_eq!(serial.ty.to_string(), "String?");
}

#[test]
fn undefined_fields_report_their_path() {
    let err = compile("query U { hero { nickname } }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "type `Character` does not have a field `nickname` (at query U → hero)"
    );
    assert!(err.location().is_some());
}

#[test]
fn leaf_fields_reject_selection_sets() {
    let err = compile("query L { hero { name { length } } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `name` returns a built-in scalar `String` and must not have a selection set \
         (at query L → hero)"
    );
    assert!(err.location().is_some());

    let err = compile("query E { hero { appearsIn { name } } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `appearsIn` returns an enum type `Episode` and must not have a selection set \
         (at query E → hero)"
    );
}

#[test]
fn selected_enums_are_lifted() {
    let compiled = compile("query A { hero { appearsIn } }").unwrap();
    let query = &compiled.operations["A"];
    assert_eq!(keys(query.lifted.enums.keys()), ["Episode"]);
    assert!(query.lifted.input_objects.is_empty());
    assert_eq!(keys(compiled.dependencies.enums.keys()), ["Episode"]);

    let appears_in = &query.selection_set.object_fields[0].selection_set.scalar_fields[0];
    assert_eq!(appears_in.ty.to_string(), "[Episode?]");
}

#[test]
fn missing_root_operation_types() {
    let err = compile("subscription S { hero { name } }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "operation `S` is a subscription, \
         but the schema does not define a subscription root operation type (at subscription S)"
    );
}

#[test]
fn mutations_use_their_root_type() {
    let compiled = compile(
        "mutation Rev($review: ReviewInput!) {
            createReview(episode: JEDI, review: $review) { stars date }
        }",
    )
    .unwrap();
    let mutation = &compiled.operations["Rev"];
    assert_eq!(mutation.type_name_suffix(), "Mutation");
    assert_eq!(mutation.selection_set.type_name, "Mutation");
    expect![[r#"
        __typename: String
        createReview: Review? on Review
          stars: i32
          date: StarWars.Date?
          __typename: String
    "#]]
    .assert_eq(&outline(&mutation.selection_set));
    assert_eq!(mutation.variables[0].ty.to_string(), "ReviewInput");
}

#[test]
fn inline_fragments_without_type_condition_use_the_parent_type() {
    let compiled = compile("query I { hero { ... @include(if: true) { name } } }").unwrap();
    let hero = &compiled.operations["I"].selection_set.object_fields[0];
    let inline = &hero.selection_set.inline_fragments[0];
    assert_eq!(inline.type_condition, "Character");
    assert_eq!(inline.type_identifier(), "AsCharacterIncludeifTrue");
    assert_eq!(inline.variable_identifier(), "asCharacterIncludeifTrue");
}

#[test]
fn inline_fragment_type_conditions_are_checked() {
    let err = compile("query G { hero { ... on Ghost { name } } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "type condition `Ghost` of an inline fragment \
         is not an object, interface, or union type of the schema (at query G → hero)"
    );

    let err = compile("query P { hero { ... on Dog { name } } }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "inline fragment on `Dog` can never apply: \
         it has no possible types in common with parent type `Character` (at query P → hero)"
    );
}

#[test]
fn variables_lift_their_input_types() {
    let compiled = compile(
        "query V($episode: Episode = JEDI, $review: ReviewInput = {stars: 5, favoriteEpisode: EMPIRE}) {
            hero(episode: $episode) { name }
        }",
    )
    .unwrap();
    let query = &compiled.operations["V"];

    let episode = &query.variables[0];
    assert_eq!(episode.name, "episode");
    assert_eq!(episode.ty.to_string(), "Episode?");
    assert_eq!(
        episode.default_value,
        Some(EncodableValue::String("JEDI".into()))
    );

    let review = &query.variables[1];
    let default = serde_json::to_string(review.default_value.as_ref().unwrap()).unwrap();
    assert_eq!(default, r#"{"stars":5,"favoriteEpisode":"EMPIRE"}"#);

    assert_eq!(keys(query.lifted.enums.keys()), ["Episode"]);
    assert_eq!(
        keys(query.lifted.input_objects.keys()),
        ["ReviewInput", "Filter"]
    );
}

#[test]
fn unresolvable_variable_types_are_internal_errors() {
    let err = compile("query X($x: Unknown) { hero { name } }").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CodeGeneration);
    assert_eq!(
        err.to_string(),
        "type `Unknown` of `$x` could not be resolved in the schema"
    );

    let err = compile("query C($c: Character) { hero { name } }").unwrap_err();
    assert!(matches!(
        err,
        apollo_codegen::CodegenError::CodeGeneration(InternalError::UnexpectedTypeKind { .. })
    ));
}

#[test]
fn traversed_fields_lead_to_each_selection_set() {
    let compiled = compile("query F { hero { friends { name } } }").unwrap();
    let hero = &compiled.operations["F"].selection_set.object_fields[0];
    let friends = &hero.selection_set.object_fields[0];
    assert_eq!(friends.field.ty.to_string(), "[Character?]?");
    assert_eq!(friends.selection_set.path(), "hero.friends");
    let traversed: Vec<&str> = friends
        .selection_set
        .traversed_fields
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(traversed, ["hero", "friends"]);
}
