use crate::fixtures::*;
use expect_test::expect;
use pretty_assertions::assert_eq;

#[test]
fn inline_fragments_on_the_same_type_are_merged() {
    let compiled = compile("query M { hero { ... on Droid { id } ... on Droid { name } } }").unwrap();
    expect![[r#"
        __typename: String
        hero: Character? on Character
          __typename: String
          ... AsDroid
            id: String
            __typename: String
            name: String
    "#]]
    .assert_eq(&outline(&compiled.operations["M"].selection_set));
}

#[test]
fn missing_type_condition_merges_with_the_parent_type() {
    let compiled =
        compile("query M { hero { ... on Character { id } ... { name } } }").unwrap();
    let hero = &compiled.operations["M"].selection_set.object_fields[0];
    assert_eq!(hero.selection_set.inline_fragments.len(), 1);
    assert_eq!(
        hero.selection_set.inline_fragments[0].type_identifier(),
        "AsCharacter"
    );
}

#[test]
fn directives_keep_inline_fragments_apart() {
    let compiled = compile(
        "query M($a: Boolean!) {
            hero {
                ... on Droid @include(if: $a) { id }
                ... on Droid { name }
                ... on Droid @include(if: $a) { primaryFunction }
            }
        }",
    )
    .unwrap();
    let hero = &compiled.operations["M"].selection_set.object_fields[0];
    let identifiers: Vec<String> = hero
        .selection_set
        .inline_fragments
        .iter()
        .map(|inline| inline.type_identifier())
        .collect();
    assert_eq!(identifiers, ["AsDroidIncludeifA", "AsDroid"]);
    let included: Vec<&str> = hero.selection_set.inline_fragments[0]
        .selection_set
        .scalar_fields
        .iter()
        .map(|field| field.name.as_str())
        .collect();
    assert_eq!(included, ["id", "__typename", "primaryFunction"]);
}

#[test]
fn sibling_fields_of_the_same_type_are_disambiguated() {
    let compiled = compile("query D { person { a: friend { id } b: friend { id } } }").unwrap();
    let person = &compiled.operations["D"].selection_set.object_fields[0];
    expect![[r#"
        __typename: String
        a: APerson? on Person (disambiguated)
          id: String
          __typename: String
        b: BPerson? on Person (disambiguated)
          id: String
          __typename: String
    "#]]
    .assert_eq(&outline(&person.selection_set));

    let compiled = compile("query N { person { friend { id } pet { name } } }").unwrap();
    let person = &compiled.operations["N"].selection_set.object_fields[0];
    assert!(person
        .selection_set
        .object_fields
        .iter()
        .all(|object| !object.requires_disambiguation));
}

#[test]
fn disambiguation_ignores_arguments() {
    let compiled = compile(
        "query H {
            a: hero(episode: JEDI) { name }
            b: hero(episode: EMPIRE) { name }
        }",
    )
    .unwrap();
    let identifiers: Vec<String> = compiled.operations["H"]
        .selection_set
        .object_fields
        .iter()
        .map(|object| object.type_identifier().to_string())
        .collect();
    assert_eq!(identifiers, ["ACharacter?", "BCharacter?"]);
}

#[test]
fn sorted_copies_leave_document_order_alone() {
    let compiled = compile(
        "query S { hero { name id ... on Human { height } ... on Droid { primaryFunction } } }",
    )
    .unwrap();
    let hero = &compiled.operations["S"].selection_set.object_fields[0].selection_set;
    expect![[r#"
        __typename: String
        id: String
        name: String
        ... AsDroid
          __typename: String
          primaryFunction: String?
        ... AsHuman
          __typename: String
          height: f64?
    "#]]
    .assert_eq(&outline(&hero.sorted()));
    let keys: Vec<&str> = hero
        .scalar_fields
        .iter()
        .map(|field| field.response_key().as_str())
        .collect();
    assert_eq!(keys, ["name", "id", "__typename"]);
}
