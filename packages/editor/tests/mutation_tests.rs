//! Comprehensive mutation tests

use mapwright_editor::{MapDocument, Mutation, MutationError, PstCoordinates};
use mapwright_parser::LinkKind;

const TEA_SHOP: &str = "title Tea Shop\n\
    anchor Business [0.95, 0.63]\n\
    component Cup of Tea [0.79, 0.61]\n\
    component Kettle [0.43, 0.35]\n\
    Business->Cup of Tea\n\
    Cup of Tea->Kettle\n\
    evolve Kettle->Electric Kettle 0.62\n\
    pioneers [0.9, 0.1, 0.7, 0.4]\n";

#[test]
fn rename_component_updates_every_reference() {
    let mut doc = MapDocument::from_source(TEA_SHOP.to_string());

    let mutation = Mutation::RenameComponent {
        line: 4,
        expected_name: "Kettle".to_string(),
        new_name: "Stove Kettle".to_string(),
    };
    doc.apply(&mutation).expect("rename should succeed");

    let source = doc.source();
    assert!(source.contains("component Stove Kettle [0.43, 0.35]"));
    assert!(source.contains("Cup of Tea->Stove Kettle"));
    assert!(source.contains("evolve Stove Kettle->Electric Kettle 0.62"));
    // Unrelated lines are untouched.
    assert!(source.contains("anchor Business [0.95, 0.63]"));
}

#[test]
fn rename_with_stale_expectation_leaves_document_alone() {
    let mut doc = MapDocument::from_source(TEA_SHOP.to_string());
    let before = doc.source().to_string();

    let mutation = Mutation::RenameComponent {
        line: 4,
        expected_name: "Teapot".to_string(),
        new_name: "Stove Kettle".to_string(),
    };
    let err = doc.apply(&mutation).expect_err("stale rename must fail");

    assert!(err.to_string().contains("modified by another operation"));
    assert_eq!(doc.source(), before);
    assert_eq!(doc.version(), 0);
}

#[test]
fn rename_targeting_the_wrong_line_fails_cleanly() {
    let mut doc = MapDocument::from_source(TEA_SHOP.to_string());

    // Line 5 is a link, not a component declaration.
    let mutation = Mutation::RenameComponent {
        line: 5,
        expected_name: "Business".to_string(),
        new_name: "Customer".to_string(),
    };
    assert!(doc.apply(&mutation).is_err());
    assert_eq!(doc.version(), 0);
}

#[test]
fn pst_update_rewrites_numbers_with_two_decimals() {
    let mut doc = MapDocument::from_source(TEA_SHOP.to_string());

    let mutation = Mutation::UpdatePstCoordinates {
        line: 8,
        expected: PstCoordinates::new(0.1, 0.9, 0.4, 0.7),
        updated: PstCoordinates::new(0.15, 0.85, 0.45, 0.65),
    };
    doc.apply(&mutation).expect("pst update should succeed");

    assert!(doc
        .source()
        .contains("pioneers [0.85, 0.15, 0.65, 0.45]"));
}

#[test]
fn add_link_then_duplicate_is_refused() {
    let mut doc = MapDocument::from_source(TEA_SHOP.to_string());

    let mutation = Mutation::AddLink {
        start: "Business".to_string(),
        end: "Kettle".to_string(),
        kind: LinkKind::Dependency,
    };
    doc.apply(&mutation).expect("first link should succeed");
    assert!(doc.source().contains("Business->Kettle"));

    let err = doc.apply(&mutation).expect_err("duplicate link must fail");
    assert!(matches!(
        err,
        mapwright_editor::EditorError::Mutation(MutationError::DuplicateLink { .. })
    ));
}

#[test]
fn multiline_names_round_trip_through_rename() {
    let mut doc = MapDocument::from_source(
        "component \"Multi\\nLine\" [0.5, 0.5]\n\"Multi\\nLine\"->Target\n".to_string(),
    );

    let mutation = Mutation::RenameComponent {
        line: 1,
        expected_name: "Multi\nLine".to_string(),
        new_name: "Multi\nLine v2".to_string(),
    };
    doc.apply(&mutation).expect("rename should succeed");

    assert!(doc.source().contains("component \"Multi\\nLine v2\" [0.5, 0.5]"));
    assert!(doc.source().contains("\"Multi\\nLine v2\"->Target"));

    // The new declaration parses back to the raw name.
    let map = doc.parse();
    assert_eq!(map.elements[0].name(), Some("Multi\nLine v2"));
}

#[test]
fn mutations_serialize_for_the_wire() {
    let mutations = vec![
        Mutation::RenameNote {
            line: 2,
            expected_text: "old".to_string(),
            new_text: "new".to_string(),
        },
        Mutation::AddLink {
            start: "A".to_string(),
            end: "B".to_string(),
            kind: LinkKind::Flow,
        },
    ];

    let json = serde_json::to_string(&mutations).unwrap();
    let back: Vec<Mutation> = serde_json::from_str(&json).unwrap();
    assert_eq!(mutations, back);
}
