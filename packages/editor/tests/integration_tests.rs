//! End-to-end flows: recovering load → parse → graph → mutate → geometry.

use anyhow::Result;
use mapwright_editor::{MapDocument, Mutation, PstCoordinates};
use mapwright_geometry::{to_bounds, to_coordinates, MapDimensions};
use mapwright_parser::{load_with_recovery, parse_map, LoadStrategy, MapElement};
use mapwright_semantics::DependencyGraph;

fn links_of(source: &str) -> Vec<mapwright_parser::LinkDecl> {
    parse_map(source)
        .elements
        .into_iter()
        .filter_map(|e| match e {
            MapElement::Link(link) => Some(link),
            _ => None,
        })
        .collect()
}

#[test]
fn damaged_document_loads_and_stays_editable() -> Result<()> {
    // Unbalanced quote on the component line.
    let damaged = "component \"Cup of Tea [0.79, 0.61]\nBusiness->Cup of Tea";

    let outcome = load_with_recovery(damaged, |text| {
        let map = parse_map(text);
        match map.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(map),
        }
    });

    // The bundled parser recovers the line itself, so the ladder's first
    // rung already succeeds, with recovery notices inside the map.
    assert!(outcome.is_success());
    assert_eq!(outcome.strategy, LoadStrategy::Direct);
    let map = outcome.value.unwrap();
    assert!(map.recovered);
    assert_eq!(map.elements.len(), 2);

    Ok(())
}

#[test]
fn rename_flows_into_the_dependency_graph() -> Result<()> {
    let mut doc = MapDocument::from_source(
        "component Tea [0.7, 0.5]\n\
         component Water [0.5, 0.6]\n\
         component Kettle [0.4, 0.3]\n\
         Tea->Water\n\
         Water->Kettle\n"
            .to_string(),
    );

    let graph = DependencyGraph::build(&links_of(doc.source()));
    assert!(graph.get_descendants("Tea").contains("Kettle"));

    doc.apply(&Mutation::RenameComponent {
        line: 2,
        expected_name: "Water".to_string(),
        new_name: "Hot Water".to_string(),
    })?;

    let graph = DependencyGraph::build(&links_of(doc.source()));
    let descendants = graph.get_descendants("Tea");
    assert!(descendants.contains("Hot Water"));
    assert!(descendants.contains("Kettle"));
    assert!(!descendants.contains("Water"));
    assert!(graph.get_descendant_links("Tea").contains("Hot Water->Kettle"));

    Ok(())
}

#[test]
fn cyclic_links_still_build_a_finite_graph() {
    let graph = DependencyGraph::build(&links_of("A->B\nB->C\nC->A\n"));
    for name in ["A", "B", "C"] {
        assert!(graph.has_descendants(name));
        assert_eq!(graph.get_descendants(name).len(), 2);
    }
}

#[test]
fn pst_resize_round_trips_through_the_document() -> Result<()> {
    let dims = MapDimensions::new(800.0, 600.0);
    let mut doc =
        MapDocument::from_source("settlers [0.70, 0.20, 0.40, 0.60] Build Team\n".to_string());

    // Pull the current box out of the parsed declaration.
    let map = doc.parse();
    let MapElement::Attitude(decl) = &map.elements[0] else {
        panic!("expected an attitude region");
    };
    let current = PstCoordinates::new(decl.mat_left, decl.vis_top, decl.mat_right, decl.vis_bottom);

    // Drag it through pixel space and back.
    let mut bounds = to_bounds(&current, &dims);
    bounds.x += 80.0;
    bounds.width += 40.0;
    let updated = to_coordinates(&bounds, &dims);

    doc.apply(&Mutation::UpdatePstCoordinates {
        line: 1,
        expected: current,
        updated,
    })?;

    assert!(doc.source().contains("settlers [0.70, 0.30, 0.40, 0.75] Build Team"));

    // The rewritten line still parses as the same attitude with the name
    // intact.
    let map = doc.parse();
    let MapElement::Attitude(decl) = &map.elements[0] else {
        panic!("expected an attitude region");
    };
    assert_eq!(decl.name.as_deref(), Some("Build Team"));
    assert!((decl.mat_left - 0.30).abs() < 1e-9);

    Ok(())
}

#[test]
fn a_full_editing_session() -> Result<()> {
    let mut doc = MapDocument::from_source(
        "title Tea Shop\n\
         anchor Business [0.95, 0.63]\n\
         component Cup of Tea [0.79, 0.61]\n\
         pipeline Cup of Tea {\n\
         }\n"
            .to_string(),
    );

    doc.apply(&Mutation::InsertPipelineComponent {
        line: 4,
        expected_pipeline: "Cup of Tea".to_string(),
        component: "Earl Grey".to_string(),
        maturity: 0.65,
    })?;

    doc.apply(&Mutation::AddLink {
        start: "Business".to_string(),
        end: "Cup of Tea".to_string(),
        kind: mapwright_editor::LinkKind::Dependency,
    })?;

    doc.apply(&Mutation::RenameComponent {
        line: 3,
        expected_name: "Cup of Tea".to_string(),
        new_name: "Cup of Chai".to_string(),
    })?;

    let source = doc.source();
    assert!(source.contains("component Cup of Chai [0.79, 0.61]"));
    assert!(source.contains("Business->Cup of Chai"));
    assert!(source.contains("component Earl Grey [0.65]"));
    assert_eq!(doc.version(), 3);

    // Everything still parses without errors.
    let map = doc.parse();
    assert!(map.errors.is_empty(), "errors: {:?}", map.errors);

    Ok(())
}
