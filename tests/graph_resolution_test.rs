//! End-to-end properties of the load -> resolve -> graph pipeline.

mod common;

use std::collections::BTreeSet;
use tempfile::tempdir;
use test_log::test;

use common::{create_test_garden, write_note};
use loam_core::{
    diagnostic::BuildDiagnostic,
    error::LoamError,
    export::{GraphExport, SearchExport},
    graph,
    ident::NoteId,
    loader::load_corpus,
    search,
};

fn id(s: &str) -> NoteId {
    NoteId::from_canonical(s)
}

#[test]
fn test_symmetry_edges_match_backlinks() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let corpus = load_corpus(&garden).unwrap();
    let built = graph::build(&corpus.registry);

    for note in corpus.registry.all() {
        for target in built.graph.outgoing(&note.id) {
            assert!(
                built.graph.backlinks(target).any(|b| b == &note.id),
                "edge ({}, {}) missing from backlink set",
                note.id,
                target
            );
        }
        for source in built.graph.backlinks(&note.id) {
            assert!(
                built.graph.contains_edge(source, &note.id),
                "backlink {} -> {} has no forward edge",
                source,
                note.id
            );
        }
    }
}

#[test]
fn test_exact_match_beats_suffix_candidates() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_note(root, "x.md", "");
    write_note(root, "y/x.md", "");
    write_note(root, "ref.md", "[[x]]");

    let corpus = load_corpus(root).unwrap();
    let built = graph::build(&corpus.registry);
    assert!(built.graph.contains_edge(&id("ref"), &id("x")));
    assert!(!built.graph.contains_edge(&id("ref"), &id("y/x")));
    // Exact wins cleanly: no ambiguity diagnostic.
    assert!(built.diagnostics.is_empty());
}

#[test]
fn test_ambiguous_tie_break_is_load_order_and_stable() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);

    let resolve_once = || {
        let corpus = load_corpus(&garden).unwrap();
        let built = graph::build(&corpus.registry);
        let ambiguous: Vec<BuildDiagnostic> = built
            .diagnostics
            .iter()
            .filter(|d| d.is_ambiguous_link())
            .cloned()
            .collect();
        (built, ambiguous)
    };

    let (built, ambiguous) = resolve_once();
    // index.md references [[dup]]; a/dup loads before b/dup.
    assert!(built.graph.contains_edge(&id("index"), &id("a/dup")));
    assert!(!built.graph.contains_edge(&id("index"), &id("b/dup")));
    assert_eq!(
        ambiguous,
        vec![BuildDiagnostic::ambiguous_link(
            id("index"),
            "dup",
            vec![id("a/dup"), id("b/dup")]
        )]
    );

    // Repeated runs agree.
    let (rebuilt, re_ambiguous) = resolve_once();
    assert!(rebuilt.graph.contains_edge(&id("index"), &id("a/dup")));
    assert_eq!(ambiguous, re_ambiguous);
}

#[test]
fn test_unresolved_reference_no_edge_one_diagnostic() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_note(root, "x.md", "[[nonexistent]]");

    let corpus = load_corpus(root).unwrap();
    let built = graph::build(&corpus.registry);
    assert_eq!(built.graph.outgoing(&id("x")), &[] as &[NoteId]);
    assert_eq!(
        built.diagnostics,
        vec![BuildDiagnostic::broken_link(id("x"), "nonexistent")]
    );
}

#[test]
fn test_self_link_appears_in_own_backlinks() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let corpus = load_corpus(&garden).unwrap();
    let built = graph::build(&corpus.registry);

    let foam = id("tools/foam");
    assert!(built.graph.contains_edge(&foam, &foam));
    assert!(built.graph.backlinks(&foam).any(|b| b == &foam));
}

#[test]
fn test_duplicate_id_aborts_before_resolution() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_note(root, "clash.md", "[[clash]]");
    write_note(root, "clash.markdown", "");

    let err = load_corpus(root).unwrap_err();
    match err {
        LoamError::DuplicateId { id, first, second } => {
            assert_eq!(id, "clash");
            assert_ne!(first, second);
        }
        other => panic!("expected DuplicateId, got {other:?}"),
    }
}

#[test]
fn test_exports_are_idempotent_byte_identical() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);

    let export_once = || {
        let corpus = load_corpus(&garden).unwrap();
        let built = graph::build(&corpus.registry);
        let docs = search::build_index(&corpus.registry, 500);
        (
            GraphExport::new(&corpus.registry, &built.graph)
                .to_json()
                .unwrap(),
            SearchExport::new(docs).to_json().unwrap(),
        )
    };

    let (graph_a, search_a) = export_once();
    let (graph_b, search_b) = export_once();
    assert_eq!(graph_a, graph_b);
    assert_eq!(search_a, search_b);
}

#[test]
fn test_graph_export_shape() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let corpus = load_corpus(&garden).unwrap();
    let built = graph::build(&corpus.registry);
    let export = GraphExport::new(&corpus.registry, &built.graph);

    // Nodes in load order: the walk sorts by path components.
    let node_ids: Vec<&str> = export.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(node_ids, vec!["a/dup", "b/dup", "index", "tools/foam"]);
    assert_eq!(export.nodes[2].label, "Garden Home");

    // No edge rows toward the broken target, no duplicate rows anywhere.
    let rows: BTreeSet<(&str, &str)> = export
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(rows.len(), export.edges.len(), "edge rows must be distinct");
    assert!(rows.contains(&("index", "a/dup")));
    assert!(rows.contains(&("tools/foam", "tools/foam")));
    assert!(!rows.iter().any(|(_, t)| *t == "nonexistent"));
}

#[test]
fn test_search_index_order_and_content() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let corpus = load_corpus(&garden).unwrap();
    let docs = search::build_index(&corpus.registry, 500);

    let doc_ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(doc_ids, vec!["a/dup", "b/dup", "index", "tools/foam"]);

    let index_doc = &docs[2];
    assert_eq!(index_doc.title, "Garden Home");
    assert_eq!(index_doc.tags, vec!["meta"]);
    // Wiki syntax excised, display text kept.
    assert!(!index_doc.text.contains("[["));
    assert!(index_doc.text.contains("tools/foam"));
}
