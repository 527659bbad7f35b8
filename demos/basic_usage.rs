//! Basic usage example for loam
//!
//! This example demonstrates:
//! - Loading a note corpus from a directory
//! - Building the link graph and inspecting backlinks
//! - Building the search index and exports
//!
//! Run with: cargo run --example basic_usage

use loam_core::{
    export::{GraphExport, SearchExport},
    graph,
    loader::load_corpus,
    search, LoamError,
};
use std::{fs, path::Path};
use tempfile::TempDir;

fn main() -> Result<(), LoamError> {
    // Set up logging to see what's happening
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== loam Basic Usage Example ===\n");

    // Create a temporary directory for our example notes
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let notes_path = temp_dir.path();
    create_example_notes(notes_path)?;

    // 1. Load the corpus. The registry is frozen after this point.
    println!("1. Loading notes from {notes_path:?}...");
    let corpus = load_corpus(notes_path)?;
    println!("   ✓ Loaded {} notes\n", corpus.registry.len());

    // 2. Build the link graph.
    println!("2. Resolving references:");
    let built = graph::build(&corpus.registry);
    for note in corpus.registry.all() {
        let backlinks: Vec<String> = built
            .graph
            .backlinks(&note.id)
            .map(|b| b.to_string())
            .collect();
        println!(
            "   {} -> {} outgoing, {} incoming {:?}",
            note.id,
            built.graph.outgoing(&note.id).len(),
            backlinks.len(),
            backlinks,
        );
    }
    for diagnostic in &built.diagnostics {
        println!("   ! {diagnostic}");
    }
    println!();

    // 3. Build the search index and serialize both exports.
    println!("3. Building exports:");
    let documents = search::build_index(&corpus.registry, 200);
    let graph_json = GraphExport::new(&corpus.registry, &built.graph).to_json()?;
    let search_json = SearchExport::new(documents).to_json()?;
    println!("   graph.json: {} bytes", graph_json.len());
    println!("   search-index.json: {} bytes", search_json.len());

    Ok(())
}

fn create_example_notes(root: &Path) -> Result<(), LoamError> {
    fs::create_dir_all(root.join("tools"))?;
    fs::write(
        root.join("index.md"),
        "---\ntitle: Home\n---\n# Home\n\nSee [[foam]] and [[missing-note]].\n",
    )?;
    fs::write(
        root.join("tools/foam.md"),
        "# Foam\n\nBack to [[index]].\n",
    )?;
    Ok(())
}
