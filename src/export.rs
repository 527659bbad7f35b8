//! Serialized interchange artifacts for the client-side renderer.
//!
//! Two independent exports: the deduplicated relationship graph (node and
//! edge lists for visualization) and the search document sequence. Both are
//! stable and reproducible: ordering is registry load order throughout -
//! explicitly not sorted alphabetically - so an identical corpus serializes
//! to byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{graph::LinkGraph, ident::NoteId, registry::NoteRegistry, search::SearchDocument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NoteId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NoteId,
    pub target: NoteId,
    /// Occurrence count of this (source, target) pair. Metadata only;
    /// duplicate links never produce duplicate rows.
    pub weight: usize,
}

/// Node/edge lists consumed by the client-side graph view. Layout is the
/// client's job; this is pure topology.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphExport {
    /// Project the full graph: every registry note as a node (load order),
    /// every distinct edge once (first-occurrence order), multiplicity
    /// folded into `weight`.
    pub fn new(registry: &NoteRegistry, graph: &LinkGraph) -> GraphExport {
        Self::for_notes(registry, graph, None)
    }

    /// Like [`GraphExport::new`] but restricted to a subset of note ids
    /// (per-page neighborhood views). `None` means everything.
    pub fn for_notes(
        registry: &NoteRegistry,
        graph: &LinkGraph,
        subset: Option<&std::collections::BTreeSet<NoteId>>,
    ) -> GraphExport {
        let included = |id: &NoteId| subset.map(|s| s.contains(id)).unwrap_or(true);

        let nodes = registry
            .all()
            .filter(|note| included(&note.id))
            .map(|note| GraphNode {
                id: note.id.clone(),
                label: note.title.clone(),
            })
            .collect();

        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut seen: BTreeMap<(&NoteId, &NoteId), usize> = BTreeMap::new();
        for note in registry.all() {
            if !included(&note.id) {
                continue;
            }
            for target in graph.outgoing(&note.id) {
                if !included(target) {
                    continue;
                }
                match seen.get(&(&note.id, target)) {
                    Some(row) => edges[*row].weight += 1,
                    None => {
                        seen.insert((&note.id, target), edges.len());
                        edges.push(GraphEdge {
                            source: note.id.clone(),
                            target: target.clone(),
                            weight: 1,
                        });
                    }
                }
            }
        }

        GraphExport { nodes, edges }
    }

    pub fn to_json(&self) -> Result<String, crate::error::LoamError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Search index export, wrapped the way the client bundle expects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchExport {
    pub notes: Vec<SearchDocument>,
}

impl SearchExport {
    pub fn new(documents: Vec<SearchDocument>) -> SearchExport {
        SearchExport { notes: documents }
    }

    pub fn to_json(&self) -> Result<String, crate::error::LoamError> {
        Ok(serde_json::to_string(self)?)
    }
}
