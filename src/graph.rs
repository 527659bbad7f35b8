//! The directed link graph and its derived backlink index.
//!
//! [`LinkGraph`] is id-keyed adjacency data, not a pointer graph: outgoing
//! edges as ordered lists (duplicates preserved, one per occurrence in the
//! source text) and incoming edges as derived sets. Notes reference each
//! other freely, including cycles and self-links, so nothing here ever holds
//! a note - only its id.
//!
//! [`build`] consumes every note's extracted references through the resolver
//! in a single synchronous pass: edges and backlinks are constructed
//! together and nothing is observable until the pass completes, so the
//! symmetry invariant - edge (a,b) exists iff a is in backlinks(b) - holds at
//! every point a caller can see.

use petgraph::graph::{Graph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
    codec::wiki::{extract, RawReference},
    diagnostic::BuildDiagnostic,
    ident::NoteId,
    registry::NoteRegistry,
    resolve::{resolve, Resolution},
};

/// One reference occurrence paired with its resolution outcome, in source
/// order. The markup renderer splices presentation markup from these.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub reference: RawReference,
    pub outcome: Resolution,
}

impl ResolvedReference {
    /// The note this occurrence links to, if any: the unique target when
    /// resolved, the load-order tie-break winner when ambiguous.
    pub fn link_target(&self) -> Option<&NoteId> {
        match &self.outcome {
            Resolution::Resolved(id) => Some(id),
            Resolution::Ambiguous(candidates) => candidates.first(),
            Resolution::Unresolved(_) => None,
        }
    }
}

/// Directed link graph over note ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGraph {
    /// Edge multiset: one target entry per reference occurrence.
    outgoing: BTreeMap<NoteId, Vec<NoteId>>,
    /// Derived reverse index; presence only, multiplicity collapsed.
    incoming: BTreeMap<NoteId, BTreeSet<NoteId>>,
}

impl LinkGraph {
    /// Resolved link targets of `id`, ordered by occurrence, duplicates
    /// preserved.
    pub fn outgoing(&self, id: &NoteId) -> &[NoteId] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Notes that reference `id`.
    pub fn backlinks(&self, id: &NoteId) -> impl Iterator<Item = &NoteId> {
        self.incoming.get(id).into_iter().flatten()
    }

    pub fn contains_edge(&self, source: &NoteId, target: &NoteId) -> bool {
        self.outgoing(source).contains(target)
    }

    /// Number of occurrences of the (source, target) edge. Multiplicity is
    /// export metadata; backlink presence collapses it.
    pub fn multiplicity(&self, source: &NoteId, target: &NoteId) -> usize {
        self.outgoing(source).iter().filter(|t| *t == target).count()
    }

    /// Total edge occurrences.
    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    /// Ids within `depth` links of `center`, following edges in both
    /// directions. Cycle-safe breadth-first walk over a petgraph index
    /// graph; `center` itself is included. Powers per-page neighborhood
    /// graph views.
    pub fn neighborhood(&self, center: &NoteId, depth: usize) -> BTreeSet<NoteId> {
        let mut result = BTreeSet::new();
        result.insert(center.clone());
        if depth == 0 {
            return result;
        }

        let mut graph: Graph<NoteId, ()> = Graph::new();
        let mut indices: BTreeMap<&NoteId, NodeIndex> = BTreeMap::new();
        for (source, targets) in &self.outgoing {
            for target in targets {
                for id in [source, target] {
                    if !indices.contains_key(id) {
                        indices.insert(id, graph.add_node(id.clone()));
                    }
                }
                graph.update_edge(indices[source], indices[target], ());
            }
        }
        let Some(start) = indices.get(center) else {
            return result;
        };

        let mut frontier = VecDeque::from([(*start, 0usize)]);
        let mut visited = BTreeSet::from([*start]);
        while let Some((node, dist)) = frontier.pop_front() {
            if dist == depth {
                continue;
            }
            for direction in [petgraph::Direction::Outgoing, petgraph::Direction::Incoming] {
                for next in graph.neighbors_directed(node, direction) {
                    if visited.insert(next) {
                        result.insert(graph[next].clone());
                        frontier.push_back((next, dist + 1));
                    }
                }
            }
        }
        result
    }
}

/// Everything the graph pass produces: the graph itself, per-note resolved
/// reference spans for the renderer, and link diagnostics (one entry per
/// occurrence).
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub graph: LinkGraph,
    pub resolutions: BTreeMap<NoteId, Vec<ResolvedReference>>,
    pub diagnostics: Vec<BuildDiagnostic>,
}

/// Build the link graph from a fully loaded registry.
///
/// Per-outcome policy:
/// - resolved: edge, no diagnostic
/// - ambiguous: edge to the first candidate in load order (the loader's walk
///   is deterministic, so the tie-break reproduces across runs) plus an
///   `AmbiguousLink` diagnostic naming every candidate
/// - unresolved: no edge, a `BrokenLink` diagnostic
///
/// Edges are only ever materialized toward notes present in the registry;
/// self-links are ordinary edges. Backlinks are derived from the completed
/// edge list, never tracked separately.
pub fn build(registry: &NoteRegistry) -> GraphBuild {
    let mut edges: Vec<(NoteId, NoteId)> = Vec::new();
    let mut resolutions: BTreeMap<NoteId, Vec<ResolvedReference>> = BTreeMap::new();
    let mut diagnostics: Vec<BuildDiagnostic> = Vec::new();

    for note in registry.all() {
        let mut note_refs: Vec<ResolvedReference> = Vec::new();
        for reference in extract(&note.raw_body) {
            let outcome = resolve(&reference, registry);
            match &outcome {
                Resolution::Resolved(target) => {
                    edges.push((note.id.clone(), target.clone()));
                }
                Resolution::Ambiguous(candidates) => {
                    edges.push((note.id.clone(), candidates[0].clone()));
                    diagnostics.push(BuildDiagnostic::ambiguous_link(
                        note.id.clone(),
                        reference.target_text.clone(),
                        candidates.clone(),
                    ));
                }
                Resolution::Unresolved(original) => {
                    diagnostics.push(BuildDiagnostic::broken_link(
                        note.id.clone(),
                        original.clone(),
                    ));
                }
            }
            note_refs.push(ResolvedReference { reference, outcome });
        }
        if !note_refs.is_empty() {
            resolutions.insert(note.id.clone(), note_refs);
        }
    }

    tracing::debug!(
        "link graph: {} notes, {} edge occurrences, {} diagnostics",
        registry.len(),
        edges.len(),
        diagnostics.len()
    );

    // Edges and backlinks are populated together from the same completed
    // list; no caller observes one without the other.
    let mut graph = LinkGraph::default();
    for (source, target) in edges {
        graph
            .incoming
            .entry(target.clone())
            .or_default()
            .insert(source.clone());
        graph.outgoing.entry(source).or_default().push(target);
    }

    GraphBuild {
        graph,
        resolutions,
        diagnostics,
    }
}
