//! Reference resolution against the note corpus.
//!
//! Authors commonly write short references (`[[foam]]`) expecting them to
//! resolve against deeper paths (`tools/foam`), but a corpus may contain two
//! same-named notes in different folders, which must not silently collapse.
//! Resolution is therefore two-tier: an exact canonical-id match wins
//! unconditionally, and only then does suffix matching run, with multiple
//! hits reported as ambiguous rather than picked from quietly.

use crate::{
    codec::wiki::RawReference,
    ident::{split_fragment, NoteId},
    registry::NoteRegistry,
};

/// Outcome of resolving one raw reference. Exactly one variant per
/// occurrence per build; every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A unique target note.
    Resolved(NoteId),
    /// More than one note matched by suffix; candidates in registry load
    /// order. Edge policy belongs to the graph builder, not here.
    Ambiguous(Vec<NoteId>),
    /// No note matched. Carries the original reference text for
    /// diagnostics and broken-link styling.
    Unresolved(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Resolve a raw reference against a fully loaded registry.
///
/// A `#fragment` suffix addresses a heading within the target and is split
/// off before normalization; it never participates in note identity.
pub fn resolve(raw: &RawReference, registry: &NoteRegistry) -> Resolution {
    let (target, _fragment) = split_fragment(&raw.target_text);
    let id = NoteId::normalize(target);
    if id.is_empty() {
        return Resolution::Unresolved(raw.target_text.clone());
    }

    // Exact canonical id match wins unconditionally, even when the same id
    // is also a valid suffix of other notes.
    if registry.contains(&id) {
        return Resolution::Resolved(id);
    }

    let candidates = registry.lookup_by_suffix(id.as_str());
    match candidates.len() {
        0 => Resolution::Unresolved(raw.target_text.clone()),
        1 => Resolution::Resolved(candidates[0].id.clone()),
        _ => Resolution::Ambiguous(candidates.into_iter().map(|n| n.id.clone()).collect()),
    }
}
