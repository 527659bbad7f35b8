//! The note corpus.
//!
//! A [`NoteRegistry`] holds every discovered note, keyed by canonical id and
//! iterable in load order. It is populated exactly once per build and
//! read-only afterwards: reference resolution only ever runs against a fully
//! loaded registry (load-all, then resolve-all), so resolution results can
//! never depend on discovery interleaving.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::LoamError, ident::NoteId};

/// One parsed source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Canonical identifier, assigned once at load time and never recomputed.
    pub id: NoteId,
    /// Display title: front-matter title, else first heading, else the id.
    pub title: String,
    /// Original text content with front matter removed. Immutable after
    /// load; reference spans index into this string.
    pub raw_body: String,
    /// Tags from front matter, in authored order.
    pub tags: Vec<String>,
    /// Optional date string from front matter, passed through untouched.
    pub date: Option<String>,
    /// Corpus-relative source path, separator-normalized. Drives the file
    /// tree view and the sitemap.
    pub rel_path: String,
}

/// The source-of-truth note table for a single build.
#[derive(Debug, Clone, Default)]
pub struct NoteRegistry {
    notes: Vec<Note>,
    index: BTreeMap<NoteId, usize>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note to the corpus. Two notes must never share an id; a
    /// collision is a corpus-level structural defect and fails the whole
    /// build rather than silently resolving.
    pub fn register(&mut self, note: Note) -> Result<(), LoamError> {
        if let Some(existing_idx) = self.index.get(&note.id) {
            return Err(LoamError::DuplicateId {
                id: note.id.to_string(),
                first: self.notes[*existing_idx].rel_path.clone(),
                second: note.rel_path,
            });
        }
        tracing::debug!("registered note '{}' from {}", note.id, note.rel_path);
        self.index.insert(note.id.clone(), self.notes.len());
        self.notes.push(note);
        Ok(())
    }

    pub fn lookup_exact(&self, id: &NoteId) -> Option<&Note> {
        self.index.get(id).map(|idx| &self.notes[*idx])
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.index.contains_key(id)
    }

    /// Every note whose id ends with `text` as a path-segment-aligned
    /// suffix, in load order. Supports the authoring style of referencing a
    /// note by bare filename or partial path (`[[foam]]` for `tools/foam`).
    ///
    /// Matching is exact-case: ids preserve source case and a reference must
    /// match it. There is no case-insensitive fallback.
    pub fn lookup_by_suffix(&self, text: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.id.has_segment_suffix(text))
            .collect()
    }

    /// Notes in load order. The registry never sorts; order is whatever the
    /// loader's deterministic walk produced.
    pub fn all(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
