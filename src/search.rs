//! Search index construction.
//!
//! One [`SearchDocument`] per note, in registry load order. The searchable
//! text is the note body with `[[...]]` syntax excised (display text kept,
//! driven by extractor spans) and remaining markup flattened away. Index
//! terms are lowercased alphanumeric tokens; with the `stemming` feature
//! they are additionally run through the Snowball English stemmer so query
//! sides applying the same algorithm match across inflections.
//!
//! This pass reads only the registry. It has no ordering dependency on the
//! graph builder and the two may run concurrently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{
    codec::{md::plain_text, wiki::extract},
    ident::NoteId,
    registry::{Note, NoteRegistry},
};

#[cfg(feature = "stemming")]
use once_cell::sync::Lazy;
#[cfg(feature = "stemming")]
use rust_stemmers::{Algorithm, Stemmer};

#[cfg(feature = "stemming")]
static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// One searchable record per note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: NoteId,
    pub title: String,
    /// Flattened plain text, truncated to the configured preview length.
    pub text: String,
    pub tags: Vec<String>,
    /// Deduplicated index terms from the full (untruncated) text, sorted.
    pub terms: Vec<String>,
}

/// Replace every wiki reference occurrence with its display text, leaving
/// unrelated bytes untouched.
fn flatten_references(body: &str) -> String {
    let mut flattened = String::with_capacity(body.len());
    let mut cursor = 0;
    for reference in extract(body) {
        flattened.push_str(&body[cursor..reference.span.start]);
        flattened.push_str(reference.display());
        cursor = reference.span.end;
    }
    flattened.push_str(&body[cursor..]);
    flattened
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .map(|token| token.to_lowercase())
}

fn index_terms(text: &str, title: &str, tags: &[String]) -> Vec<String> {
    let mut terms: BTreeSet<String> = BTreeSet::new();
    for source in [title, text].into_iter().chain(tags.iter().map(String::as_str)) {
        for token in tokenize(source) {
            #[cfg(feature = "stemming")]
            terms.insert(STEMMER.stem(&token).to_string());
            #[cfg(not(feature = "stemming"))]
            terms.insert(token);
        }
    }
    terms.into_iter().collect()
}

fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

/// Build the search document for a single note.
pub fn document_for(note: &Note, preview_length: usize) -> SearchDocument {
    let text = plain_text(&flatten_references(&note.raw_body));
    let terms = index_terms(&text, &note.title, &note.tags);
    SearchDocument {
        id: note.id.clone(),
        title: note.title.clone(),
        text: truncate_preview(&text, preview_length),
        tags: note.tags.clone(),
        terms,
    }
}

/// Build the full index in registry load order. Pure function of the
/// registry: identical corpora produce identical sequences.
pub fn build_index(registry: &NoteRegistry, preview_length: usize) -> Vec<SearchDocument> {
    registry
        .all()
        .map(|note| document_for(note, preview_length))
        .collect()
}
