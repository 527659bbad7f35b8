//! Diagnostic types for corpus loading and reference resolution.
//!
//! Broken and ambiguous links are normal data states of a note corpus, not
//! failures: they are collected here and surfaced to the CLI/report layer
//! while the build carries on. Only duplicate-id collisions abort a build
//! (see [`crate::error::LoamError::DuplicateId`]).

use serde::{Deserialize, Serialize};

use crate::ident::NoteId;

/// A non-fatal issue discovered while loading notes or resolving references.
/// One entry per occurrence, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BuildDiagnostic {
    /// A reference whose target resolves to no known note. No edge is
    /// created; the renderer styles the occurrence as broken.
    BrokenLink {
        source: NoteId,
        reference: String,
    },
    /// A reference matching more than one note by suffix. An edge to the
    /// first candidate in load order is still created; the candidates are
    /// recorded so tooling can flag the ambiguity.
    AmbiguousLink {
        source: NoteId,
        reference: String,
        candidates: Vec<NoteId>,
    },
    /// A source file that could not be decoded as UTF-8 text. The note is
    /// excluded from the registry; other notes are unaffected.
    DecodeError {
        path: String,
        message: String,
    },
}

impl BuildDiagnostic {
    pub fn broken_link(source: NoteId, reference: impl Into<String>) -> Self {
        Self::BrokenLink {
            source,
            reference: reference.into(),
        }
    }

    pub fn ambiguous_link(
        source: NoteId,
        reference: impl Into<String>,
        candidates: Vec<NoteId>,
    ) -> Self {
        Self::AmbiguousLink {
            source,
            reference: reference.into(),
            candidates,
        }
    }

    pub fn decode_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodeError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_broken_link(&self) -> bool {
        matches!(self, Self::BrokenLink { .. })
    }

    pub fn is_ambiguous_link(&self) -> bool {
        matches!(self, Self::AmbiguousLink { .. })
    }

    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }
}

impl std::fmt::Display for BuildDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BrokenLink { source, reference } => {
                write!(f, "Broken link in '{source}': [[{reference}]]")
            }
            Self::AmbiguousLink {
                source,
                reference,
                candidates,
            } => {
                let names: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
                write!(
                    f,
                    "Ambiguous link in '{source}': [[{reference}]] matches {}",
                    names.join(", ")
                )
            }
            Self::DecodeError { path, message } => {
                write!(f, "Skipped '{path}': {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_predicates() {
        let broken = BuildDiagnostic::broken_link(NoteId::from_canonical("x"), "missing");
        assert!(broken.is_broken_link());
        assert!(!broken.is_ambiguous_link());

        let ambiguous = BuildDiagnostic::ambiguous_link(
            NoteId::from_canonical("x"),
            "dup",
            vec![NoteId::from_canonical("a/dup"), NoteId::from_canonical("b/dup")],
        );
        assert!(ambiguous.is_ambiguous_link());

        let decode = BuildDiagnostic::decode_error("bad.md", "invalid utf-8");
        assert!(decode.is_decode_error());
    }

    #[test]
    fn test_display_names_all_candidates() {
        let diag = BuildDiagnostic::ambiguous_link(
            NoteId::from_canonical("x"),
            "dup",
            vec![NoteId::from_canonical("a/dup"), NoteId::from_canonical("b/dup")],
        );
        let rendered = diag.to_string();
        assert!(rendered.contains("a/dup"));
        assert!(rendered.contains("b/dup"));
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let diag = BuildDiagnostic::broken_link(NoteId::from_canonical("x"), "nope");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"kind\":\"BrokenLink\""));
    }
}
