//! Canonical note identifiers.
//!
//! Every note is keyed by a [`NoteId`] derived from its path relative to the
//! corpus root: markdown extension stripped, separators normalized to `/`,
//! Unicode normalized to NFC. The same normalization applies to reference
//! targets so that `[[tools/foam.md]]`, `[[tools\foam]]` and `[[tools/foam]]`
//! all name the same note. Case is preserved; id matching is case-sensitive.

use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt::{Display, Formatter},
    path::{Component, Path},
};
use unicode_normalization::UnicodeNormalization;

/// File extensions recognized as markdown source.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Utility function to replace separators and convert to unicode (via
/// to_string_lossy) on an os path.
pub fn os_path_to_string<P: AsRef<Path>>(os_path_ref: P) -> String {
    os_path_ref
        .as_ref()
        .components()
        .map(|c| match c {
            Component::RootDir => Cow::from("".to_string()),
            _ => c.as_os_str().to_string_lossy(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Split an optional `#fragment` off a reference target. Fragments address
/// headings within a note and never participate in note resolution.
pub fn split_fragment(raw: &str) -> (&str, Option<&str>) {
    match raw.find('#') {
        Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
        None => (raw, None),
    }
}

/// Turn a title string into a regularized anchor string
pub fn to_anchor(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

pub fn as_anchor(anchor: &str) -> String {
    let anchorized = to_anchor(anchor);
    if !anchorized.is_empty() {
        format!("#{anchorized}")
    } else {
        "".to_string()
    }
}

/// Canonical identifier of a note, unique per corpus.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Normalize a raw reference string or corpus-relative path string into a
    /// canonical id. Pure and total: input without an extension passes
    /// through modulo separator and Unicode normalization.
    pub fn normalize(raw: &str) -> NoteId {
        let mut id: String = raw.trim().nfc().collect();
        if id.contains('\\') {
            id = id.replace('\\', "/");
        }
        while let Some(stripped) = id.strip_prefix("./") {
            id = stripped.to_string();
        }
        if let Some(dot) = id.rfind('.') {
            // Only strip a markdown extension, and only when it trails the
            // final path segment (a dot inside a directory name is content).
            let ext = &id[dot + 1..];
            if !ext.contains('/') && MARKDOWN_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m))
            {
                id.truncate(dot);
            }
        }
        NoteId(id)
    }

    /// Wrap a string already known to be canonical (registry internals,
    /// tests). Prefer [`NoteId::normalize`] everywhere else.
    pub fn from_canonical(id: impl Into<String>) -> NoteId {
        NoteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Final path segment, the bare note name authors most often reference.
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Number of directory levels above the note. `"x"` is depth 0,
    /// `"a/b/x"` is depth 2. Drives relative href computation.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Whether `suffix` matches this id as a path-segment-aligned suffix:
    /// `"foo/bar"` matches `"x/foo/bar"` but not `"x/zfoo/bar"`.
    pub fn has_segment_suffix(&self, suffix: &str) -> bool {
        if suffix.is_empty() {
            return false;
        }
        self.0 == suffix
            || self
                .0
                .strip_suffix(suffix)
                .map(|head| head.ends_with('/'))
                .unwrap_or(false)
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_markdown_extension() {
        assert_eq!(NoteId::normalize("tools/foam.md").as_str(), "tools/foam");
        assert_eq!(NoteId::normalize("notes.markdown").as_str(), "notes");
        assert_eq!(NoteId::normalize("Foam.MD").as_str(), "Foam");
    }

    #[test]
    fn test_normalize_preserves_non_markdown_dots() {
        assert_eq!(NoteId::normalize("archive.v2/plan").as_str(), "archive.v2/plan");
        assert_eq!(NoteId::normalize("release-1.0").as_str(), "release-1.0");
    }

    #[test]
    fn test_normalize_separators_and_prefix() {
        assert_eq!(NoteId::normalize("a\\b\\c.md").as_str(), "a/b/c");
        assert_eq!(NoteId::normalize("./a/b").as_str(), "a/b");
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(NoteId::normalize("Projects/Foam").as_str(), "Projects/Foam");
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(NoteId::normalize("").as_str(), "");
        assert_eq!(NoteId::normalize("no-extension").as_str(), "no-extension");
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("note#Heading"), ("note", Some("Heading")));
        assert_eq!(split_fragment("note"), ("note", None));
        assert_eq!(split_fragment("#only"), ("", Some("only")));
    }

    #[test]
    fn test_segment_suffix_alignment() {
        let id = NoteId::from_canonical("x/foo/bar");
        assert!(id.has_segment_suffix("foo/bar"));
        assert!(id.has_segment_suffix("bar"));
        assert!(id.has_segment_suffix("x/foo/bar"));
        assert!(!id.has_segment_suffix("o/bar"));
        assert!(!NoteId::from_canonical("x/zfoo/bar").has_segment_suffix("foo/bar"));
        assert!(!id.has_segment_suffix(""));
    }

    #[test]
    fn test_basename_and_depth() {
        let id = NoteId::from_canonical("a/b/x");
        assert_eq!(id.basename(), "x");
        assert_eq!(id.depth(), 2);
        assert_eq!(NoteId::from_canonical("x").depth(), 0);
    }

    #[test]
    fn test_to_anchor() {
        assert_eq!(to_anchor("My Section Title"), "my-section-title");
        assert_eq!(to_anchor("  Design / Notes  "), "design--notes");
        assert_eq!(as_anchor("My Section"), "#my-section");
        assert_eq!(as_anchor("  "), "");
    }
}
