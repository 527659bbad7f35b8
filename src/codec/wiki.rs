//! Wiki-style reference extraction.
//!
//! Scans note bodies for `[[target]]` / `[[target|display]]` occurrences and
//! yields them with byte spans so downstream renderers can splice resolved
//! markup back into the body without disturbing surrounding text.
//!
//! The grammar is deliberately permissive: references never nest, the first
//! `]]` after an opening `[[` terminates the reference, and an opening `[[`
//! with no terminator before end-of-input or before another `[[` is treated
//! as literal text and skipped. Malformed markup is an authoring reality,
//! not an error.

use std::ops::Range;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// A single `[[...]]` occurrence found in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// The portion before any `|` separator, trimmed. Never empty.
    pub target_text: String,
    /// Optional display override, the portion after the first unescaped `|`.
    pub display_text: Option<String>,
    /// Byte range of the full occurrence in the source body, delimiters
    /// included.
    pub span: Range<usize>,
}

impl RawReference {
    /// Text the reader sees: the display override when present, otherwise
    /// the target text itself.
    pub fn display(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.target_text)
    }
}

/// Lazily iterate the references in `body`. Single pass, O(len); restartable
/// by calling again.
pub fn extract(body: &str) -> WikiRefIter<'_> {
    WikiRefIter { body, pos: 0 }
}

/// Split reference innards at the first unescaped `|`. `\|` escapes the
/// separator and is unescaped in the output.
fn split_display(inner: &str) -> (String, Option<String>) {
    let bytes = inner.as_bytes();
    let mut sep = None;
    for (idx, b) in bytes.iter().enumerate() {
        if *b == b'|' && (idx == 0 || bytes[idx - 1] != b'\\') {
            sep = Some(idx);
            break;
        }
    }
    let unescape = |s: &str| s.trim().replace("\\|", "|");
    match sep {
        Some(idx) => {
            let display = unescape(&inner[idx + 1..]);
            (
                unescape(&inner[..idx]),
                if display.is_empty() { None } else { Some(display) },
            )
        }
        None => (unescape(inner), None),
    }
}

pub struct WikiRefIter<'a> {
    body: &'a str,
    pos: usize,
}

impl Iterator for WikiRefIter<'_> {
    type Item = RawReference;

    fn next(&mut self) -> Option<RawReference> {
        while self.pos < self.body.len() {
            let open_rel = self.body[self.pos..].find(OPEN)?;
            let open = self.pos + open_rel;
            let inner_start = open + OPEN.len();

            let rest = &self.body[inner_start..];
            let close = rest.find(CLOSE);
            let reopen = rest.find(OPEN);

            match (close, reopen) {
                // No terminator at all: literal text to end of input.
                (None, None) => {
                    self.pos = self.body.len();
                    return None;
                }
                // Another `[[` opens before this one closes: abandon the
                // current opener and rescan from the new one.
                (None, Some(r)) => {
                    self.pos = inner_start + r;
                    continue;
                }
                (Some(c), Some(r)) if r < c => {
                    self.pos = inner_start + r;
                    continue;
                }
                (Some(c), _) => {
                    let inner = &rest[..c];
                    self.pos = inner_start + c + CLOSE.len();
                    let (target_text, display_text) = split_display(inner);
                    if target_text.is_empty() {
                        // `[[]]` and `[[|x]]` have nothing to resolve.
                        continue;
                    }
                    return Some(RawReference {
                        target_text,
                        display_text,
                        span: open..self.pos,
                    });
                }
            }
        }
        None
    }
}
