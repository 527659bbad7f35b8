//! Corpus loading.
//!
//! Walks the input tree, decodes note files, splits front matter, and
//! populates the [`NoteRegistry`]. The walk order is sorted by path
//! components, so load order - and everything downstream that ties breaks
//! on it - is deterministic for a given tree.
//!
//! Failure isolation: an unreadable or non-UTF-8 file excludes that one
//! note and records a warning-level diagnostic; only a canonical-id
//! collision aborts the load (and it aborts before any resolution work
//! starts).

use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

use crate::{
    codec::md::first_heading,
    diagnostic::BuildDiagnostic,
    error::LoamError,
    ident::{os_path_to_string, NoteId, MARKDOWN_EXTENSIONS},
    registry::{Note, NoteRegistry},
};

/// Front-matter fields the loader extracts. Anything else in the header
/// block is ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub date: Option<String>,
}

/// A fully loaded corpus plus the per-note problems encountered on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub registry: NoteRegistry,
    pub diagnostics: Vec<BuildDiagnostic>,
}

fn yaml_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Split a `---` fenced YAML header block off a note body.
///
/// Returns the parsed header (when present and parseable) and the remaining
/// body. A malformed header is demoted to body text with a warning; authors
/// get their content rendered either way.
pub fn split_front_matter(content: &str) -> (Option<FrontMatter>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
        return (None, content);
    }

    // Find the closing delimiter line.
    let mut search_from = 0;
    let (yaml_src, body) = loop {
        let Some(idx) = rest[search_from..].find("\n---") else {
            return (None, content);
        };
        let delim_start = search_from + idx;
        let after = &rest[delim_start + 4..];
        if after.is_empty() {
            break (&rest[..delim_start], "");
        } else if let Some(body) = after.strip_prefix('\n') {
            break (&rest[..delim_start], body);
        } else if let Some(body) = after.strip_prefix("\r\n") {
            break (&rest[..delim_start], body);
        }
        search_from = delim_start + 4;
    };

    match serde_yaml::from_str::<serde_yaml::Value>(yaml_src) {
        Ok(value) => {
            let title = value.get("title").and_then(yaml_string);
            let date = value.get("date").and_then(yaml_string);
            let tags = match value.get("tags") {
                Some(serde_yaml::Value::String(tag)) => vec![tag.clone()],
                Some(serde_yaml::Value::Sequence(seq)) => {
                    seq.iter().filter_map(yaml_string).collect()
                }
                _ => vec![],
            };
            (Some(FrontMatter { title, tags, date }), body)
        }
        Err(err) => {
            tracing::warn!("Unparseable front matter block treated as content: {err}");
            (None, content)
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MARKDOWN_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}

/// Enumerate note files under `root` in deterministic component order,
/// skipping hidden files and directories.
pub fn note_files(root: &Path) -> Vec<PathBuf> {
    let mut sorted_files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) || e.path() == root)
        .filter_map(|e| e.ok().map(|e| e.into_path()))
        .filter(|p| p.is_file() && is_markdown(p))
        .collect::<Vec<PathBuf>>();
    sorted_files.sort_by(|a, b| a.components().cmp(b.components()));
    sorted_files.dedup();
    sorted_files
}

/// Load every note under `root` into a fresh registry.
pub fn load_corpus(root: &Path) -> Result<LoadedCorpus, LoamError> {
    if !root.is_dir() {
        return Err(LoamError::NotFound(format!(
            "corpus root {:?} is not a directory",
            root
        )));
    }

    let mut corpus = LoadedCorpus::default();
    for path in note_files(root) {
        let rel = path.strip_prefix(root)?;
        let rel_str = os_path_to_string(rel);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("Skipping unreadable note {:?}: {err}", path);
                corpus
                    .diagnostics
                    .push(BuildDiagnostic::decode_error(&rel_str, err.to_string()));
                continue;
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Skipping non-UTF-8 note {:?}: {err}", path);
                corpus
                    .diagnostics
                    .push(BuildDiagnostic::decode_error(&rel_str, err.to_string()));
                continue;
            }
        };

        let id = NoteId::normalize(&rel_str);
        let (front_matter, body) = split_front_matter(&content);
        let front_matter = front_matter.unwrap_or_default();
        let title = front_matter
            .title
            .or_else(|| first_heading(body))
            .unwrap_or_else(|| id.to_string());

        corpus.registry.register(Note {
            id,
            title,
            raw_body: body.to_string(),
            tags: front_matter.tags,
            date: front_matter.date,
            rel_path: rel_str,
        })?;
    }

    tracing::info!(
        "loaded {} notes ({} skipped)",
        corpus.registry.len(),
        corpus.diagnostics.len()
    );
    Ok(corpus)
}
