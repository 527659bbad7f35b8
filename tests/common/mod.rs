//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times - subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Write a note file under `root`, creating parent directories as needed.
#[allow(dead_code)]
pub fn write_note(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Create a small garden corpus exercising the interesting link shapes:
/// nested paths, bare-name references, an ambiguous pair, a broken link,
/// and a self-link.
///
/// Returns the path to the corpus directory (`<temp_dir>/garden/`).
#[allow(dead_code)]
pub fn create_test_garden(temp_dir: &TempDir) -> PathBuf {
    let garden = temp_dir.path().join("garden");
    std::fs::create_dir(&garden).unwrap();

    write_note(
        &garden,
        "index.md",
        r#"---
title: Garden Home
tags:
  - meta
---

# Garden Home

Start at [[tools/foam]] or read about [[dup]]. A dead end: [[nonexistent]].
"#,
    );
    write_note(
        &garden,
        "tools/foam.md",
        "# Foam\n\nBack home: [[index]]. Self: [[tools/foam]].\n",
    );
    write_note(&garden, "a/dup.md", "# Dup A\n");
    write_note(&garden, "b/dup.md", "# Dup B\n\nSibling: [[a/dup]].\n");

    garden
}
