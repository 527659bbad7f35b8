//! Build orchestration.
//!
//! [`SiteCompiler`] drives the whole pipeline for one corpus: load every
//! note, build the link graph and search index from the frozen registry,
//! then write exports and HTML to the output directory.
//!
//! The phases are strictly ordered - load-all before resolve-any - because
//! references can only resolve against notes known by build time. Within the
//! resolve phase the graph pass and the search pass are independent: neither
//! reads the other's output, and both treat the registry as shared
//! read-only state.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::SiteConfig,
    diagnostic::BuildDiagnostic,
    error::LoamError,
    export::{GraphExport, SearchExport},
    graph,
    html::{self, ASSETS},
    loader::load_corpus,
    search,
};

/// Output filename of the graph export.
pub const GRAPH_EXPORT_NAME: &str = "graph.json";
/// Output filename of the search index export.
pub const SEARCH_EXPORT_NAME: &str = "search-index.json";

/// Summary of one build, for the CLI/report layer.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub notes: usize,
    pub edges: usize,
    pub pages_written: usize,
    pub broken_links: usize,
    pub ambiguous_links: usize,
    pub skipped_files: usize,
    pub diagnostics: Vec<BuildDiagnostic>,
}

pub struct SiteCompiler {
    input_dir: PathBuf,
    output_dir: PathBuf,
    config: SiteConfig,
}

impl SiteCompiler {
    /// Create a compiler for `input_dir`, discovering `loam.toml` there.
    pub fn new<P: AsRef<Path>>(input_dir: P, output_dir: P) -> Result<SiteCompiler, LoamError> {
        let config = SiteConfig::discover(input_dir.as_ref())?;
        Ok(Self::with_config(input_dir, output_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(
        input_dir: P,
        output_dir: P,
        config: SiteConfig,
    ) -> SiteCompiler {
        SiteCompiler {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_output(&self, rel: &Path, content: &[u8]) -> Result<(), LoamError> {
        let path = self.output_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(())
    }

    /// Run the full pipeline. Returns the report on success; the only hard
    /// failure besides I/O on the output tree is a duplicate note id, which
    /// aborts before any resolution work.
    pub fn build(&self) -> Result<BuildReport, LoamError> {
        tracing::info!(
            "building site: {:?} -> {:?}",
            self.input_dir,
            self.output_dir
        );

        // Phase 1: load-all. The registry is frozen from here on.
        let corpus = load_corpus(&self.input_dir)?;
        let registry = corpus.registry;
        let mut diagnostics = corpus.diagnostics;
        let skipped_files = diagnostics.len();

        // Phase 2: resolve-all. Graph and search are independent passes over
        // the same read-only registry.
        let build = graph::build(&registry);
        let search_docs = search::build_index(&registry, self.config.search_preview_length);

        // Phase 3: exports, stable bytes for identical corpora.
        let graph_export = GraphExport::new(&registry, &build.graph);
        self.write_output(
            Path::new(GRAPH_EXPORT_NAME),
            graph_export.to_json()?.as_bytes(),
        )?;
        let search_export = SearchExport::new(search_docs.clone());
        self.write_output(
            Path::new(SEARCH_EXPORT_NAME),
            search_export.to_json()?.as_bytes(),
        )?;

        // Phase 4: HTML pages and client assets.
        let pages = html::render_site(&registry, &build, &search_docs, &self.config);
        let pages_written = pages.len();
        for (rel, content) in &pages {
            self.write_output(rel, content.as_bytes())?;
        }
        for file in ASSETS.files() {
            self.write_output(&Path::new("static").join(file.path()), file.contents())?;
        }

        let edges = build.graph.edge_count();
        diagnostics.extend(build.diagnostics);
        let report = BuildReport {
            notes: registry.len(),
            edges,
            pages_written,
            broken_links: diagnostics.iter().filter(|d| d.is_broken_link()).count(),
            ambiguous_links: diagnostics.iter().filter(|d| d.is_ambiguous_link()).count(),
            skipped_files,
            diagnostics,
        };
        tracing::info!(
            "build complete: {} notes, {} edges, {} pages",
            report.notes,
            report.edges,
            report.pages_written
        );
        Ok(report)
    }
}
