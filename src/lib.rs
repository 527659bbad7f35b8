//! # loam-core
//!
//! A Rust library for turning a directory tree of interlinked markdown
//! notes into a browsable static website.
//!
//! The name "loam" is the soil a garden grows in - this is a generator for
//! digital note gardens.
//!
//! ## Overview
//!
//! loam-core parses wiki-style `[[...]]` cross-references out of note
//! bodies, resolves them against the corpus (exact id first, then
//! path-suffix matching with deterministic ambiguity handling), builds a
//! bidirectional link graph, and emits per-note HTML pages plus two
//! serialized artifacts for the client-side renderer: a relationship graph
//! export and a full-text search index.
//!
//! ### Key properties
//!
//! - **Two-phase builds**: the note registry is fully loaded and frozen
//!   before any reference resolves, so resolution never depends on
//!   discovery interleaving
//! - **Graph symmetry**: backlinks are derived from the edge list in the
//!   same pass; an edge (a, b) exists iff `a` appears in b's backlinks
//! - **Deterministic output**: identical corpora serialize to byte-identical
//!   exports - ordering is registry load order throughout, never resorted
//! - **Error tolerance**: broken links, ambiguous links, and undecodable
//!   files degrade to diagnostics; only a canonical-id collision fails a
//!   build
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loam_core::compiler::SiteCompiler;
//!
//! fn main() -> Result<(), loam_core::LoamError> {
//!     let compiler = SiteCompiler::new("./notes", "./_site")?;
//!     let report = compiler.build()?;
//!     for diagnostic in &report.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!     println!("{} notes, {} links", report.notes, report.edges);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Guide
//!
//! Pipeline order, leaves first:
//!
//! - [`ident`]: canonical note identifiers
//! - [`codec`]: reference extraction and markdown conversion
//! - [`registry`] + [`loader`]: the note corpus and how it gets populated
//! - [`resolve`]: reference-to-note resolution outcomes
//! - [`graph`]: the directed link graph and derived backlink index
//! - [`search`]: search index construction (independent of [`graph`])
//! - [`export`]: serialized graph and search artifacts
//! - [`html`] + [`compiler`]: page assembly and build orchestration
//!
//! Start with [`compiler::SiteCompiler`] for whole-site builds, or drive
//! [`loader::load_corpus`] / [`graph::build`] / [`search::build_index`]
//! directly for library use.

pub mod codec;
pub mod compiler;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod export;
pub mod graph;
pub mod html;
pub mod ident;
pub mod loader;
pub mod registry;
pub mod resolve;
pub mod search;

pub use error::*;
