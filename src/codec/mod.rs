//! Note body parsing.
//!
//! Two concerns live here, kept separate on purpose:
//!
//! - [`wiki`] - extraction of `[[...]]` cross-references with byte spans,
//!   the input to link resolution and markup splicing
//! - [`md`] - markdown-to-HTML conversion and plain-text flattening via
//!   pulldown-cmark
//!
//! Extraction never consults the registry: it produces [`wiki::RawReference`]
//! values that [`crate::resolve`] turns into outcomes once the corpus is
//! fully loaded.

pub mod md;
pub mod wiki;

pub use md::{first_heading, loam_md_options, markdown_to_html, plain_text};
pub use wiki::{extract, RawReference};
