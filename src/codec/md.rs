//! Markdown rendering and text flattening.
//!
//! Bodies arrive here with wiki references already spliced into presentation
//! markup (see [`crate::html`]), so this module only has to drive
//! pulldown-cmark: explicit extension options for reproducibility, heading
//! anchors injected so `[[note#heading]]` fragments land somewhere, and
//! fenced `mermaid` blocks passed through as `<div class="mermaid">` for the
//! client-side diagram renderer.

use pulldown_cmark::{
    html::push_html, CodeBlockKind, Event as MdEvent, HeadingLevel, Options, Parser as MdParser,
    Tag as MdTag, TagEnd as MdTagEnd,
};

use crate::ident::to_anchor;

pub use pulldown_cmark;

pub fn loam_md_options() -> Options {
    let mut md_options = Options::empty();
    // A deliberate subset, enabled explicitly for better reproduceability.
    // Wikilink parsing stays off: reference splicing happens on the raw body
    // before markdown conversion, driven by extractor spans.
    md_options.insert(Options::ENABLE_FOOTNOTES);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_TASKLISTS);
    md_options
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Concatenate the visible text of a run of inline events.
fn events_text(events: &[MdEvent<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            MdEvent::Text(t) | MdEvent::Code(t) => text.push_str(t),
            MdEvent::SoftBreak | MdEvent::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Convert a markdown body to HTML.
///
/// The event stream is rewritten before rendering: headings become raw HTML
/// carrying an `id` anchor derived from their text, and `mermaid` fenced
/// blocks are emitted as diagram containers instead of `<pre>` blocks.
pub fn markdown_to_html(md: &str) -> String {
    let events: Vec<MdEvent<'_>> = MdParser::new_ext(md, loam_md_options()).collect();
    let mut rewritten: Vec<MdEvent<'_>> = Vec::with_capacity(events.len());

    let mut idx = 0;
    while idx < events.len() {
        match &events[idx] {
            MdEvent::Start(MdTag::Heading { level, .. }) => {
                let tag = heading_tag(*level);
                let close = events[idx + 1..]
                    .iter()
                    .position(|e| matches!(e, MdEvent::End(MdTagEnd::Heading(_))))
                    .map(|rel| idx + 1 + rel)
                    .unwrap_or(events.len());
                let anchor = to_anchor(&events_text(&events[idx + 1..close]));
                rewritten.push(MdEvent::Html(format!("<{tag} id=\"{anchor}\">").into()));
                rewritten.extend(events[idx + 1..close].iter().cloned());
                rewritten.push(MdEvent::Html(format!("</{tag}>\n").into()));
                idx = close + 1;
            }
            MdEvent::Start(MdTag::CodeBlock(CodeBlockKind::Fenced(lang)))
                if lang.as_ref() == "mermaid" =>
            {
                let close = events[idx + 1..]
                    .iter()
                    .position(|e| matches!(e, MdEvent::End(MdTagEnd::CodeBlock)))
                    .map(|rel| idx + 1 + rel)
                    .unwrap_or(events.len());
                let code = events_text(&events[idx + 1..close]);
                rewritten.push(MdEvent::Html(
                    format!(
                        "<div class=\"mermaid\">\n{}\n</div>\n",
                        escape_html(code.trim_end())
                    )
                    .into(),
                ));
                idx = close + 1;
            }
            event => {
                rewritten.push(event.clone());
                idx += 1;
            }
        }
    }

    let mut html = String::with_capacity(md.len() * 2);
    push_html(&mut html, rewritten.into_iter());
    html
}

/// Flatten a markdown body to plain searchable text: markup dropped, text
/// and code content kept, whitespace collapsed.
pub fn plain_text(md: &str) -> String {
    let mut text = String::with_capacity(md.len());
    for event in MdParser::new_ext(md, loam_md_options()) {
        match event {
            MdEvent::Text(t) | MdEvent::Code(t) => text.push_str(&t),
            MdEvent::SoftBreak | MdEvent::HardBreak => text.push(' '),
            MdEvent::End(_) => text.push(' '),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First heading of any level, used as a title fallback when front matter
/// carries none.
pub fn first_heading(md: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();
    for event in MdParser::new_ext(md, loam_md_options()) {
        match event {
            MdEvent::Start(MdTag::Heading { .. }) => in_heading = true,
            MdEvent::End(MdTagEnd::Heading(_)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
                in_heading = false;
                text.clear();
            }
            MdEvent::Text(t) | MdEvent::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }
    None
}
