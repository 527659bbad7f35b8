//! Static site assembly.
//!
//! Turns the built corpus into HTML pages: one page per note with the wiki
//! references spliced into presentation markup, an index page, an optional
//! tag index, and a sitemap when a base URL is configured. Every page embeds
//! the data its sidebar needs (neighborhood graph, search records, file
//! tree) as a JSON payload consumed by the bundled client script.
//!
//! All hrefs are relative, computed from the depth of the referencing page,
//! so the output tree can be served from any path prefix or opened straight
//! from the filesystem.

use include_dir::{include_dir, Dir};
use serde_json::json;
use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    codec::md::{escape_html, markdown_to_html},
    config::SiteConfig,
    export::GraphExport,
    graph::GraphBuild,
    ident::{as_anchor, split_fragment, NoteId},
    registry::{Note, NoteRegistry},
    resolve::Resolution,
    search::SearchDocument,
};

/// Client-side assets copied verbatim into `static/` in the output tree.
pub static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/src/assets");

/// Relative href from one note's page to another's.
pub fn relative_href(from: &NoteId, to: &NoteId) -> String {
    format!("{}{}.html", "../".repeat(from.depth()), to)
}

/// Prefix that climbs from a note's page back to the output root.
fn root_prefix(depth: usize) -> String {
    "../".repeat(depth)
}

/// Splice resolved reference markup into a note body.
///
/// Spans never overlap and arrive in source order, so this is a single
/// forward pass: bytes between references are copied untouched. Outcome
/// drives the markup - resolved and ambiguous occurrences become anchors
/// (ambiguous ones flagged for styling), broken ones become inert spans the
/// stylesheet strikes through.
pub fn splice_references(note: &Note, build: &GraphBuild) -> String {
    let Some(resolutions) = build.resolutions.get(&note.id) else {
        return note.raw_body.clone();
    };
    let body = &note.raw_body;
    let mut spliced = String::with_capacity(body.len());
    let mut cursor = 0;
    for resolved in resolutions {
        spliced.push_str(&body[cursor..resolved.reference.span.start]);
        let display = escape_html(resolved.reference.display());
        let (_, fragment) = split_fragment(&resolved.reference.target_text);
        let anchor = fragment.map(as_anchor).unwrap_or_default();
        match (&resolved.outcome, resolved.link_target()) {
            (Resolution::Resolved(_), Some(target)) => {
                spliced.push_str(&format!(
                    "<a href=\"{}{anchor}\" class=\"wiki-link\">{display}</a>",
                    relative_href(&note.id, target)
                ));
            }
            (Resolution::Ambiguous(candidates), Some(target)) => {
                let names: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
                spliced.push_str(&format!(
                    "<a href=\"{}{anchor}\" class=\"wiki-link ambiguous\" \
                     title=\"Ambiguous link, candidates: {}\">{display}</a>",
                    relative_href(&note.id, target),
                    escape_html(&names.join(", "))
                ));
            }
            _ => {
                spliced.push_str(&format!(
                    "<span class=\"wiki-link broken\" title=\"Note not found: {}\">{display}</span>",
                    escape_html(&resolved.reference.target_text)
                ));
            }
        }
        cursor = resolved.reference.span.end;
    }
    spliced.push_str(&body[cursor..]);
    spliced
}

/// Hierarchical file tree over the corpus source paths, alphabetical within
/// each directory. Urls are relative to the page embedding the tree.
fn file_tree_json(registry: &NoteRegistry, from_depth: usize) -> serde_json::Value {
    #[derive(Default)]
    struct TreeNode {
        children: BTreeMap<String, TreeNode>,
        note: Option<(NoteId, String)>,
    }

    let mut root = TreeNode::default();
    for note in registry.all() {
        let mut level = &mut root;
        let segments: Vec<&str> = note.rel_path.split('/').collect();
        for (idx, segment) in segments.iter().enumerate() {
            level = level.children.entry(segment.to_string()).or_default();
            if idx == segments.len() - 1 {
                level.note = Some((note.id.clone(), note.title.clone()));
            }
        }
    }

    fn to_value(node: &TreeNode, from_depth: usize) -> serde_json::Value {
        let mut entries = serde_json::Map::new();
        for (name, child) in &node.children {
            let value = if let Some((id, title)) = &child.note {
                json!({
                    "type": "file",
                    "note_id": id,
                    "title": title,
                    "url": format!("{}{}.html", root_prefix(from_depth), id),
                })
            } else {
                json!({
                    "type": "directory",
                    "children": to_value(child, from_depth),
                })
            };
            entries.insert(name.clone(), value);
        }
        serde_json::Value::Object(entries)
    }

    to_value(&root, from_depth)
}

/// Per-page sidebar payload: graph slice, search records, file tree, all
/// with hrefs relative to the embedding page.
fn page_payload(
    registry: &NoteRegistry,
    build: &GraphBuild,
    search_docs: &[SearchDocument],
    config: &SiteConfig,
    current: Option<&Note>,
) -> serde_json::Value {
    let from_depth = current.map(|n| n.id.depth()).unwrap_or(0);
    let prefix = root_prefix(from_depth);

    let graph_export = match current {
        Some(note) => {
            let subset = build.graph.neighborhood(&note.id, config.graph_depth);
            GraphExport::for_notes(registry, &build.graph, Some(&subset))
        }
        None => GraphExport::new(registry, &build.graph),
    };
    let nodes: Vec<serde_json::Value> = graph_export
        .nodes
        .iter()
        .map(|node| {
            json!({
                "id": node.id,
                "label": node.label,
                "url": format!("{prefix}{}.html", node.id),
            })
        })
        .collect();
    let edges: Vec<serde_json::Value> = graph_export
        .edges
        .iter()
        .map(|edge| json!({"source": edge.source, "target": edge.target, "weight": edge.weight}))
        .collect();

    let search: Vec<serde_json::Value> = search_docs
        .iter()
        .map(|doc| {
            json!({
                "id": doc.id,
                "title": doc.title,
                "content": doc.text,
                "url": format!("{prefix}{}.html", doc.id),
            })
        })
        .collect();

    json!({
        "currentId": current.map(|n| n.id.clone()),
        "graph": {"nodes": nodes, "edges": edges},
        "search": search,
        "fileTree": file_tree_json(registry, from_depth),
    })
}

fn sidebar_links_html(note: &Note, registry: &NoteRegistry, build: &GraphBuild) -> String {
    let mut outgoing: Vec<&NoteId> = Vec::new();
    for target in build.graph.outgoing(&note.id) {
        if !outgoing.contains(&target) {
            outgoing.push(target);
        }
    }
    let backlinks: Vec<&NoteId> = build.graph.backlinks(&note.id).collect();

    let item = |target: &NoteId| -> String {
        let title = registry
            .lookup_exact(target)
            .map(|n| n.title.as_str())
            .unwrap_or(target.as_str());
        format!(
            "        <li class=\"link-item\"><a href=\"{}\">{}</a></li>\n",
            relative_href(&note.id, target),
            escape_html(title)
        )
    };

    let mut html = String::new();
    html.push_str(&format!(
        "      <div class=\"links-section\">\n        <h3>Outgoing Links ({})</h3>\n        <ul class=\"link-list\">\n",
        outgoing.len()
    ));
    for target in &outgoing {
        html.push_str(&item(target));
    }
    html.push_str("        </ul>\n      </div>\n");
    html.push_str(&format!(
        "      <div class=\"links-section\">\n        <h3>Incoming Links ({})</h3>\n        <ul class=\"link-list\">\n",
        backlinks.len()
    ));
    for source in &backlinks {
        html.push_str(&item(source));
    }
    html.push_str("        </ul>\n      </div>\n");
    html
}

/// Shared page chrome. `content` is the main column, `links_html` the links
/// tab (empty for non-note pages).
fn page_chrome(
    title: &str,
    depth: usize,
    content: &str,
    links_html: &str,
    payload: &serde_json::Value,
    config: &SiteConfig,
) -> String {
    let prefix = root_prefix(depth);
    let theme = &config.theme;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - {site_title}</title>
<style>:root {{ --primary: {primary}; --background: {background}; --text: {text}; }}</style>
<link rel="stylesheet" href="{prefix}static/style.css">
<script src="https://cdnjs.cloudflare.com/ajax/libs/d3/7.8.5/d3.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"></script>
</head>
<body>
<div class="container">
  <aside class="sidebar">
    <nav class="sidebar-tabs">
      <div class="sidebar-tab active" data-tab="graph">Graph</div>
      <div class="sidebar-tab" data-tab="search">Search</div>
      <div class="sidebar-tab" data-tab="files">Files</div>
      <div class="sidebar-tab" data-tab="links">Links</div>
    </nav>
    <div class="sidebar-content">
      <div id="graph-tab" class="tab-content"><div id="graph"></div></div>
      <div id="search-tab" class="tab-content" style="display:none">
        <input type="text" class="search-box" id="search-input" placeholder="Search notes...">
        <ul class="search-results" id="search-results"></ul>
      </div>
      <div id="files-tab" class="tab-content" style="display:none"><div id="file-tree" class="file-tree"></div></div>
      <div id="links-tab" class="tab-content" style="display:none">
{links_html}      </div>
    </div>
  </aside>
  <main class="main-content">
    <div class="note-content">
{content}
    </div>
  </main>
</div>
<script>const LOAM = {payload};</script>
<script src="{prefix}static/app.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
        site_title = escape_html(&config.site_title),
        primary = theme.primary_color,
        background = theme.background,
        text = theme.text_color,
    )
}

fn render_note_page(
    note: &Note,
    registry: &NoteRegistry,
    build: &GraphBuild,
    search_docs: &[SearchDocument],
    config: &SiteConfig,
) -> String {
    let spliced = splice_references(note, build);
    let content = markdown_to_html(&spliced);
    let links = sidebar_links_html(note, registry, build);
    let payload = page_payload(registry, build, search_docs, config, Some(note));
    page_chrome(&note.title, note.id.depth(), &content, &links, &payload, config)
}

fn render_index_page(
    registry: &NoteRegistry,
    build: &GraphBuild,
    search_docs: &[SearchDocument],
    config: &SiteConfig,
) -> String {
    let mut content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<h2>All Notes</h2>\n<ul>\n",
        escape_html(&config.site_title),
        escape_html(&config.site_description)
    );
    for note in registry.all() {
        content.push_str(&format!(
            "  <li><a href=\"{}.html\">{}</a></li>\n",
            note.id,
            escape_html(&note.title)
        ));
    }
    content.push_str("</ul>\n");
    let payload = page_payload(registry, build, search_docs, config, None);
    page_chrome(&config.site_title, 0, &content, "", &payload, config)
}

fn render_tags_page(
    registry: &NoteRegistry,
    build: &GraphBuild,
    search_docs: &[SearchDocument],
    config: &SiteConfig,
) -> String {
    let mut by_tag: BTreeMap<&str, Vec<&Note>> = BTreeMap::new();
    for note in registry.all() {
        for tag in &note.tags {
            by_tag.entry(tag.as_str()).or_default().push(note);
        }
    }

    let mut content = String::from("<h1>Tags</h1>\n");
    if by_tag.is_empty() {
        content.push_str("<p><em>No tagged notes yet.</em></p>\n");
    }
    for (tag, notes) in &by_tag {
        content.push_str(&format!(
            "<h2 id=\"{}\">{} ({})</h2>\n<ul>\n",
            crate::ident::to_anchor(tag),
            escape_html(tag),
            notes.len()
        ));
        for note in notes {
            content.push_str(&format!(
                "  <li><a href=\"{}.html\">{}</a></li>\n",
                note.id,
                escape_html(&note.title)
            ));
        }
        content.push_str("</ul>\n");
    }
    let payload = page_payload(registry, build, search_docs, config, None);
    page_chrome("Tags", 0, &content, "", &payload, config)
}

/// XML sitemap over every generated page. Only emitted when `base_url` is
/// configured; contains no timestamps so repeated builds stay byte-identical.
pub fn sitemap(registry: &NoteRegistry, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    xml.push_str(&format!(
        "  <url>\n    <loc>{base}/index.html</loc>\n    <changefreq>weekly</changefreq>\n  </url>\n"
    ));
    for note in registry.all() {
        xml.push_str(&format!(
            "  <url>\n    <loc>{base}/{}.html</loc>\n    <changefreq>weekly</changefreq>\n  </url>\n",
            note.id
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render every page of the site. Returns (output-relative path, content)
/// pairs in deterministic order; the compiler owns writing them to disk.
pub fn render_site(
    registry: &NoteRegistry,
    build: &GraphBuild,
    search_docs: &[SearchDocument],
    config: &SiteConfig,
) -> Vec<(PathBuf, String)> {
    let mut pages: Vec<(PathBuf, String)> = Vec::new();
    for note in registry.all() {
        pages.push((
            PathBuf::from(format!("{}.html", note.id)),
            render_note_page(note, registry, build, search_docs, config),
        ));
    }
    // A root note named "index" is the landing page; only generate the
    // listing page when the corpus doesn't provide one.
    if registry
        .lookup_exact(&NoteId::from_canonical("index"))
        .is_none()
    {
        pages.push((
            PathBuf::from("index.html"),
            render_index_page(registry, build, search_docs, config),
        ));
    }
    if config.enable_tags {
        pages.push((
            PathBuf::from("tags.html"),
            render_tags_page(registry, build, search_docs, config),
        ));
    }
    if let Some(base_url) = &config.base_url {
        pages.push((PathBuf::from("sitemap.xml"), sitemap(registry, base_url)));
    }
    pages
}
