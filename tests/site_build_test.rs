//! Whole-site builds through [`SiteCompiler`]: pages, exports, assets,
//! config discovery.

mod common;

use std::fs;
use tempfile::tempdir;
use test_log::test;

use common::{create_test_garden, write_note};
use loam_core::compiler::{SiteCompiler, GRAPH_EXPORT_NAME, SEARCH_EXPORT_NAME};

#[test]
fn test_build_emits_page_per_note_plus_index() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let out = temp_dir.path().join("_site");

    let report = SiteCompiler::new(garden.as_path(), out.as_path())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(report.notes, 4);
    assert_eq!(report.broken_links, 1);
    assert_eq!(report.ambiguous_links, 1);
    for page in [
        "index.html",
        "tools/foam.html",
        "a/dup.html",
        "b/dup.html",
        "tags.html",
    ] {
        assert!(out.join(page).exists(), "missing {page}");
    }
    assert!(out.join("static/style.css").exists());
    assert!(out.join("static/app.js").exists());
}

#[test]
fn test_note_page_markup() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let out = temp_dir.path().join("_site");
    SiteCompiler::new(garden.as_path(), out.as_path())
        .unwrap()
        .build()
        .unwrap();

    let index_page = fs::read_to_string(out.join("index.html")).unwrap();
    // Resolved reference links to the target page.
    assert!(index_page.contains("<a href=\"tools/foam.html\" class=\"wiki-link\">tools/foam</a>"));
    // Ambiguous reference links to the load-order winner and is flagged.
    assert!(index_page.contains("wiki-link ambiguous"));
    assert!(index_page.contains("a/dup.html"));
    // Broken reference renders as styled text, not a link.
    assert!(index_page.contains("wiki-link broken"));
    assert!(index_page.contains("Note not found: nonexistent"));

    // Nested pages climb back up for their hrefs.
    let foam_page = fs::read_to_string(out.join("tools/foam.html")).unwrap();
    assert!(foam_page.contains("<a href=\"../index.html\" class=\"wiki-link\">index</a>"));
    assert!(foam_page.contains("../static/style.css"));
    // The self-link shows up as an incoming link too.
    assert!(foam_page.contains("Incoming Links (2)"));
}

#[test]
fn test_exports_parse_and_match_report() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let out = temp_dir.path().join("_site");
    let report = SiteCompiler::new(garden.as_path(), out.as_path())
        .unwrap()
        .build()
        .unwrap();

    let graph: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(GRAPH_EXPORT_NAME)).unwrap()).unwrap();
    assert_eq!(graph["nodes"].as_array().unwrap().len(), report.notes);
    for edge in graph["edges"].as_array().unwrap() {
        assert!(edge["source"].is_string());
        assert!(edge["target"].is_string());
        assert!(edge["weight"].as_u64().unwrap() >= 1);
    }

    let search: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(SEARCH_EXPORT_NAME)).unwrap()).unwrap();
    let notes = search["notes"].as_array().unwrap();
    assert_eq!(notes.len(), report.notes);
    assert!(notes.iter().all(|n| n["id"].is_string()
        && n["title"].is_string()
        && n["text"].is_string()
        && n["terms"].is_array()));
}

#[test]
fn test_config_discovery_and_sitemap() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    write_note(
        &garden,
        "loam.toml",
        r#"
site_title = "Test Garden"
base_url = "https://garden.example.org"
enable_tags = false
"#,
    );
    let out = temp_dir.path().join("_site");
    SiteCompiler::new(garden.as_path(), out.as_path())
        .unwrap()
        .build()
        .unwrap();

    let index_page = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index_page.contains("Test Garden"));

    // Tags disabled: no tag page.
    assert!(!out.join("tags.html").exists());

    let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://garden.example.org/tools/foam.html</loc>"));
    assert!(sitemap.contains("<loc>https://garden.example.org/index.html</loc>"));
}

#[test]
fn test_rebuild_into_fresh_dir_is_byte_identical() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    let out_a = temp_dir.path().join("site_a");
    let out_b = temp_dir.path().join("site_b");

    SiteCompiler::new(garden.as_path(), out_a.as_path())
        .unwrap()
        .build()
        .unwrap();
    SiteCompiler::new(garden.as_path(), out_b.as_path())
        .unwrap()
        .build()
        .unwrap();

    for name in [GRAPH_EXPORT_NAME, SEARCH_EXPORT_NAME, "index.html", "tools/foam.html"] {
        assert_eq!(
            fs::read(out_a.join(name)).unwrap(),
            fs::read(out_b.join(name)).unwrap(),
            "{name} differs between identical builds"
        );
    }
}

#[test]
fn test_decode_failure_excludes_note_but_build_succeeds() {
    let temp_dir = tempdir().unwrap();
    let garden = create_test_garden(&temp_dir);
    fs::write(garden.join("binary.md"), [0xff, 0xd8, 0xff, 0x00]).unwrap();
    let out = temp_dir.path().join("_site");

    let report = SiteCompiler::new(garden.as_path(), out.as_path())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(report.notes, 4);
    assert_eq!(report.skipped_files, 1);
    assert!(!out.join("binary.html").exists());
}
