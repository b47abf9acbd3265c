// Tests for rendered artifacts

use campusgraph_core::crawl::LocationFailure;
use campusgraph_core::map::CampusMap;
use campusgraph_core::report::{
    ExportFormat, generate_html_report, generate_json_report, generate_text_report, render,
    save_report,
};
use campusgraph_scanner::ItemRecord;
use std::fs;
use tempfile::tempdir;
use url::Url;

fn record(identifier: &str, title: &str) -> ItemRecord {
    ItemRecord {
        identifier: identifier.to_string(),
        title: title.to_string(),
        author: "Prof. Müller".to_string(),
        url: None,
    }
}

fn sample_map() -> CampusMap {
    CampusMap::build([
        (
            "Berlin",
            vec![
                record("123.45", "Einführung in die Informatik"),
                record("31021", "Investition und Finanzierung"),
            ],
        ),
        ("Hamburg", vec![record("123.45", "Einführung in die Informatik")]),
        ("Coesfeld", Vec::new()),
    ])
}

fn sample_failures() -> Vec<LocationFailure> {
    vec![LocationFailure {
        name: "Kaputt".to_string(),
        url: Url::parse("https://example.com/kaputt").unwrap(),
        error: "https://example.com/kaputt answered with status 500".to_string(),
    }]
}

// ============================================================================
// Format parsing
// ============================================================================

#[test]
fn test_format_from_str() {
    assert_eq!(ExportFormat::from_str("HTML"), Some(ExportFormat::Html));
    assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::from_str("txt"), Some(ExportFormat::Text));
    assert_eq!(ExportFormat::from_str("pdf"), None);
}

#[test]
fn test_default_file_names() {
    assert_eq!(
        ExportFormat::Html.default_file_name(),
        Some("mentoring_graph.html")
    );
    assert_eq!(ExportFormat::Text.default_file_name(), None);
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn test_html_contains_every_node_and_edge() {
    let html = generate_html_report(&sample_map()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("vis-network"));
    assert!(html.contains(r#""label":"Berlin""#));
    assert!(html.contains(r#""label":"123.45""#));
    assert!(html.contains(r#""title":"Standort: Coesfeld""#));
    assert!(html.contains(r#""title":"Modul: Einführung in die Informatik\nModul-Nr: 123.45""#));
    assert!(html.contains("#ADD8E6"));
    assert!(html.contains("#90EE90"));
    assert!(html.contains(r#""solver":"forceAtlas2Based""#));
    assert_eq!(html.matches(r#""from":"#).count(), 3);
    assert!(html.contains("Mentoriate: 3 Standorte, 2 Module"));
}

#[test]
fn test_html_escapes_script_breakouts() {
    let map = CampusMap::build([(
        "</script><script>alert(1)",
        vec![record("1", "Sicherheit & Kryptographie")],
    )]);

    let html = generate_html_report(&map).unwrap();

    assert!(!html.contains("</script><script>alert(1)"));
    assert!(html.contains(r#"<\/script><script>alert(1)"#));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_report_structure() {
    let json = generate_json_report(&sample_map(), &sample_failures()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let report = &value["report"];

    assert_eq!(report["metadata"]["generator"], "campusgraph");
    assert_eq!(report["summary"]["locations"], 3);
    assert_eq!(report["summary"]["items"], 2);
    assert_eq!(report["summary"]["edges"], 3);
    assert_eq!(report["summary"]["failed_locations"], 1);

    let nodes = report["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    let shared = nodes
        .iter()
        .find(|n| n["key"] == "123.45: Einführung in die Informatik")
        .unwrap();
    assert_eq!(shared["kind"], "item");
    assert_eq!(shared["identifier"], "123.45");
    assert_eq!(shared["title"], "Einführung in die Informatik");
    assert_eq!(shared["degree"], 2);

    let coesfeld = nodes.iter().find(|n| n["key"] == "Coesfeld").unwrap();
    assert_eq!(coesfeld["kind"], "location");
    assert_eq!(coesfeld["degree"], 0);
    assert!(coesfeld.get("identifier").is_none());

    let edges = report["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0]["location"], "Berlin");
    assert_eq!(report["failures"][0]["name"], "Kaputt");
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_text_report_lists_locations_shared_modules_and_failures() {
    let text = generate_text_report(&sample_map(), &sample_failures());

    assert!(text.contains("  Locations: 3\n"));
    assert!(text.contains("  Modules: 2\n"));
    assert!(text.contains("  Offerings: 3\n"));
    assert!(text.contains("  Berlin (2 modules)\n"));
    assert!(text.contains("  Coesfeld (0 modules)\n"));
    assert!(text.contains("123.45: Einführung in die Informatik (2): Berlin, Hamburg"));
    assert!(!text.contains("31021: Investition und Finanzierung ("));
    assert!(text.contains("## Failed locations"));
    assert!(text.contains("Kaputt <https://example.com/kaputt>"));
}

#[test]
fn test_text_report_without_failures_has_no_failure_section() {
    let text = render(&sample_map(), &[], ExportFormat::Text).unwrap();
    assert!(!text.contains("## Failed locations"));
}

#[test]
fn test_save_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.html");
    let html = render(&sample_map(), &[], ExportFormat::Html).unwrap();

    save_report(&html, &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), html);
}
