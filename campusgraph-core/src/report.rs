// Artifacts rendered from the campus map

use crate::crawl::LocationFailure;
use crate::error::Result;
use crate::map::CampusMap;
use crate::model::{Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const LOCATION_COLOR: &str = "#ADD8E6";
const ITEM_COLOR: &str = "#90EE90";
const LOCATION_SIZE: u32 = 30;
const ITEM_SIZE: u32 = 20;

const VIS_NETWORK_SCRIPT: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Html,
    Json,
    Text,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "json" => Some(ExportFormat::Json),
            "text" | "txt" => Some(ExportFormat::Text),
            _ => None,
        }
    }

    /// Where the artifact goes when no output path is given. Text goes to
    /// the terminal.
    pub fn default_file_name(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Html => Some("mentoring_graph.html"),
            ExportFormat::Json => Some("mentoring_graph.json"),
            ExportFormat::Text => None,
        }
    }
}

pub fn render(map: &CampusMap, failures: &[LocationFailure], format: ExportFormat) -> Result<String> {
    Ok(match format {
        ExportFormat::Html => generate_html_report(map)?,
        ExportFormat::Json => generate_json_report(map, failures)?,
        ExportFormat::Text => generate_text_report(map, failures),
    })
}

#[derive(Debug, Serialize)]
struct VisNode<'a> {
    id: usize,
    label: &'a str,
    title: String,
    color: &'static str,
    size: u32,
    shape: &'static str,
    group: &'static str,
}

#[derive(Debug, Serialize)]
struct VisEdge {
    from: usize,
    to: usize,
}

impl<'a> VisNode<'a> {
    fn from_node(id: usize, node: &'a Node) -> Self {
        let (color, size) = match node.kind {
            NodeKind::Location => (LOCATION_COLOR, LOCATION_SIZE),
            NodeKind::Item => (ITEM_COLOR, ITEM_SIZE),
        };
        Self {
            id,
            label: &node.label,
            title: node.tooltip(),
            color,
            size,
            shape: "dot",
            group: node.kind.as_str(),
        }
    }
}

fn vis_options() -> serde_json::Value {
    serde_json::json!({
        "nodes": { "font": { "color": "black" } },
        "edges": { "smooth": false },
        "physics": {
            "forceAtlas2Based": {
                "gravitationalConstant": -100,
                "centralGravity": 0.01,
                "springLength": 200,
                "springConstant": 0.08
            },
            "maxVelocity": 50,
            "minVelocity": 0.1,
            "solver": "forceAtlas2Based",
            "timestep": 0.35
        },
        "interaction": {
            "hover": true,
            "navigationButtons": true,
            "keyboard": { "enabled": true }
        }
    })
}

/// JSON that is safe to drop inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// A standalone page that draws the map with vis-network.
pub fn generate_html_report(map: &CampusMap) -> Result<String> {
    let nodes: Vec<VisNode<'_>> = map
        .nodes()
        .map(|(index, node)| VisNode::from_node(index.index(), node))
        .collect();
    let edges: Vec<VisEdge> = map
        .graph()
        .edge_indices()
        .filter_map(|edge| map.graph().edge_endpoints(edge))
        .map(|(a, b)| VisEdge {
            from: a.index(),
            to: b.index(),
        })
        .collect();

    let title = format!(
        "Mentoriate: {} Standorte, {} Module",
        map.nodes_of(NodeKind::Location).count(),
        map.nodes_of(NodeKind::Item).count()
    );

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str(&format!("<script src=\"{}\"></script>\n", VIS_NETWORK_SCRIPT));
    html.push_str("<style>\n");
    html.push_str("  body { margin: 0; font-family: sans-serif; }\n");
    html.push_str("  #campus-graph { width: 100%; height: 750px; background-color: #ffffff; }\n");
    html.push_str("  div.vis-tooltip { white-space: pre-line; }\n");
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&title)));
    html.push_str("<div id=\"campus-graph\"></div>\n<script>\n");
    html.push_str(&format!("  const nodes = new vis.DataSet({});\n", script_json(&nodes)?));
    html.push_str(&format!("  const edges = new vis.DataSet({});\n", script_json(&edges)?));
    html.push_str(&format!("  const options = {};\n", script_json(&vis_options())?));
    html.push_str("  const container = document.getElementById(\"campus-graph\");\n");
    html.push_str("  new vis.Network(container, { nodes: nodes, edges: edges }, options);\n");
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

pub fn generate_json_report(map: &CampusMap, failures: &[LocationFailure]) -> Result<String> {
    let nodes: Vec<serde_json::Value> = map
        .nodes()
        .map(|(index, node)| {
            let mut value = serde_json::to_value(node)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("id".to_string(), index.index().into());
                object.insert("degree".to_string(), map.degree(index).into());
            }
            Ok(value)
        })
        .collect::<std::result::Result<_, serde_json::Error>>()?;

    let edges: Vec<serde_json::Value> = map
        .edges()
        .map(|(location, item)| {
            serde_json::json!({
                "location": location.key,
                "item": item.key,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "campusgraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "locations": map.nodes_of(NodeKind::Location).count(),
                "items": map.nodes_of(NodeKind::Item).count(),
                "edges": map.edge_count(),
                "failed_locations": failures.len()
            },
            "nodes": nodes,
            "edges": edges,
            "failures": failures
        }
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

pub fn generate_text_report(map: &CampusMap, failures: &[LocationFailure]) -> String {
    let mut report = String::new();
    report.push_str(DIVIDER);
    report.push_str("\n\n# Summary:\n");
    report.push_str(&format!(
        "  Locations: {}\n",
        map.nodes_of(NodeKind::Location).count()
    ));
    report.push_str(&format!(
        "  Modules: {}\n",
        map.nodes_of(NodeKind::Item).count()
    ));
    report.push_str(&format!("  Offerings: {}\n", map.edge_count()));
    report.push_str(&format!("  Failed locations: {}\n", failures.len()));
    report.push('\n');
    report.push_str(DIVIDER);
    report.push_str("\n\n## Locations\n");

    for (index, node) in map.nodes_of(NodeKind::Location) {
        report.push_str(&format!("  {} ({} modules)\n", node.label, map.degree(index)));
    }

    let mut shared: Vec<(&Node, Vec<&str>)> = map
        .nodes_of(NodeKind::Item)
        .filter(|(index, _)| map.degree(*index) > 1)
        .map(|(index, node)| {
            let locations = map
                .neighbors(index)
                .into_iter()
                .map(|location| location.label.as_str())
                .collect();
            (node, locations)
        })
        .collect();
    shared.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.key.cmp(&b.0.key)));

    if !shared.is_empty() {
        report.push_str("\n## Modules offered at several locations\n");
        for (node, locations) in shared {
            report.push_str(&format!(
                "  {} ({}): {}\n",
                node.key,
                locations.len(),
                locations.join(", ")
            ));
        }
    }

    if !failures.is_empty() {
        report.push_str("\n## Failed locations\n");
        for failure in failures {
            report.push_str(&format!(
                "  {} <{}>: {}\n",
                failure.name, failure.url, failure.error
            ));
        }
    }

    report.push('\n');
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
