use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Location, // Study centre
    Item,     // Module offered at one or more centres
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Location => "location",
            NodeKind::Item => "item",
        }
    }
}

/// A graph node. Item nodes carry identifier and title separately so
/// renderers never have to split `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Location name, or `"{identifier}: {title}"` for items.
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

impl Node {
    pub fn location(name: &str, url: Option<Url>) -> Self {
        Self {
            kind: NodeKind::Location,
            key: name.to_string(),
            label: name.to_string(),
            identifier: None,
            title: None,
            author: None,
            url,
        }
    }

    pub fn item(identifier: &str, title: &str, author: &str, url: Option<Url>) -> Self {
        Self {
            kind: NodeKind::Item,
            key: campusgraph_scanner::extraction::item_key(identifier, title),
            label: identifier.to_string(),
            identifier: Some(identifier.to_string()),
            title: Some(title.to_string()),
            author: (!author.is_empty()).then(|| author.to_string()),
            url,
        }
    }

    /// Hover text shown by the viewer.
    pub fn tooltip(&self) -> String {
        match self.kind {
            NodeKind::Location => format!("Standort: {}", self.label),
            NodeKind::Item => format!(
                "Modul: {}\nModul-Nr: {}",
                self.title.as_deref().unwrap_or_default(),
                self.identifier.as_deref().unwrap_or_default()
            ),
        }
    }
}
