//! The bipartite location/module graph.

use crate::model::{Node, NodeKind};
use campusgraph_scanner::ItemRecord;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use url::Url;

/// Undirected graph with location and item nodes, edges only between the two.
///
/// Inserting a node or edge that already exists is a no-op, so the graph can
/// be fed the same (location, record) pair any number of times.
#[derive(Debug, Clone, Default)]
pub struct CampusMap {
    graph: UnGraph<Node, ()>,
    index: HashMap<(NodeKind, String), NodeIndex>,
}

impl CampusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from location name to records. Locations without records still
    /// get a node.
    pub fn build<'a, I, R>(locations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, R)>,
        R: AsRef<[ItemRecord]>,
    {
        let mut map = Self::new();
        for (name, records) in locations {
            let location = map.add_location(name, None);
            map.add_records(location, records.as_ref());
        }
        map
    }

    pub fn add_location(&mut self, name: &str, url: Option<Url>) -> NodeIndex {
        let index = self.insert_or_get_node(Node::location(name, url.clone()));
        // a node first created without a URL picks one up later
        if let Some(url) = url
            && self.graph[index].url.is_none()
        {
            self.graph[index].url = Some(url);
        }
        index
    }

    pub fn add_records(&mut self, location: NodeIndex, records: &[ItemRecord]) {
        for record in records {
            let item = self.insert_or_get_node(Node::item(
                &record.identifier,
                &record.title,
                &record.author,
                record.url.clone(),
            ));
            self.insert_edge(location, item);
        }
    }

    fn insert_or_get_node(&mut self, node: Node) -> NodeIndex {
        let key = (node.kind, node.key.clone());
        if let Some(&index) = self.index.get(&key) {
            return index;
        }
        let index = self.graph.add_node(node);
        self.index.insert(key, index);
        index
    }

    /// Returns false when the edge was already present.
    fn insert_edge(&mut self, location: NodeIndex, item: NodeIndex) -> bool {
        if self.graph.find_edge(location, item).is_some() {
            return false;
        }
        self.graph.add_edge(location, item, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn find(&self, kind: NodeKind, key: &str) -> Option<NodeIndex> {
        self.index.get(&(kind, key.to_string())).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    pub fn degree(&self, index: NodeIndex) -> usize {
        self.graph.neighbors(index).count()
    }

    pub fn contains_edge(&self, location: &str, item_key: &str) -> bool {
        match (
            self.find(NodeKind::Location, location),
            self.find(NodeKind::Item, item_key),
        ) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes().filter(move |(_, node)| node.kind == kind)
    }

    /// Edges as (location, item) pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.graph.edge_references().map(move |edge| {
            let (a, b) = (&self.graph[edge.source()], &self.graph[edge.target()]);
            if a.kind == NodeKind::Location {
                (a, b)
            } else {
                (b, a)
            }
        })
    }

    /// Nodes adjacent to `index`, in the order their edges were added.
    pub fn neighbors(&self, index: NodeIndex) -> Vec<&Node> {
        // petgraph walks adjacency newest first
        let mut neighbors: Vec<&Node> = self
            .graph
            .neighbors(index)
            .map(|neighbor| &self.graph[neighbor])
            .collect();
        neighbors.reverse();
        neighbors
    }

    pub fn graph(&self) -> &UnGraph<Node, ()> {
        &self.graph
    }
}
