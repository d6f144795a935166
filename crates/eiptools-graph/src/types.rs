//! Core graph types.
//!
//! A [`DependencyGraph`] holds one node per EIP and a directed edge from
//! each EIP to every EIP it requires. The serialized form is a
//! [`GraphArtifact`]: flat node and link lists using `eip-{n}` ids.

use std::collections::{HashMap, HashSet};

use eiptools_content::DocumentMetadata;
use eiptools_core::{DocKind, Error, Result, node_id};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

// ============================================================================
// Artifact records
// ============================================================================

/// A document in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// `eip-{n}`.
    pub id: String,
    pub eip_no: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "isERC", default)]
    pub is_erc: bool,
}

impl GraphNode {
    /// Creates a node with only a number and title.
    pub fn new(eip_no: u32, title: impl Into<String>) -> Self {
        Self {
            id: node_id(eip_no),
            eip_no,
            title: title.into(),
            status: None,
            doc_type: None,
            category: None,
            is_erc: false,
        }
    }

    /// Node for document `eip_no` described by `metadata`.
    pub fn from_metadata(eip_no: u32, metadata: &DocumentMetadata, is_erc: bool) -> Self {
        Self {
            id: node_id(eip_no),
            eip_no,
            title: metadata.title_or_default(DocKind::Eip, eip_no),
            status: metadata.status.clone(),
            doc_type: metadata.doc_type.clone(),
            category: metadata.category.clone(),
            is_erc,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_erc(mut self, is_erc: bool) -> Self {
        self.is_erc = is_erc;
        self
    }

    /// Status, or `Draft` when the header had none.
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or("Draft")
    }
}

/// "`source` requires `target`".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Serialized graph, as written to `eip-graph-data.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

// ============================================================================
// DependencyGraph
// ============================================================================

/// Directed requires-graph over a petgraph `DiGraph`.
///
/// Edges point from a document to the documents it requires, so
/// "referenced by" is the incoming direction.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph.
    pub graph: DiGraph<GraphNode, ()>,
    /// Lookup table: node ID → petgraph NodeIndex.
    pub node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.get_index(id).map(|idx| &self.graph[idx])
    }

    /// Node for document number `eip_no`.
    pub fn get_by_number(&self, eip_no: u32) -> Option<&GraphNode> {
        self.get_node(&node_id(eip_no))
    }

    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Links in insertion order.
    pub fn iter_links(&self) -> impl Iterator<Item = GraphLink> + '_ {
        self.graph.edge_references().map(|e| {
            GraphLink::new(
                self.graph[e.source()].id.clone(),
                self.graph[e.target()].id.clone(),
            )
        })
    }

    /// Adds a node, returning its index.
    ///
    /// If a node with the same ID already exists, the graph is unchanged and
    /// the existing index is returned.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&existing) = self.node_indices.get(&node.id) {
            return existing;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Adds a link between two existing nodes.
    pub fn add_link(&mut self, source: &str, target: &str) -> Result<()> {
        let from = self
            .get_index(source)
            .ok_or_else(|| Error::not_found("node", source))?;
        let to = self
            .get_index(target)
            .ok_or_else(|| Error::not_found("node", target))?;
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    pub fn has_link(&self, source: &str, target: &str) -> bool {
        match (self.get_index(source), self.get_index(target)) {
            (Some(from), Some(to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Neighbouring nodes of `idx` in one direction, sorted by number.
    pub(crate) fn neighbors_sorted(&self, idx: NodeIndex, direction: Direction) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        nodes.sort_by_key(|n| n.eip_no);
        nodes.dedup_by_key(|n| n.eip_no);
        nodes
    }

    /// Neighbouring nodes of `idx` in one direction, in the order the links
    /// were added. For outgoing links that is the document's `requires` order.
    pub(crate) fn neighbors_in_link_order(&self, idx: NodeIndex, direction: Direction) -> Vec<&GraphNode> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);

        let mut seen = HashSet::new();
        edges
            .into_iter()
            .filter(|(_, other)| seen.insert(*other))
            .map(|(_, other)| &self.graph[other])
            .collect()
    }

    pub fn to_artifact(&self) -> GraphArtifact {
        GraphArtifact {
            nodes: self.iter_nodes().cloned().collect(),
            links: self.iter_links().collect(),
        }
    }

    /// Rebuilds a graph from an artifact.
    ///
    /// Duplicate nodes keep their first occurrence; links naming an
    /// unknown node are dropped with a warning.
    pub fn from_artifact(artifact: GraphArtifact) -> Self {
        let mut graph = Self::new();
        for node in artifact.nodes {
            graph.add_node(node);
        }
        for link in &artifact.links {
            if graph.add_link(&link.source, &link.target).is_err() {
                log::warn!(
                    "Dropping dangling link {} -> {}",
                    link.source,
                    link.target
                );
            }
        }
        graph
    }
}

impl From<GraphArtifact> for DependencyGraph {
    fn from(artifact: GraphArtifact) -> Self {
        Self::from_artifact(artifact)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_dedupes_by_id() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(GraphNode::new(1559, "Fee market change"));
        let b = graph.add_node(GraphNode::new(1559, "Another title"));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get_by_number(1559).unwrap().title, "Fee market change");
    }

    #[test]
    fn test_add_link_requires_both_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_node(GraphNode::new(1559, "Fee market change"));
        graph.add_node(GraphNode::new(2718, "Typed Transaction Envelope"));

        graph.add_link("eip-1559", "eip-2718").unwrap();
        assert!(graph.has_link("eip-1559", "eip-2718"));
        assert!(!graph.has_link("eip-2718", "eip-1559"));

        let err = graph.add_link("eip-1559", "eip-9999").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_node_serializes_like_artifact() {
        let node = GraphNode::new(20, "Token Standard")
            .with_status("Final")
            .with_erc(true);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "eip-20");
        assert_eq!(json["eipNo"], 20);
        assert_eq!(json["isERC"], true);
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_node_reads_artifact_fields() {
        let json = r#"{"id":"eip-1","eipNo":1,"title":"EIP Purpose and Guidelines",
            "status":"Living","type":"Meta"}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.doc_type.as_deref(), Some("Meta"));
        assert!(!node.is_erc);
    }

    #[test]
    fn test_artifact_drops_dangling_links() {
        let artifact = GraphArtifact {
            nodes: vec![GraphNode::new(1, "A"), GraphNode::new(2, "B")],
            links: vec![GraphLink::new("eip-2", "eip-1"), GraphLink::new("eip-2", "eip-3")],
        };
        let graph = DependencyGraph::from_artifact(artifact);
        assert_eq!(graph.edge_count(), 1);

        let back = graph.to_artifact();
        assert_eq!(back.links, vec![GraphLink::new("eip-2", "eip-1")]);
        assert_eq!(back.nodes.len(), 2);
    }
}
