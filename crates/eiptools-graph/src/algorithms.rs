//! Graph algorithms for the dependency graph.
//!
//! Provides:
//! - Direct lookups (requires / referenced-by)
//! - Neighborhood exploration (N-hop BFS in both directions, capped depth)
//! - Transitive requirements in dependency order
//! - The hourglass layout used on document pages
//! - Summary statistics

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use eiptools_content::status_color;
use eiptools_core::{Error, Result, node_id};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::{DependencyGraph, GraphLink, GraphNode};

/// Maximum allowed BFS depth to prevent runaway traversals.
pub const MAX_BFS_DEPTH: usize = 10;

/// Width of the hourglass drawing area.
pub const LAYOUT_WIDTH: f64 = 1000.0;
/// Width the nodes of one row are spread across.
const LAYOUT_ROW_SPAN: f64 = 900.0;
const MIN_NODE_SPACING: f64 = 140.0;
const TOP_ROW_Y: f64 = 60.0;
const ROW_HEIGHT: f64 = 130.0;

// ============================================================================
// Result types
// ============================================================================

/// Result of a neighborhood query.
#[derive(Clone, Debug, Serialize)]
pub struct NeighborhoodResult {
    pub center: GraphNode,
    /// Nodes within the radius, excluding the center, in BFS order.
    pub nodes: Vec<GraphNode>,
    /// Links between any two nodes of the neighborhood.
    pub links: Vec<GraphLink>,
    /// Hop distance from the center, by node ID.
    pub distances: HashMap<String, usize>,
}

/// Everything a document requires, directly or indirectly.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitiveRequires {
    pub target: GraphNode,
    /// Dependencies first; when `has_cycles` is set the order is by number.
    pub ordered: Vec<GraphNode>,
    pub has_cycles: bool,
}

/// A node with drawing coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
}

/// Three-row layout: required documents above, the document in the
/// middle, documents referencing it below.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourglassLayout {
    pub required: Vec<PositionedNode>,
    pub current: PositionedNode,
    pub referenced_by: Vec<PositionedNode>,
}

/// Summary of the whole graph.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub erc_count: usize,
    /// Nodes per status; nodes without one count as `Draft`.
    pub by_status: BTreeMap<String, usize>,
    /// Nodes with the most incoming links, most referenced first.
    pub most_referenced: Vec<(GraphNode, usize)>,
}

// ============================================================================
// Algorithms
// ============================================================================

fn index_of(graph: &DependencyGraph, eip_no: u32) -> Result<NodeIndex> {
    let id = node_id(eip_no);
    graph
        .get_index(&id)
        .ok_or_else(|| Error::not_found("node", id))
}

/// Documents `eip_no` requires, sorted by number.
pub fn requires(graph: &DependencyGraph, eip_no: u32) -> Result<Vec<&GraphNode>> {
    let idx = index_of(graph, eip_no)?;
    Ok(graph.neighbors_sorted(idx, Direction::Outgoing))
}

/// Documents that require `eip_no`, sorted by number.
pub fn referenced_by(graph: &DependencyGraph, eip_no: u32) -> Result<Vec<&GraphNode>> {
    let idx = index_of(graph, eip_no)?;
    Ok(graph.neighbors_sorted(idx, Direction::Incoming))
}

/// Get the N-hop neighborhood around a node.
///
/// Follows links in both directions. Depth is capped at [`MAX_BFS_DEPTH`].
pub fn neighborhood(
    graph: &DependencyGraph,
    center_id: &str,
    radius: usize,
) -> Result<NeighborhoodResult> {
    let center_idx = graph
        .get_index(center_id)
        .ok_or_else(|| Error::not_found("node", center_id))?;
    let radius = radius.min(MAX_BFS_DEPTH);

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut distances: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
    let mut nodes: Vec<GraphNode> = Vec::new();

    visited.insert(center_idx);
    distances.insert(center_id.to_string(), 0);
    queue.push_back((center_idx, 0));

    while let Some((current, dist)) = queue.pop_front() {
        if dist >= radius {
            continue;
        }
        let outgoing = graph.graph.neighbors_directed(current, Direction::Outgoing);
        let incoming = graph.graph.neighbors_directed(current, Direction::Incoming);
        for neighbor in outgoing.chain(incoming) {
            if visited.insert(neighbor) {
                let node = &graph.graph[neighbor];
                distances.insert(node.id.clone(), dist + 1);
                nodes.push(node.clone());
                queue.push_back((neighbor, dist + 1));
            }
        }
    }

    let links = graph
        .graph
        .edge_references()
        .filter(|e| visited.contains(&e.source()) && visited.contains(&e.target()))
        .map(|e| {
            GraphLink::new(
                graph.graph[e.source()].id.clone(),
                graph.graph[e.target()].id.clone(),
            )
        })
        .collect();

    Ok(NeighborhoodResult {
        center: graph.graph[center_idx].clone(),
        nodes,
        links,
        distances,
    })
}

/// All documents `eip_no` requires, directly or indirectly.
///
/// Only the reachable subgraph is sorted, so a cycle elsewhere in the graph
/// does not affect the result.
pub fn transitive_requires(graph: &DependencyGraph, eip_no: u32) -> Result<TransitiveRequires> {
    let target_idx = index_of(graph, eip_no)?;

    let mut reachable: Vec<NodeIndex> = Vec::new();
    let mut seen: HashSet<NodeIndex> = HashSet::from([target_idx]);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([target_idx]);
    let mut has_self_loop = false;
    while let Some(current) = queue.pop_front() {
        for next in graph.graph.neighbors_directed(current, Direction::Outgoing) {
            if next == target_idx {
                has_self_loop = true;
            }
            if seen.insert(next) {
                reachable.push(next);
                queue.push_back(next);
            }
        }
    }

    // Subgraph over the target and everything it reaches.
    let mut sub: DiGraph<NodeIndex, ()> = DiGraph::new();
    let mut local: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    for &idx in std::iter::once(&target_idx).chain(reachable.iter()) {
        local.insert(idx, sub.add_node(idx));
    }
    for (&idx, &sub_idx) in &local {
        for next in graph.graph.neighbors_directed(idx, Direction::Outgoing) {
            if let Some(&sub_next) = local.get(&next) {
                sub.update_edge(sub_idx, sub_next, ());
            }
        }
    }

    let (ordered, has_cycles) = match toposort(&sub, None) {
        Ok(sorted) if !has_self_loop => {
            // Requirers come before what they require; reverse for dependencies first.
            let ordered = sorted
                .into_iter()
                .rev()
                .map(|sub_idx| sub[sub_idx])
                .filter(|idx| *idx != target_idx)
                .map(|idx| graph.graph[idx].clone())
                .collect();
            (ordered, false)
        }
        _ => {
            let mut ordered: Vec<GraphNode> = reachable
                .iter()
                .filter(|idx| **idx != target_idx)
                .map(|idx| graph.graph[*idx].clone())
                .collect();
            ordered.sort_by_key(|n| n.eip_no);
            (ordered, true)
        }
    };

    Ok(TransitiveRequires {
        target: graph.graph[target_idx].clone(),
        ordered,
        has_cycles,
    })
}

/// Node colour by status; unknown or missing statuses use the Draft colour.
pub fn node_color(node: &GraphNode) -> &'static str {
    status_color(node.status_or_default())
}

fn layout_row(nodes: Vec<&GraphNode>, y: f64) -> Vec<PositionedNode> {
    let count = nodes.len();
    let spacing = MIN_NODE_SPACING.max(LAYOUT_ROW_SPAN / count.max(1) as f64);
    let total_width = count.saturating_sub(1) as f64 * spacing;
    let start_x = (LAYOUT_WIDTH - total_width) / 2.0;

    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| PositionedNode {
            color: node_color(node),
            node: node.clone(),
            x: start_x + i as f64 * spacing,
            y,
        })
        .collect()
}

/// Hourglass layout around `eip_no`.
///
/// Rows sit at y = 60, 190 and 320. Each outer row is centred in a width
/// of 1000 with spacing `max(140, 900 / len)`. The required row keeps the
/// document's `requires` order; the bottom row keeps link order.
pub fn hourglass_layout(graph: &DependencyGraph, eip_no: u32) -> Result<HourglassLayout> {
    let idx = index_of(graph, eip_no)?;
    let node = &graph.graph[idx];
    let required = graph.neighbors_in_link_order(idx, Direction::Outgoing);
    let referencing = graph.neighbors_in_link_order(idx, Direction::Incoming);

    Ok(HourglassLayout {
        required: layout_row(required, TOP_ROW_Y),
        current: PositionedNode {
            node: node.clone(),
            x: LAYOUT_WIDTH / 2.0,
            y: TOP_ROW_Y + ROW_HEIGHT,
            color: node_color(node),
        },
        referenced_by: layout_row(referencing, TOP_ROW_Y + 2.0 * ROW_HEIGHT),
    })
}

/// Counts, status histogram, and the `top` most referenced documents.
pub fn compute_stats(graph: &DependencyGraph, top: usize) -> GraphStats {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for node in graph.iter_nodes() {
        *by_status
            .entry(node.status_or_default().to_string())
            .or_insert(0) += 1;
    }

    let mut referenced: Vec<(GraphNode, usize)> = graph
        .graph
        .node_indices()
        .map(|idx| {
            let count = graph
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .count();
            (graph.graph[idx].clone(), count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    referenced.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.eip_no.cmp(&b.0.eip_no)));
    referenced.truncate(top);

    GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        erc_count: graph.iter_nodes().filter(|n| n.is_erc).count(),
        by_status,
        most_referenced: referenced,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DocumentRecord, GraphBuilder};
    use proptest::prelude::*;

    /// 1559 -> {2718, 2930}, 2930 -> 2718, 4844 -> {1559, 2718}, 20 alone.
    fn sample_graph() -> DependencyGraph {
        let records = vec![
            DocumentRecord::new(GraphNode::new(20, "Token Standard").with_erc(true), vec![]),
            DocumentRecord::new(
                GraphNode::new(1559, "Fee market change").with_status("Final"),
                vec![2718, 2930],
            ),
            DocumentRecord::new(
                GraphNode::new(2718, "Typed Transaction Envelope").with_status("Final"),
                vec![],
            ),
            DocumentRecord::new(
                GraphNode::new(2930, "Optional access lists").with_status("Final"),
                vec![2718],
            ),
            DocumentRecord::new(
                GraphNode::new(4844, "Shard Blob Transactions").with_status("Final"),
                vec![1559, 2718],
            ),
        ];
        GraphBuilder::new().from_records(records).0
    }

    fn numbers(nodes: &[&GraphNode]) -> Vec<u32> {
        nodes.iter().map(|n| n.eip_no).collect()
    }

    #[test]
    fn test_requires_and_referenced_by() {
        let graph = sample_graph();
        assert_eq!(numbers(&requires(&graph, 1559).unwrap()), vec![2718, 2930]);
        assert_eq!(numbers(&referenced_by(&graph, 2718).unwrap()), vec![1559, 2930, 4844]);
        assert!(requires(&graph, 20).unwrap().is_empty());
        assert!(matches!(requires(&graph, 1), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_referenced_by_is_transpose_of_requires() {
        let graph = sample_graph();
        for node in graph.iter_nodes() {
            for required in requires(&graph, node.eip_no).unwrap() {
                let back = referenced_by(&graph, required.eip_no).unwrap();
                assert!(back.iter().any(|n| n.eip_no == node.eip_no));
            }
        }
    }

    #[test]
    fn test_neighborhood_radius() {
        let graph = sample_graph();

        let one = neighborhood(&graph, "eip-2930", 1).unwrap();
        let mut ids: Vec<&str> = one.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["eip-1559", "eip-2718"]);
        assert_eq!(one.distances["eip-2718"], 1);

        let two = neighborhood(&graph, "eip-2930", 2).unwrap();
        assert_eq!(two.nodes.len(), 3);
        assert_eq!(two.distances["eip-4844"], 2);
        assert!(two.links.contains(&GraphLink::new("eip-4844", "eip-1559")));

        let zero = neighborhood(&graph, "eip-20", 5).unwrap();
        assert!(zero.nodes.is_empty());
        assert!(neighborhood(&graph, "eip-1", 1).is_err());
    }

    #[test]
    fn test_transitive_requires_orders_dependencies_first() {
        let graph = sample_graph();
        let result = transitive_requires(&graph, 4844).unwrap();
        assert!(!result.has_cycles);
        let order: Vec<u32> = result.ordered.iter().map(|n| n.eip_no).collect();
        assert_eq!(order.len(), 3);
        let pos = |n: u32| order.iter().position(|x| *x == n).unwrap();
        assert!(pos(2718) < pos(2930));
        assert!(pos(2930) < pos(1559));
    }

    #[test]
    fn test_transitive_requires_detects_cycle() {
        let records = vec![
            DocumentRecord::new(GraphNode::new(1, "A"), vec![2]),
            DocumentRecord::new(GraphNode::new(2, "B"), vec![3]),
            DocumentRecord::new(GraphNode::new(3, "C"), vec![2]),
        ];
        let graph = GraphBuilder::new().from_records(records).0;
        let result = transitive_requires(&graph, 1).unwrap();
        assert!(result.has_cycles);
        let order: Vec<u32> = result.ordered.iter().map(|n| n.eip_no).collect();
        assert_eq!(order, vec![2, 3]);
    }

    #[test]
    fn test_hourglass_layout() {
        let graph = sample_graph();
        let layout = hourglass_layout(&graph, 2930).unwrap();

        assert_eq!((layout.current.x, layout.current.y), (500.0, 190.0));
        assert_eq!(layout.required.len(), 1);
        assert_eq!((layout.required[0].x, layout.required[0].y), (500.0, 60.0));

        // Single referencer is centred.
        assert_eq!(layout.referenced_by[0].x, 500.0);
        assert_eq!(layout.referenced_by[0].y, 320.0);

        let layout = hourglass_layout(&graph, 2718).unwrap();
        // Three nodes: spacing 300, start at 200.
        let xs: Vec<f64> = layout.referenced_by.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![200.0, 500.0, 800.0]);
        assert_eq!(layout.current.color, "#2ECC71");
    }

    #[test]
    fn test_hourglass_keeps_requires_order() {
        let records = vec![
            DocumentRecord::new(GraphNode::new(7702, "Set code"), vec![2930, 2718, 2930]),
            DocumentRecord::new(GraphNode::new(2718, "Envelope"), vec![]),
            DocumentRecord::new(GraphNode::new(2930, "Access lists"), vec![2718]),
        ];
        let graph = GraphBuilder::new().from_records(records).0;

        let layout = hourglass_layout(&graph, 7702).unwrap();
        let order: Vec<u32> = layout.required.iter().map(|p| p.node.eip_no).collect();
        assert_eq!(order, vec![2930, 2718]);
        assert!(layout.required[0].x < layout.required[1].x);

        // The lookup used by the API stays sorted by number.
        assert_eq!(numbers(&requires(&graph, 7702).unwrap()), vec![2718, 2930]);

        // Same order after a round trip through the artifact.
        let reloaded = DependencyGraph::from_artifact(graph.to_artifact());
        let layout = hourglass_layout(&reloaded, 7702).unwrap();
        let order: Vec<u32> = layout.required.iter().map(|p| p.node.eip_no).collect();
        assert_eq!(order, vec![2930, 2718]);
    }

    #[test]
    fn test_layout_spacing_has_minimum() {
        let nodes: Vec<GraphNode> = (1..=10).map(|n| GraphNode::new(n, "x")).collect();
        let row = layout_row(nodes.iter().collect(), TOP_ROW_Y);
        assert_eq!(row[1].x - row[0].x, 140.0);
        assert_eq!(row[0].x, (1000.0 - 9.0 * 140.0) / 2.0);
    }

    #[test]
    fn test_node_color_defaults_to_draft() {
        assert_eq!(node_color(&GraphNode::new(1, "x")), status_color("Draft"));
        assert_eq!(
            node_color(&GraphNode::new(1, "x").with_status("Mystery")),
            status_color("Draft")
        );
    }

    #[test]
    fn test_compute_stats() {
        let stats = compute_stats(&sample_graph(), 2);
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 5);
        assert_eq!(stats.erc_count, 1);
        assert_eq!(stats.by_status["Final"], 4);
        assert_eq!(stats.by_status["Draft"], 1);
        assert_eq!(stats.most_referenced[0].0.eip_no, 2718);
        assert_eq!(stats.most_referenced[0].1, 3);
        assert_eq!(stats.most_referenced.len(), 2);
    }

    fn dataset() -> impl Strategy<Value = Vec<(u32, Vec<u32>)>> {
        prop::collection::vec((1u32..40, prop::collection::vec(1u32..40, 0..5)), 0..30)
    }

    proptest! {
        #[test]
        fn prop_referenced_by_is_exact_transpose(docs in dataset()) {
            let records = docs
                .iter()
                .map(|(n, reqs)| DocumentRecord::new(GraphNode::new(*n, "doc"), reqs.clone()));
            let (graph, _) = GraphBuilder::new().from_records(records);

            let mut forward: HashSet<(u32, u32)> = HashSet::new();
            let mut backward: HashSet<(u32, u32)> = HashSet::new();
            for node in graph.iter_nodes() {
                for r in requires(&graph, node.eip_no).unwrap() {
                    forward.insert((node.eip_no, r.eip_no));
                }
                for r in referenced_by(&graph, node.eip_no).unwrap() {
                    backward.insert((r.eip_no, node.eip_no));
                }
            }
            prop_assert_eq!(&forward, &backward);

            // Every link joins two known nodes.
            for (from, to) in &forward {
                prop_assert!(graph.get_by_number(*from).is_some());
                prop_assert!(graph.get_by_number(*to).is_some());
            }
        }
    }
}
