//! The EIP dependency graph.
//!
//! Each EIP is a node; each entry in its `requires` header is a link to the
//! required EIP. Links only join known nodes, node ids (`eip-{n}`) are
//! unique, and "referenced by" is the transpose of "requires".
//!
//! # Example
//!
//! ```rust
//! use eiptools_graph::{DocumentRecord, GraphBuilder, GraphNode, referenced_by};
//!
//! let (graph, stats) = GraphBuilder::new().from_records([
//!     DocumentRecord::new(GraphNode::new(1559, "Fee market change"), vec![2718]),
//!     DocumentRecord::new(GraphNode::new(2718, "Typed Transaction Envelope"), vec![]),
//! ]);
//! assert_eq!(stats.edges_created, 1);
//! assert_eq!(referenced_by(&graph, 2718).unwrap()[0].eip_no, 1559);
//! ```

pub mod algorithms;
pub mod artifact;
pub mod builder;
pub mod types;

pub use algorithms::{
    GraphStats, HourglassLayout, MAX_BFS_DEPTH, NeighborhoodResult, PositionedNode,
    TransitiveRequires, compute_stats, hourglass_layout, neighborhood, node_color, referenced_by,
    requires, transitive_requires,
};
pub use artifact::{ARTIFACT_FILE, load_artifact, save_artifact};
pub use builder::{BuildError, BuildStats, DocumentRecord, ErrorHandling, GraphBuilder};
pub use types::{DependencyGraph, GraphArtifact, GraphLink, GraphNode};
