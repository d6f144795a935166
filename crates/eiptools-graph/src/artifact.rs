//! Reading and writing the JSON graph artifact.

use std::path::Path;

use eiptools_core::Result;
use eiptools_core::util::files::{read_json, write_json};

use crate::{DependencyGraph, GraphArtifact};

/// Default file name of the graph artifact.
pub const ARTIFACT_FILE: &str = "eip-graph-data.json";

/// Load a graph from an artifact file.
pub fn load_artifact(path: &Path) -> Result<DependencyGraph> {
    let artifact: GraphArtifact = read_json(path)?;
    log::debug!(
        "Loaded graph artifact {} ({} nodes, {} links)",
        path.display(),
        artifact.nodes.len(),
        artifact.links.len()
    );
    Ok(DependencyGraph::from_artifact(artifact))
}

/// Write `graph` as pretty-printed JSON, replacing any existing file.
pub fn save_artifact(graph: &DependencyGraph, path: &Path) -> Result<()> {
    write_json(path, &graph.to_artifact())?;
    log::info!(
        "Wrote graph artifact {} ({} nodes, {} links)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphNode;
    use eiptools_core::Error;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join(ARTIFACT_FILE);

        let mut graph = DependencyGraph::new();
        graph.add_node(GraphNode::new(1559, "Fee market change").with_status("Final"));
        graph.add_node(GraphNode::new(2718, "Typed Transaction Envelope"));
        graph.add_link("eip-1559", "eip-2718").unwrap();
        save_artifact(&graph, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"eipNo\": 1559"));
        assert!(text.contains("\"source\": \"eip-1559\""));

        let loaded = load_artifact(&path).unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert!(loaded.has_link("eip-1559", "eip-2718"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifact(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
    }
}
