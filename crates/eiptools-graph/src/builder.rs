//! GraphBuilder for constructing the dependency graph.
//!
//! The build is two-phase: phase 1 creates one node per catalogued document
//! whose markdown can be read, phase 2 adds a link for every `requires`
//! entry. Creating all nodes first lets a document require one that comes
//! later in the catalog. Links to documents that never became nodes are
//! recorded in [`BuildStats::dangling_refs`]; repeated links are counted in
//! [`BuildStats::deduped_edges`].

use std::collections::HashSet;

use eiptools_catalog::{Catalog, MarkdownSource};
use eiptools_content::parse_document;
use eiptools_core::{DocKind, Error, Result, node_id};

use crate::{DependencyGraph, GraphNode};

// ============================================================================
// Builder configuration types
// ============================================================================

/// Options for handling per-document errors during a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Stop on first error.
    FailFast,
    /// Continue and collect errors.
    Collect,
    /// Log and skip problematic documents.
    #[default]
    Skip,
}

/// An error that occurred while reading one document.
#[derive(Debug, Clone)]
pub struct BuildError {
    pub eip_no: u32,
    pub message: String,
}

/// A node plus the numbers it requires, before links are resolved.
#[derive(Clone, Debug)]
pub struct DocumentRecord {
    pub node: GraphNode,
    pub requires: Vec<u32>,
}

impl DocumentRecord {
    pub fn new(node: GraphNode, requires: Vec<u32>) -> Self {
        Self { node, requires }
    }
}

/// Statistics from a graph build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub nodes_created: usize,
    pub edges_created: usize,
    /// Documents attempted.
    pub files_processed: usize,
    /// Documents skipped due to errors.
    pub files_skipped: usize,
    /// Errors encountered (if not fail-fast).
    pub errors: Vec<BuildError>,
    /// `requires` entries naming a document that is not a node.
    pub dangling_refs: Vec<String>,
    /// Duplicate `requires` entries that were dropped.
    pub deduped_edges: usize,
}

// ============================================================================
// GraphBuilder
// ============================================================================

/// Builder for the EIP dependency graph.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    error_handling: ErrorHandling,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error handling strategy.
    pub fn with_error_handling(mut self, handling: ErrorHandling) -> Self {
        self.error_handling = handling;
        self
    }

    /// Builds the graph by reading every document in `catalog` from `source`.
    ///
    /// Node fields come from each document's header; the node id uses the
    /// catalog number. A document whose markdown is missing or unreadable
    /// is handled according to the [`ErrorHandling`] strategy.
    pub async fn build(
        &self,
        catalog: &Catalog,
        source: &dyn MarkdownSource,
    ) -> Result<(DependencyGraph, BuildStats)> {
        log::info!(
            "Building dependency graph from {} {} documents via {}",
            catalog.len(),
            catalog.kind(),
            source.name()
        );

        let mut stats = BuildStats::default();
        let mut records = Vec::with_capacity(catalog.len());

        for (number, entry) in catalog.iter() {
            stats.files_processed += 1;
            let outcome = match source.fetch(&entry.markdown_path).await {
                Ok(Some(text)) => Ok(text),
                Ok(None) => Err(Error::not_found("markdown", &entry.markdown_path)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(text) => {
                    let (metadata, _) = parse_document(&text);
                    let node = GraphNode::from_metadata(number, &metadata, entry.is_erc());
                    records.push(DocumentRecord::new(node, metadata.requires));
                }
                Err(e) => self.handle_error(number, e, &mut stats)?,
            }
        }

        let graph = link_records(records, &mut stats);
        log::info!(
            "Graph built: {} nodes, {} links ({} skipped, {} dangling)",
            stats.nodes_created,
            stats.edges_created,
            stats.files_skipped,
            stats.dangling_refs.len()
        );
        Ok((graph, stats))
    }

    /// Builds the graph from records already in hand.
    pub fn from_records(
        &self,
        records: impl IntoIterator<Item = DocumentRecord>,
    ) -> (DependencyGraph, BuildStats) {
        let records: Vec<DocumentRecord> = records.into_iter().collect();
        let mut stats = BuildStats {
            files_processed: records.len(),
            ..BuildStats::default()
        };
        let graph = link_records(records, &mut stats);
        (graph, stats)
    }

    /// Builds the graph from catalog entries alone, without reading markdown.
    ///
    /// Nodes carry the catalog title and status but no type or category.
    pub fn from_catalog(&self, catalog: &Catalog) -> (DependencyGraph, BuildStats) {
        let records = catalog.iter().map(|(number, entry)| {
            let mut node = GraphNode::new(number, entry.title.clone()).with_erc(entry.is_erc());
            node.status = entry.status.clone();
            DocumentRecord::new(node, entry.requires.clone())
        });
        self.from_records(records)
    }

    fn handle_error(&self, eip_no: u32, error: Error, stats: &mut BuildStats) -> Result<()> {
        match self.error_handling {
            ErrorHandling::FailFast => return Err(error),
            ErrorHandling::Collect => {}
            ErrorHandling::Skip => {
                log::warn!("Skipping {}-{eip_no}: {error}", DocKind::Eip);
            }
        }
        stats.files_skipped += 1;
        stats.errors.push(BuildError {
            eip_no,
            message: error.to_string(),
        });
        Ok(())
    }
}

/// Phase 1 and phase 2 over collected records.
fn link_records(records: Vec<DocumentRecord>, stats: &mut BuildStats) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    // ================================================================
    // Phase 1: Add all nodes
    // ================================================================
    let mut pending: Vec<(String, Vec<u32>)> = Vec::with_capacity(records.len());
    for record in records {
        let id = record.node.id.clone();
        let before = graph.node_count();
        graph.add_node(record.node);
        if graph.node_count() > before {
            stats.nodes_created += 1;
        }
        pending.push((id, record.requires));
    }

    // ================================================================
    // Phase 2: Add all links (with dedup and dangling ref tracking)
    // ================================================================
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for (source, requires) in pending {
        for required in requires {
            let target = node_id(required);
            if !graph.contains_node(&target) {
                log::debug!("{source} requires unknown {target}");
                stats.dangling_refs.push(format!("{source} -> {target}"));
                continue;
            }
            if !seen.insert((source.clone(), target.clone())) {
                stats.deduped_edges += 1;
                continue;
            }
            if graph.add_link(&source, &target).is_ok() {
                stats.edges_created += 1;
            }
        }
    }

    graph
}

// ============================================================================
// Tests
// ============================================================================
