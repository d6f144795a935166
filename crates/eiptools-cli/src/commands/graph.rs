//! `eiptools graph`

use std::path::PathBuf;

use eiptools_catalog::LocalSource;
use eiptools_graph::{
    ARTIFACT_FILE, DependencyGraph, ErrorHandling, GraphBuilder, compute_stats, load_artifact,
    referenced_by, requires, save_artifact, transitive_requires,
};

use super::{load_catalogs, parse_doc_ref};
use crate::config::EipToolsConfig;
use crate::error::Result;

fn artifact_path(config: &EipToolsConfig) -> PathBuf {
    config.data_dir().join(ARTIFACT_FILE)
}

fn load(config: &EipToolsConfig) -> Result<DependencyGraph> {
    Ok(load_artifact(&artifact_path(config))?)
}

/// Build the artifact from the EIP catalog.
///
/// Documents are read from the local checkouts unless `from_catalog` is
/// set, in which case the catalog's `requires` lists are used directly.
pub async fn build(config: &EipToolsConfig, from_catalog: bool, fail_fast: bool) -> Result<()> {
    let catalogs = load_catalogs(config)?;
    let handling = if fail_fast {
        ErrorHandling::FailFast
    } else {
        ErrorHandling::Skip
    };
    let builder = GraphBuilder::new().with_error_handling(handling);

    let (graph, stats) = if from_catalog {
        builder.from_catalog(&catalogs.eip)
    } else {
        let source = LocalSource::from_checkouts(config.checkouts_dir());
        builder.build(&catalogs.eip, &source).await?
    };

    let path = artifact_path(config);
    save_artifact(&graph, &path)?;

    println!(
        "{} nodes, {} links written to {}",
        stats.nodes_created,
        stats.edges_created,
        path.display()
    );
    if stats.files_skipped > 0 {
        println!("{} documents skipped:", stats.files_skipped);
        for error in &stats.errors {
            println!("  EIP-{}: {}", error.eip_no, error.message);
        }
    }
    if !stats.dangling_refs.is_empty() {
        println!("{} references to unknown documents dropped", stats.dangling_refs.len());
        for dangling in &stats.dangling_refs {
            log::debug!("Dangling reference {dangling}");
        }
    }
    Ok(())
}

pub fn stats(config: &EipToolsConfig, top: usize) -> Result<()> {
    let stats = compute_stats(&load(config)?, top);
    println!("Nodes: {}", stats.node_count);
    println!("Links: {}", stats.edge_count);
    println!("ERCs:  {}", stats.erc_count);
    println!("\nBy status:");
    for (status, count) in &stats.by_status {
        println!("  {status:<10} {count:>5}");
    }
    if !stats.most_referenced.is_empty() {
        println!("\nMost referenced:");
        for (node, count) in &stats.most_referenced {
            println!("  {:>5}  EIP-{}: {}", count, node.eip_no, node.title);
        }
    }
    Ok(())
}

pub fn deps(config: &EipToolsConfig, id: &str, transitive: bool) -> Result<()> {
    let (_, number) = parse_doc_ref(id)?;
    let graph = load(config)?;

    let label = |n: u32, title: &str| format!("  EIP-{n}: {title}");

    if transitive {
        let result = transitive_requires(&graph, number)?;
        println!("EIP-{number} requires (dependencies first):");
        for node in &result.ordered {
            println!("{}", label(node.eip_no, &node.title));
        }
        if result.has_cycles {
            println!("(cycle detected; listed by number)");
        }
    } else {
        println!("EIP-{number} requires:");
        for node in requires(&graph, number)? {
            println!("{}", label(node.eip_no, &node.title));
        }
    }

    println!("Referenced by:");
    for node in referenced_by(&graph, number)? {
        println!("{}", label(node.eip_no, &node.title));
    }
    Ok(())
}
