//! Implementations of the `eiptools` subcommands.

pub mod bookmarks;
pub mod graph;
pub mod index;
pub mod serve;
pub mod show;
pub mod webhook;

use std::sync::Arc;

use eiptools_catalog::{Catalogs, HttpSource, LocalSource, MarkdownSource};
use eiptools_core::{DocKind, extract_doc_number};

use crate::config::EipToolsConfig;
use crate::error::{Error, Result};

/// Parse `1559`, `eip-1559`, `erc-20`, `rip-7212` or `caip-2`.
///
/// Bare numbers are EIPs; `erc-` references are EIPs too.
pub fn parse_doc_ref(input: &str) -> Result<(DocKind, u32)> {
    let input = input.trim().to_lowercase();
    let invalid = || Error::InvalidReference(input.clone());
    let (kind, prefix) = match input.split_once('-') {
        Some((prefix, _)) => (prefix.parse::<DocKind>().map_err(|_| invalid())?, prefix),
        None => (DocKind::Eip, "eip"),
    };
    let number = extract_doc_number(&input, prefix).map_err(|_| invalid())?;
    Ok((kind, number))
}

/// Catalogs from the data directory; missing files give empty catalogs.
pub fn load_catalogs(config: &EipToolsConfig) -> Result<Catalogs> {
    Ok(Catalogs::load_dir(&config.data_dir())?)
}

/// Markdown source: local checkouts, or upstream over HTTP.
pub fn markdown_source(config: &EipToolsConfig, local: bool) -> Result<Arc<dyn MarkdownSource>> {
    if local {
        let root = config.checkouts_dir();
        log::debug!("Reading markdown from checkouts under {}", root.display());
        Ok(Arc::new(LocalSource::from_checkouts(root)))
    } else {
        Ok(Arc::new(HttpSource::new(config.fetch_timeout())?))
    }
}
