//! `eiptools index`

use std::path::{Path, PathBuf};

use eiptools_catalog::{
    Catalogs, GithubPulls, HttpSource, MarkdownSource, PullRequestApi, build_catalogs,
    scan_all_open_prs,
};
use eiptools_core::util::paths::expand_tilde;

use crate::config::EipToolsConfig;
use crate::error::Result;

/// Where work-in-progress documents are discovered.
pub struct WipSources<'a> {
    pub pulls: &'a dyn PullRequestApi,
    pub markdown: &'a dyn MarkdownSource,
}

/// Update the catalog files in the data directory.
///
/// With `prs`, open pull requests on GitHub are scanned as well.
pub async fn run(
    config: &EipToolsConfig,
    checkouts: Option<&str>,
    prs: bool,
    github_token: Option<String>,
) -> Result<()> {
    let root: PathBuf = checkouts.map_or_else(|| config.checkouts_dir(), expand_tilde);

    if !prs {
        return update(config, &root, None).await;
    }
    if github_token.is_none() {
        log::warn!("GITHUB_TOKEN not set; the PR scan may hit the rate limit");
    }
    let pulls = GithubPulls::new(config.fetch_timeout(), github_token)?;
    let markdown = HttpSource::new(config.fetch_timeout())?;
    let wip = WipSources {
        pulls: &pulls,
        markdown: &markdown,
    };
    update(config, &root, Some(wip)).await
}

/// Merge new entries into the existing catalogs and write them back.
///
/// Existing entries are kept. WIP entries are merged before the checkout
/// scan, so a document that has landed upstream replaces its PR entry.
pub async fn update(config: &EipToolsConfig, root: &Path, wip: Option<WipSources<'_>>) -> Result<()> {
    let data_dir = config.data_dir();
    let mut catalogs = Catalogs::load_dir(&data_dir)?;
    let before: usize = catalogs.counts().values().sum();

    if let Some(wip) = wip {
        let open = scan_all_open_prs(wip.pulls, wip.markdown).await?;
        let added = catalogs.merge(open);
        log::info!("{added} new WIP documents from open pull requests");
    }

    log::info!("Scanning checkouts under {}", root.display());
    catalogs.merge(build_catalogs(root)?);
    catalogs.save_dir(&data_dir)?;

    let after: usize = catalogs.counts().values().sum();
    for (kind, count) in catalogs.counts() {
        println!("{kind:<5} {count:>5} documents");
    }
    println!(
        "Catalogs written to {} ({} new)",
        data_dir.display(),
        after.saturating_sub(before)
    );
    Ok(())
}
