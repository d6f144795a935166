//! `eiptools bookmarks`

use std::collections::HashMap;

use eiptools_catalog::{
    Bookmark, BookmarkList, Catalogs, FileKvStore, KvStore, SharedItem, import_shared,
    parse_shared_params, share_link,
};

use super::{load_catalogs, parse_doc_ref};
use crate::cli::BookmarkAction;
use crate::config::EipToolsConfig;
use crate::error::Result;

pub fn run(config: &EipToolsConfig, action: BookmarkAction) -> Result<()> {
    let list = BookmarkList::new(FileKvStore::new(config.bookmarks_path()));
    let catalogs = load_catalogs(config)?;
    for line in apply(&list, &catalogs, &config.server.site_url, action)? {
        println!("{line}");
    }
    Ok(())
}

/// Run `action` against `list` and return the lines to print.
pub fn apply<S: KvStore>(
    list: &BookmarkList<S>,
    catalogs: &Catalogs,
    site_url: &str,
    action: BookmarkAction,
) -> Result<Vec<String>> {
    let lines = match action {
        BookmarkAction::List => {
            let bookmarks = list.list()?;
            if bookmarks.is_empty() {
                vec!["No bookmarks".to_string()]
            } else {
                bookmarks.iter().map(describe).collect()
            }
        }
        BookmarkAction::Add { reference } => {
            let (kind, number) = parse_doc_ref(&reference)?;
            let filled = import_shared(&[SharedItem { kind, eip_no: number }], catalogs);
            let label = format!("{kind}-{number}");
            let added = match filled.into_iter().next() {
                Some(bookmark) => list.add(bookmark)?,
                None => list.add(Bookmark::new(kind, number))?,
            };
            if added {
                vec![format!("Bookmarked {label}")]
            } else {
                vec![format!("{label} is already bookmarked")]
            }
        }
        BookmarkAction::Remove { reference } => {
            let (kind, number) = parse_doc_ref(&reference)?;
            if list.remove(kind, number)? {
                vec![format!("Removed {kind}-{number}")]
            } else {
                vec![format!("{kind}-{number} was not bookmarked")]
            }
        }
        BookmarkAction::Clear => {
            list.clear()?;
            vec!["Cleared all bookmarks".to_string()]
        }
        BookmarkAction::Share => vec![share_link(site_url, &list.list()?)],
        BookmarkAction::Import { link } => {
            let items = parse_shared_params(&query_params(&link));
            let added = list.extend(import_shared(&items, catalogs))?;
            vec![format!(
                "Imported {added} of {} shared documents",
                items.len()
            )]
        }
    };
    Ok(lines)
}

fn describe(bookmark: &Bookmark) -> String {
    let mut line = format!("{}-{}", bookmark.doc_kind(), bookmark.eip_no);
    if let Some(title) = &bookmark.title {
        line.push_str(": ");
        line.push_str(title);
    }
    if let Some(status) = &bookmark.status {
        line.push_str(&format!(" [{status}]"));
    }
    line
}

/// Query parameters of a link or bare query string.
///
/// Only the first `=` of each `&`-separated pair splits key from value,
/// so `eip=1559,rip=7212` keeps the `rip=` group in the value.
fn query_params(link: &str) -> HashMap<String, String> {
    let query = link.split_once('?').map_or(link, |(_, q)| q);
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim().to_lowercase(), v.to_string()))
        .collect()
}
