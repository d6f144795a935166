//! Shareable reading-list links.
//!
//! A shared list is a query string of `kind=n1,n2` groups joined by commas,
//! e.g. `eip=1559,4844,rip=7212`. Because the groups share one separator
//! with the numbers, the first group's key is the query parameter name and
//! everything after it is that parameter's value.

use std::collections::HashMap;

use eiptools_core::DocKind;
use serde::Serialize;

use crate::bookmarks::Bookmark;
use crate::catalog::Catalogs;

/// Query parameter names that may start a shared list, in lookup order.
pub const SHARED_KEYS: [&str; 4] = ["eip", "erc", "caip", "rip"];

/// One document in a shared list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedItem {
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub eip_no: u32,
}

/// Query string for a list of bookmarks.
///
/// Bookmarks are grouped by lower-cased kind in first-seen order; untyped
/// bookmarks count as EIPs.
///
/// ```rust
/// use eiptools_catalog::{Bookmark, share_query};
/// use eiptools_core::DocKind;
///
/// let list = [
///     Bookmark::new(DocKind::Eip, 1559),
///     Bookmark::new(DocKind::Rip, 7212),
///     Bookmark::new(DocKind::Eip, 4844),
/// ];
/// assert_eq!(share_query(&list), "eip=1559,4844,rip=7212");
/// ```
pub fn share_query(bookmarks: &[Bookmark]) -> String {
    let mut groups: Vec<(DocKind, Vec<u32>)> = Vec::new();
    for bookmark in bookmarks {
        let kind = bookmark.doc_kind();
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, numbers)) => numbers.push(bookmark.eip_no),
            None => groups.push((kind, vec![bookmark.eip_no])),
        }
    }

    groups
        .iter()
        .map(|(kind, numbers)| {
            let numbers: Vec<String> = numbers.iter().map(u32::to_string).collect();
            format!("{}={}", kind.prefix(), numbers.join(","))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Full shareable URL; the bare base URL when there is nothing to share.
pub fn share_link(base_url: &str, bookmarks: &[Bookmark]) -> String {
    let base = base_url.trim_end_matches('/');
    if bookmarks.is_empty() {
        return base.to_string();
    }
    format!("{base}/shared?{}", share_query(bookmarks))
}

/// Parse the value of a shared-list parameter.
///
/// `param_key` is the kind of the leading numbers. An item of the form
/// `kind=n` switches the current kind; bare numbers inherit it. Items that
/// are not numbers or name an unknown kind are dropped.
///
/// ```rust
/// use eiptools_catalog::parse_shared;
/// use eiptools_core::DocKind;
///
/// let items = parse_shared("eip", "1559,4844,rip=7212,7560");
/// assert_eq!(items.len(), 4);
/// assert_eq!(items[3].kind, DocKind::Rip);
/// ```
pub fn parse_shared(param_key: &str, value: &str) -> Vec<SharedItem> {
    let Ok(mut current) = param_key.parse::<DocKind>() else {
        log::debug!("Unknown shared-list key '{param_key}'");
        return Vec::new();
    };

    let mut items = Vec::new();
    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let number = match raw.split_once('=') {
            Some((kind, number)) => match kind.parse::<DocKind>() {
                Ok(kind) => {
                    current = kind;
                    number
                }
                Err(_) => {
                    log::debug!("Dropping shared item '{raw}': unknown kind");
                    continue;
                }
            },
            None => raw,
        };
        match number.trim().parse::<u32>() {
            Ok(eip_no) => items.push(SharedItem {
                kind: current,
                eip_no,
            }),
            Err(_) => log::debug!("Dropping shared item '{raw}': not a number"),
        }
    }
    items
}

/// Parse a shared list from decoded query parameters.
///
/// Uses the first of [`SHARED_KEYS`] that is present.
pub fn parse_shared_params(params: &HashMap<String, String>) -> Vec<SharedItem> {
    SHARED_KEYS
        .iter()
        .find_map(|key| params.get(*key).map(|value| parse_shared(key, value)))
        .unwrap_or_default()
}

/// Bookmarks for shared items, filled in from the catalogs.
///
/// Documents missing from the catalog get `Title for {KIND}-{n}` and status
/// `Unknown`.
pub fn import_shared(items: &[SharedItem], catalogs: &Catalogs) -> Vec<Bookmark> {
    items
        .iter()
        .map(|item| {
            let entry = catalogs.get(item.kind).get(item.eip_no);
            Bookmark {
                eip_no: item.eip_no,
                kind: Some(item.kind),
                title: Some(entry.map_or_else(
                    || format!("Title for {}-{}", item.kind.label(), item.eip_no),
                    |e| e.title.clone(),
                )),
                status: Some(
                    entry
                        .and_then(|e| e.status.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalogs;

    #[test]
    fn test_share_query_untyped_is_eip() {
        let untyped = Bookmark {
            eip_no: 20,
            kind: None,
            title: None,
            status: None,
        };
        let list = [Bookmark::new(DocKind::Caip, 2), untyped];
        assert_eq!(share_query(&list), "caip=2,eip=20");
    }

    #[test]
    fn test_share_link() {
        assert_eq!(share_link("https://eip.tools/", &[]), "https://eip.tools");
        assert_eq!(
            share_link("https://eip.tools", &[Bookmark::new(DocKind::Eip, 1)]),
            "https://eip.tools/shared?eip=1"
        );
    }

    #[test]
    fn test_parse_roundtrips_share_query() {
        let list = [
            Bookmark::new(DocKind::Eip, 1559),
            Bookmark::new(DocKind::Rip, 7212),
            Bookmark::new(DocKind::Rip, 7560),
            Bookmark::new(DocKind::Caip, 2),
        ];
        let query = share_query(&list);
        let (key, value) = query.split_once('=').unwrap();
        let items = parse_shared(key, value);
        let back: Vec<(DocKind, u32)> = items.iter().map(|i| (i.kind, i.eip_no)).collect();
        assert_eq!(
            back,
            vec![
                (DocKind::Eip, 1559),
                (DocKind::Rip, 7212),
                (DocKind::Rip, 7560),
                (DocKind::Caip, 2)
            ]
        );
    }

    #[test]
    fn test_parse_erc_key_maps_to_eip() {
        let items = parse_shared("erc", "20,721");
        assert!(items.iter().all(|i| i.kind == DocKind::Eip));
    }

    #[test]
    fn test_parse_drops_bad_items() {
        let items = parse_shared("eip", "1,abc,bip=4,,2");
        let numbers: Vec<u32> = items.iter().map(|i| i.eip_no).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_parse_params_key_order() {
        let mut params = HashMap::new();
        params.insert("rip".to_string(), "7212".to_string());
        params.insert("caip".to_string(), "2".to_string());
        let items = parse_shared_params(&params);
        assert_eq!(items, vec![SharedItem { kind: DocKind::Caip, eip_no: 2 }]);

        assert!(parse_shared_params(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_import_fills_from_catalog() {
        let catalogs = sample_catalogs();
        let items = parse_shared("eip", "1559,rip=9999");
        let bookmarks = import_shared(&items, &catalogs);

        assert_eq!(bookmarks[0].title.as_deref(), Some("Fee market change"));
        assert_eq!(bookmarks[0].status.as_deref(), Some("Final"));
        assert_eq!(bookmarks[1].title.as_deref(), Some("Title for RIP-9999"));
        assert_eq!(bookmarks[1].status.as_deref(), Some("Unknown"));
    }
}
