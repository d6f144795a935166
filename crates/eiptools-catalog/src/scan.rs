//! Building catalogs from local repository checkouts.
//!
//! A checkout root holds one clone per upstream repository, named as
//! upstream (`EIPs/`, `ERCs/`, `RIPs/`, `CAIPs/`). Each document is a
//! `{prefix}-{n}.md` file in the repository's document folder.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eiptools_content::parse_document;
use eiptools_core::util::ids::number_from_path;
use eiptools_core::{DocKind, Error, Result};

use crate::catalog::{Catalog, CatalogEntry, Catalogs};

/// Document folder for `kind` inside a checkout root.
pub fn repository_folder(root: &Path, kind: DocKind, is_erc: bool) -> PathBuf {
    root.join(kind.repo_name(is_erc)).join(kind.folder(is_erc))
}

/// Catalog entries for every `{prefix}-{n}.md` file in `dir`.
///
/// Missing titles default to `{LABEL}-{n}` and missing statuses to `Draft`.
/// Files that cannot be read are skipped with a warning.
pub fn scan_repository(
    dir: &Path,
    kind: DocKind,
    is_erc: bool,
) -> Result<BTreeMap<u32, CatalogEntry>> {
    let prefix = kind.file_prefix(is_erc);
    let read_dir = std::fs::read_dir(dir).map_err(|e| Error::io_with_path(e, dir))?;

    let mut entries = BTreeMap::new();
    for dir_entry in read_dir {
        let path = match dir_entry {
            Ok(e) => e.path(),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let Some(number) = number_from_path(&path, prefix) else {
            continue;
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        let (meta, _) = parse_document(&text);
        entries.insert(
            number,
            CatalogEntry {
                title: meta.title_or_default(kind, number),
                status: Some(meta.status_or_default().to_string()),
                is_erc: (kind == DocKind::Eip).then_some(is_erc),
                pr_no: None,
                markdown_path: kind.raw_url(number, is_erc),
                requires: meta.requires,
            },
        );
    }

    log::debug!("Scanned {} {prefix} documents in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Combined EIP catalog from the EIP and ERC folders.
///
/// The ERC copy wins when a number is present in both; the EIP folder keeps
/// stubs for documents that moved.
pub fn build_eip_catalog(eip_dir: &Path, erc_dir: &Path) -> Result<BTreeMap<u32, CatalogEntry>> {
    let mut entries = scan_repository(eip_dir, DocKind::Eip, false)?;
    let ercs = scan_repository(erc_dir, DocKind::Eip, true)?;
    let moved = ercs.keys().filter(|n| entries.contains_key(n)).count();
    if moved > 0 {
        log::debug!("{moved} EIP numbers resolved to their ERC copies");
    }
    entries.extend(ercs);
    Ok(entries)
}

/// Scan every repository under a checkout root.
///
/// A repository that is not checked out leaves its catalog empty.
pub fn build_catalogs(root: &Path) -> Result<Catalogs> {
    let eip_dir = repository_folder(root, DocKind::Eip, false);
    let erc_dir = repository_folder(root, DocKind::Eip, true);

    let mut catalogs = Catalogs::default();

    if eip_dir.is_dir() && erc_dir.is_dir() {
        catalogs.eip = Catalog::from_entries(DocKind::Eip, build_eip_catalog(&eip_dir, &erc_dir)?);
    } else {
        for (dir, is_erc) in [(&eip_dir, false), (&erc_dir, true)] {
            if dir.is_dir() {
                catalogs.eip.merge(scan_repository(dir, DocKind::Eip, is_erc)?);
            } else {
                log::warn!("{} not found, skipping", dir.display());
            }
        }
    }

    for kind in [DocKind::Rip, DocKind::Caip] {
        let dir = repository_folder(root, kind, false);
        if dir.is_dir() {
            *catalogs.get_mut(kind) = Catalog::from_entries(kind, scan_repository(&dir, kind, false)?);
        } else {
            log::warn!("{} not found, skipping", dir.display());
        }
    }

    Ok(catalogs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn checkout() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let eips = repository_folder(root.path(), DocKind::Eip, false);
        let ercs = repository_folder(root.path(), DocKind::Eip, true);
        let rips = repository_folder(root.path(), DocKind::Rip, false);

        write(&eips, "eip-1559.md", "---\neip: 1559\ntitle: Fee market change\nstatus: Final\nrequires: 2718, 2930\n---\nbody");
        write(&eips, "eip-2718.md", "---\neip: 2718\ntitle: Typed Transaction Envelope\nstatus: Final\n---\n");
        write(&eips, "eip-20.md", "---\neip: 20\nstatus: Moved\n---\n");
        write(&eips, "eip-template.md", "---\ntitle: template\n---\n");
        write(&eips, "README.md", "# EIPs");
        write(&ercs, "erc-20.md", "---\neip: 20\ntitle: Token Standard\nstatus: Final\n---\n");
        write(&rips, "rip-7212.md", "no header at all");
        root
    }

    #[test]
    fn test_scan_repository_defaults() {
        let root = checkout();
        let dir = repository_folder(root.path(), DocKind::Rip, false);
        let entries = scan_repository(&dir, DocKind::Rip, false).unwrap();

        let rip = &entries[&7212];
        assert_eq!(rip.title, "RIP-7212");
        assert_eq!(rip.status.as_deref(), Some("Draft"));
        assert_eq!(rip.is_erc, None);
        assert_eq!(
            rip.markdown_path,
            "https://raw.githubusercontent.com/ethereum/RIPs/master/RIPS/rip-7212.md"
        );
    }

    #[test]
    fn test_scan_ignores_non_documents() {
        let root = checkout();
        let dir = repository_folder(root.path(), DocKind::Eip, false);
        let entries = scan_repository(&dir, DocKind::Eip, false).unwrap();
        assert_eq!(entries.keys().copied().collect::<Vec<_>>(), vec![20, 1559, 2718]);
        assert_eq!(entries[&1559].requires, vec![2718, 2930]);
    }

    #[test]
    fn test_erc_wins_over_eip_stub() {
        let root = checkout();
        let catalogs = build_catalogs(root.path()).unwrap();

        let erc20 = catalogs.eip.get(20).unwrap();
        assert_eq!(erc20.title, "Token Standard");
        assert_eq!(erc20.is_erc, Some(true));
        assert!(erc20.markdown_path.contains("/ERCs/master/ERCS/erc-20.md"));
        assert_eq!(catalogs.eip.get(1559).unwrap().is_erc, Some(false));
    }

    #[test]
    fn test_missing_repositories_stay_empty() {
        let root = checkout();
        let catalogs = build_catalogs(root.path()).unwrap();
        assert!(catalogs.caip.is_empty());
        assert_eq!(catalogs.rip.len(), 1);
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let err = scan_repository(Path::new("/nonexistent/EIPS"), DocKind::Eip, false).unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
    }
}
