//! The valid-document catalog.
//!
//! One JSON file per [`DocKind`] maps document numbers to [`CatalogEntry`]
//! records. The files are regenerated offline from repository checkouts and
//! loaded once at server start.

use std::collections::BTreeMap;
use std::path::Path;

use eiptools_core::DocKind;
use eiptools_core::Result;
use eiptools_core::util::files::{read_json_or_default, write_json};
use serde::{Deserialize, Serialize};

/// A catalog record for one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Set for EIP-numbered documents; `true` when they live in the ERC repository.
    #[serde(rename = "isERC", default, skip_serializing_if = "Option::is_none")]
    pub is_erc: Option<bool>,
    /// Pull request number for documents that only exist in an open PR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_no: Option<u32>,
    /// Raw-content URL of the markdown file.
    pub markdown_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<u32>,
}

impl CatalogEntry {
    pub fn is_erc(&self) -> bool {
        self.is_erc.unwrap_or(false)
    }

    pub fn status_or_unknown(&self) -> &str {
        self.status.as_deref().unwrap_or("Unknown")
    }
}

/// Catalog of one document kind, ordered by number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    kind: DocKind,
    entries: BTreeMap<u32, CatalogEntry>,
}

impl Catalog {
    pub fn new(kind: DocKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries(kind: DocKind, entries: BTreeMap<u32, CatalogEntry>) -> Self {
        Self { kind, entries }
    }

    /// Load a catalog file; a missing file is an empty catalog.
    pub fn load(kind: DocKind, path: &Path) -> Result<Self> {
        let entries = read_json_or_default(path)?;
        Ok(Self { kind, entries })
    }

    /// Write the catalog as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, &self.entries)
    }

    pub fn kind(&self) -> DocKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, number: u32) -> Option<&CatalogEntry> {
        self.entries.get(&number)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.entries.contains_key(&number)
    }

    pub fn insert(&mut self, number: u32, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(number, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CatalogEntry)> {
        self.entries.iter().map(|(n, e)| (*n, e))
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> &BTreeMap<u32, CatalogEntry> {
        &self.entries
    }

    /// Merge `incoming` into this catalog.
    ///
    /// Incoming entries replace existing ones with the same number; other
    /// existing entries are kept. Returns how many numbers were new.
    pub fn merge(&mut self, incoming: BTreeMap<u32, CatalogEntry>) -> usize {
        let mut added = 0;
        for (number, entry) in incoming {
            if self.entries.insert(number, entry).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Closest catalogued numbers before and after `number`.
    pub fn neighbors(&self, number: u32) -> (Option<u32>, Option<u32>) {
        let prev = self.entries.range(..number).next_back().map(|(n, _)| *n);
        let next = self
            .entries
            .range(number.saturating_add(1)..)
            .next()
            .map(|(n, _)| *n);
        (prev, next)
    }
}

/// The EIP, RIP and CAIP catalogs together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogs {
    pub eip: Catalog,
    pub rip: Catalog,
    pub caip: Catalog,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            eip: Catalog::new(DocKind::Eip),
            rip: Catalog::new(DocKind::Rip),
            caip: Catalog::new(DocKind::Caip),
        }
    }
}

impl Catalogs {
    /// Load `valid-eips.json`, `valid-rips.json` and `valid-caips.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let load = |kind: DocKind| {
            let catalog = Catalog::load(kind, &dir.join(kind.catalog_file()))?;
            log::debug!("Loaded {} {} catalog entries", catalog.len(), kind);
            Ok::<_, eiptools_core::Error>(catalog)
        };
        Ok(Self {
            eip: load(DocKind::Eip)?,
            rip: load(DocKind::Rip)?,
            caip: load(DocKind::Caip)?,
        })
    }

    /// Write all three catalog files into `dir`.
    pub fn save_dir(&self, dir: &Path) -> Result<()> {
        for kind in DocKind::ALL {
            self.get(kind).save(&dir.join(kind.catalog_file()))?;
        }
        Ok(())
    }

    pub fn get(&self, kind: DocKind) -> &Catalog {
        match kind {
            DocKind::Eip => &self.eip,
            DocKind::Rip => &self.rip,
            DocKind::Caip => &self.caip,
        }
    }

    pub fn get_mut(&mut self, kind: DocKind) -> &mut Catalog {
        match kind {
            DocKind::Eip => &mut self.eip,
            DocKind::Rip => &mut self.rip,
            DocKind::Caip => &mut self.caip,
        }
    }

    /// Kind a bare number redirects to: EIP first, then RIP, then CAIP.
    pub fn resolve_kind(&self, number: u32) -> Option<DocKind> {
        DocKind::ALL
            .into_iter()
            .find(|kind| self.get(*kind).contains(number))
    }

    /// `true` when EIP `number` is catalogued as living in the ERC repository.
    pub fn is_erc(&self, number: u32) -> bool {
        self.eip.get(number).is_some_and(CatalogEntry::is_erc)
    }

    /// Merge every catalog of `incoming` into this set, kind by kind.
    ///
    /// Returns how many numbers were new across all kinds.
    pub fn merge(&mut self, incoming: Catalogs) -> usize {
        let Catalogs { eip, rip, caip } = incoming;
        [eip, rip, caip]
            .into_iter()
            .map(|catalog| {
                let kind = catalog.kind();
                self.get_mut(kind).merge(catalog.entries)
            })
            .sum()
    }

    /// Entry counts keyed by kind label.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        DocKind::ALL
            .into_iter()
            .map(|kind| (kind.label(), self.get(kind).len()))
            .collect()
    }
}
