//! Document kinds and their upstream locations.
//!
//! ERCs share the EIP number space, so they are represented as
//! [`DocKind::Eip`] with an `is_erc` flag wherever the distinction matters
//! (raw URLs, file prefixes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of standards document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocKind {
    /// Ethereum Improvement Proposal (including ERCs).
    Eip,
    /// Rollup Improvement Proposal.
    Rip,
    /// Chain Agnostic Improvement Proposal.
    Caip,
}

impl DocKind {
    /// All kinds, in redirect lookup order.
    pub const ALL: [DocKind; 3] = [DocKind::Eip, DocKind::Rip, DocKind::Caip];

    /// Lowercase prefix used in file names and site paths.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Eip => "eip",
            Self::Rip => "rip",
            Self::Caip => "caip",
        }
    }

    /// Uppercase label (`EIP`, `RIP`, `CAIP`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eip => "EIP",
            Self::Rip => "RIP",
            Self::Caip => "CAIP",
        }
    }

    /// File prefix inside the upstream repository.
    pub fn file_prefix(&self, is_erc: bool) -> &'static str {
        match self {
            Self::Eip if is_erc => "erc",
            other => other.prefix(),
        }
    }

    /// Upstream repository name, which is also the checkout directory name.
    pub fn repo_name(&self, is_erc: bool) -> &'static str {
        match self {
            Self::Eip if is_erc => "ERCs",
            Self::Eip => "EIPs",
            Self::Rip => "RIPs",
            Self::Caip => "CAIPs",
        }
    }

    /// Folder holding the documents inside the repository.
    pub fn folder(&self, is_erc: bool) -> &'static str {
        match self {
            Self::Eip if is_erc => "ERCS",
            Self::Eip => "EIPS",
            Self::Rip => "RIPS",
            Self::Caip => "CAIPs",
        }
    }

    /// GitHub organisation owning the upstream repository.
    pub fn owner(&self) -> &'static str {
        match self {
            Self::Caip => "ChainAgnostic",
            _ => "ethereum",
        }
    }

    /// Default branch of the upstream repository.
    pub fn default_branch(&self) -> &'static str {
        match self {
            Self::Caip => "main",
            _ => "master",
        }
    }

    /// Raw-content URL of the repository root, with trailing slash.
    pub fn raw_base(&self, is_erc: bool) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/",
            self.owner(),
            self.repo_name(is_erc),
            self.default_branch()
        )
    }

    /// Raw-content URL of a document's markdown file.
    ///
    /// ```
    /// use eiptools_core::DocKind;
    ///
    /// assert_eq!(
    ///     DocKind::Eip.raw_url(1559, false),
    ///     "https://raw.githubusercontent.com/ethereum/EIPs/master/EIPS/eip-1559.md"
    /// );
    /// assert_eq!(
    ///     DocKind::Eip.raw_url(20, true),
    ///     "https://raw.githubusercontent.com/ethereum/ERCs/master/ERCS/erc-20.md"
    /// );
    /// ```
    pub fn raw_url(&self, number: u32, is_erc: bool) -> String {
        format!(
            "{}{}/{}-{number}.md",
            self.raw_base(is_erc),
            self.folder(is_erc),
            self.file_prefix(is_erc)
        )
    }

    /// Site path for a document, e.g. `/rip/7212`.
    pub fn site_path(&self, number: u32) -> String {
        format!("/{}/{number}", self.prefix())
    }

    /// Name of the catalog file holding this kind's valid documents.
    pub fn catalog_file(&self) -> &'static str {
        match self {
            Self::Eip => "valid-eips.json",
            Self::Rip => "valid-rips.json",
            Self::Caip => "valid-caips.json",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocKind {
    type Err = Error;

    /// Parses a kind case-insensitively. `erc` maps to [`DocKind::Eip`].
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "eip" | "erc" => Ok(Self::Eip),
            "rip" => Ok(Self::Rip),
            "caip" => Ok(Self::Caip),
            other => Err(Error::invalid_input(format!(
                "unknown document kind '{other}'"
            ))),
        }
    }
}
