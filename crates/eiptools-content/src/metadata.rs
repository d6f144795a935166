//! Structured document metadata parsed from the header block.

use std::collections::BTreeMap;

use eiptools_core::DocKind;
use serde::{Deserialize, Serialize};

use crate::markdown::frontmatter::extract_metadata;
use crate::markdown::helpers::{leading_number, parse_comma_list, parse_number_list};

/// Header fields of a standards document.
///
/// Serializes with the header's own key names (`discussions-to`,
/// `last-call-deadline`). Keys not listed here are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentMetadata {
    /// Document number from the `eip`, `rip` or `caip` key.
    #[serde(rename = "eip", alias = "rip", alias = "caip", skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussions_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_call_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_reason: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl DocumentMetadata {
    /// Title, or `{LABEL}-{n}` when the header has none.
    pub fn title_or_default(&self, kind: DocKind, number: u32) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{}-{number}", kind.label()))
    }

    /// Status, or `Draft` when the header has none.
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or("Draft")
    }

    /// `true` for Standards Track documents in the ERC category.
    pub fn is_erc_category(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("erc"))
    }
}

/// Parse a raw header block into [`DocumentMetadata`].
///
/// Each line splits at its first `": "`. Lines without a separator, or
/// whose value is empty, are skipped. Everything after the separator is the
/// value, so titles may contain further colons.
///
/// ```rust
/// use eiptools_content::parse_metadata;
///
/// let meta = parse_metadata("eip: 1559\ntitle: Fee market change\nrequires: 2718, 2930");
/// assert_eq!(meta.number, Some(1559));
/// assert_eq!(meta.title.as_deref(), Some("Fee market change"));
/// assert_eq!(meta.requires, vec![2718, 2930]);
/// ```
pub fn parse_metadata(metadata_text: &str) -> DocumentMetadata {
    let mut meta = DocumentMetadata::default();

    for line in metadata_text.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }

        match key {
            "eip" | "rip" | "caip" => meta.number = leading_number(value),
            "requires" => meta.requires = parse_number_list(value),
            "author" => meta.author = parse_comma_list(value),
            "title" => meta.title = Some(value.to_string()),
            "description" => meta.description = Some(value.to_string()),
            "discussions-to" => meta.discussions_to = Some(value.to_string()),
            "status" => meta.status = Some(value.to_string()),
            "type" => meta.doc_type = Some(value.to_string()),
            "category" => meta.category = Some(value.to_string()),
            "created" => meta.created = Some(value.to_string()),
            "last-call-deadline" => meta.last_call_deadline = Some(value.to_string()),
            "withdrawal-reason" => meta.withdrawal_reason = Some(value.to_string()),
            other => {
                meta.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    meta
}

/// Split a whole document and parse its header.
///
/// Returns the metadata and the markdown body.
pub fn parse_document(text: &str) -> (DocumentMetadata, &str) {
    let split = extract_metadata(text);
    (parse_metadata(split.metadata()), split.body())
}
