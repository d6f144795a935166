//! Fetching a single document by kind and number.

use eiptools_content::{DocumentMetadata, parse_document};
use eiptools_core::{DocKind, Result};
use serde::Serialize;

use crate::catalog::Catalogs;
use crate::source::MarkdownSource;

/// A fetched and parsed document.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub kind: DocKind,
    pub number: u32,
    #[serde(rename = "isERC")]
    pub is_erc: bool,
    /// URL the markdown was read from.
    pub markdown_url: String,
    pub metadata: DocumentMetadata,
    pub markdown: String,
}

impl Document {
    pub fn title(&self) -> String {
        self.metadata.title_or_default(self.kind, self.number)
    }
}

/// Outcome of a document fetch. A missing document is not an error.
#[derive(Clone, Debug)]
pub enum FetchedDocument {
    Found(Box<Document>),
    NotFound { kind: DocKind, number: u32 },
}

impl FetchedDocument {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Found(doc) => Some(doc),
            Self::NotFound { .. } => None,
        }
    }
}

/// Fetch document `number` of `kind`.
///
/// A catalogued document is read from its recorded path. An EIP missing
/// from the catalog is tried in the ERC repository first, then in the EIP
/// repository. Other kinds use their standard raw URL.
pub async fn fetch_document(
    source: &dyn MarkdownSource,
    catalogs: &Catalogs,
    kind: DocKind,
    number: u32,
) -> Result<FetchedDocument> {
    let candidates: Vec<(String, bool)> = match catalogs.get(kind).get(number) {
        Some(entry) => vec![(entry.markdown_path.clone(), entry.is_erc())],
        None if kind == DocKind::Eip => vec![
            (kind.raw_url(number, true), true),
            (kind.raw_url(number, false), false),
        ],
        None => vec![(kind.raw_url(number, false), false)],
    };

    for (url, is_erc) in candidates {
        log::debug!("Fetching {kind}-{number} from {url} via {}", source.name());
        if let Some(text) = source.fetch(&url).await? {
            let (metadata, body) = parse_document(&text);
            return Ok(FetchedDocument::Found(Box::new(Document {
                kind,
                number,
                is_erc,
                markdown_url: url,
                metadata,
                markdown: body.to_string(),
            })));
        }
    }

    log::info!("{kind}-{number} not found");
    Ok(FetchedDocument::NotFound { kind, number })
}
