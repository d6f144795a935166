//! `eiptools show`

use std::fmt::Write as _;

use eiptools_catalog::{Catalogs, Document, FetchedDocument, fetch_document};
use eiptools_content::{Status, extract_first_paragraph, render_document};
use eiptools_core::DocKind;

use super::{load_catalogs, markdown_source, parse_doc_ref};
use crate::config::EipToolsConfig;
use crate::error::Result;

/// How much of the document to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowFormat {
    Summary,
    Markdown,
    Html,
}

pub async fn run(
    config: &EipToolsConfig,
    reference: &str,
    format: ShowFormat,
    local: bool,
) -> Result<()> {
    let (kind, number) = parse_doc_ref(reference)?;
    let catalogs = load_catalogs(config)?;
    let source = markdown_source(config, local)?;

    match fetch_document(source.as_ref(), &catalogs, kind, number).await? {
        FetchedDocument::Found(doc) => {
            let out = match format {
                ShowFormat::Summary => summary(&doc),
                ShowFormat::Markdown => doc.markdown.clone(),
                ShowFormat::Html => html(&doc, &catalogs),
            };
            print!("{out}");
            Ok(())
        }
        FetchedDocument::NotFound { kind, number } => {
            Err(eiptools_core::Error::not_found(kind.label(), number.to_string()).into())
        }
    }
}

fn html(doc: &Document, catalogs: &Catalogs) -> String {
    let kind = doc.kind;
    render_document(&doc.markdown, &doc.markdown_url, |n| {
        kind == DocKind::Eip && catalogs.is_erc(n)
    })
}

/// Header fields and the opening paragraph as plain text.
pub fn summary(doc: &Document) -> String {
    let meta = &doc.metadata;
    let label = if doc.is_erc { "ERC" } else { doc.kind.label() };
    let mut out = String::new();

    let _ = writeln!(out, "{label}-{}: {}", doc.number, doc.title());
    if let Some(description) = &meta.description {
        let _ = writeln!(out, "{description}");
    }
    out.push('\n');

    let status = meta.status_or_default();
    let banner = status
        .parse::<Status>()
        .map(|s| format!("{} {status}: {}", s.prefix(), s.description(doc.kind.label())))
        .unwrap_or_else(|_| status.to_string());
    let _ = writeln!(out, "Status:     {banner}");

    let fields = [
        ("Type", meta.doc_type.clone()),
        ("Category", meta.category.clone()),
        ("Created", meta.created.clone()),
        ("Discussion", meta.discussions_to.clone()),
        (
            "Authors",
            (!meta.author.is_empty()).then(|| meta.author.join(", ")),
        ),
        (
            "Requires",
            (!meta.requires.is_empty()).then(|| {
                meta.requires
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        ),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{:<11} {value}", format!("{name}:"));
        }
    }
    let _ = writeln!(out, "Source:     {}", doc.markdown_url);

    if let Some(paragraph) = extract_first_paragraph(&doc.markdown, 400) {
        let _ = write!(out, "\n{paragraph}\n");
    }
    out
}
