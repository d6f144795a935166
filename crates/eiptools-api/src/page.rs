//! Server-rendered document pages.

use std::fmt::Write as _;

use eiptools_catalog::{Catalogs, Document, NOT_FOUND_BODY};
use eiptools_content::{Status, render_document, status_color};
use eiptools_core::DocKind;

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Label a document is shown under: ERCs keep their own prefix.
pub fn display_label(kind: DocKind, is_erc: bool) -> &'static str {
    match kind {
        DocKind::Eip if is_erc => "ERC",
        other => other.label(),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn status_badge(status: &str, label: &str) -> String {
    let color = status_color(status);
    match status.parse::<Status>() {
        Ok(parsed) => format!(
            "<div class=\"status\" style=\"background:{color}\" title=\"{}\">{} {}</div>\n",
            escape_html(&parsed.description(label)),
            parsed.prefix(),
            parsed.as_str()
        ),
        Err(_) => format!(
            "<div class=\"status\" style=\"background:{color}\">{}</div>\n",
            escape_html(status)
        ),
    }
}

fn row(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "<tr><th>{name}</th><td>{value}</td></tr>");
}

/// Full page for a fetched document.
///
/// Relative links in the body resolve against the document's source URL;
/// EIP links point at the ERC repository when the catalog says so.
pub fn document_page(doc: &Document, catalogs: &Catalogs) -> String {
    let meta = &doc.metadata;
    let label = display_label(doc.kind, doc.is_erc);
    let title = doc.title();
    let mut body = String::new();

    body.push_str("<header>\n");
    body.push_str(&status_badge(meta.status_or_default(), doc.kind.label()));
    let doc_type = match (&meta.doc_type, &meta.category) {
        (Some(t), Some(c)) => Some(format!("{t}: {c}")),
        (Some(t), None) => Some(t.clone()),
        (None, Some(c)) => Some(c.clone()),
        (None, None) => None,
    };
    if let Some(doc_type) = doc_type {
        let _ = writeln!(body, "<div class=\"type\">{}</div>", escape_html(&doc_type));
    }
    let _ = writeln!(
        body,
        "<h1>{label}-{}: {}</h1>",
        doc.number,
        escape_html(&title)
    );
    if let Some(description) = &meta.description {
        let _ = writeln!(body, "<p class=\"description\">{}</p>", escape_html(description));
    }
    body.push_str("</header>\n");

    body.push_str("<table class=\"metadata\">\n");
    if !meta.author.is_empty() {
        let authors: Vec<String> = meta.author.iter().map(|a| escape_html(a)).collect();
        row(&mut body, "Authors", &authors.join(", "));
    }
    if let Some(created) = &meta.created {
        row(&mut body, "Created", &escape_html(created));
    }
    if let Some(deadline) = &meta.last_call_deadline {
        row(&mut body, "Last Call Deadline", &escape_html(deadline));
    }
    if let Some(reason) = &meta.withdrawal_reason {
        row(&mut body, "Withdrawal Reason", &escape_html(reason));
    }
    if let Some(link) = &meta.discussions_to {
        let link = escape_html(link);
        row(&mut body, "Discussion Link", &format!("<a href=\"{link}\">{link}</a>"));
    }
    if !meta.requires.is_empty() {
        let links: Vec<String> = meta
            .requires
            .iter()
            .map(|n| {
                let required = if doc.kind == DocKind::Eip && catalogs.is_erc(*n) {
                    "ERC"
                } else {
                    doc.kind.label()
                };
                format!("<a href=\"{}\">{required}-{n}</a>", doc.kind.site_path(*n))
            })
            .collect();
        row(&mut body, "Requires", &links.join(", "));
    }
    body.push_str("</table>\n");

    body.push_str("<article>\n");
    let kind = doc.kind;
    body.push_str(&render_document(&doc.markdown, &doc.markdown_url, |n| {
        kind == DocKind::Eip && catalogs.is_erc(n)
    }));
    body.push_str("</article>\n");

    let (prev, next) = catalogs.get(doc.kind).neighbors(doc.number);
    if prev.is_some() || next.is_some() {
        body.push_str("<nav>\n");
        if let Some(prev) = prev {
            let _ = writeln!(
                body,
                "<a rel=\"prev\" href=\"{}\">{}-{prev}</a>",
                doc.kind.site_path(prev),
                doc.kind.label()
            );
        }
        if let Some(next) = next {
            let _ = writeln!(
                body,
                "<a rel=\"next\" href=\"{}\">{}-{next}</a>",
                doc.kind.site_path(next),
                doc.kind.label()
            );
        }
        body.push_str("</nav>\n");
    }

    layout(&format!("{label}-{}: {title}", doc.number), &body)
}

/// Placeholder page for a document that could not be found.
pub fn not_found_page(kind: DocKind, number: u32) -> String {
    layout(
        &format!("{}-{number}", kind.label()),
        &format!("<h1>{}-{number}</h1>\n<p>{NOT_FOUND_BODY}</p>\n", kind.label()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eiptools_catalog::{Catalog, CatalogEntry};
    use eiptools_content::parse_document;

    fn entry(title: &str, is_erc: bool) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            status: Some("Final".to_string()),
            is_erc: Some(is_erc),
            pr_no: None,
            markdown_path: String::new(),
            requires: Vec::new(),
        }
    }

    fn catalogs() -> Catalogs {
        let mut eip = Catalog::new(DocKind::Eip);
        eip.insert(20, entry("Token Standard", true));
        eip.insert(1559, entry("Fee market change", false));
        eip.insert(2718, entry("Typed Transaction Envelope", false));
        Catalogs {
            eip,
            ..Catalogs::default()
        }
    }

    fn document(text: &str) -> Document {
        let (metadata, body) = parse_document(text);
        Document {
            kind: DocKind::Eip,
            number: 1559,
            is_erc: false,
            markdown_url: DocKind::Eip.raw_url(1559, false),
            metadata,
            markdown: body.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_document_page_header_and_table() {
        let doc = document(
            "---\neip: 1559\ntitle: Fee market change\ndescription: Base fee <burn>\n\
             author: Vitalik Buterin (@vbuterin), Eric Conner\nstatus: Final\ntype: Standards Track\n\
             category: Core\ncreated: 2019-04-13\nrequires: 20, 2718\n\
             discussions-to: https://ethereum-magicians.org/t/eip-1559\n---\n## Simple Summary\n",
        );
        let html = document_page(&doc, &catalogs());

        assert!(html.contains("<title>EIP-1559: Fee market change</title>"));
        assert!(html.contains("<h1>EIP-1559: Fee market change</h1>"));
        assert!(html.contains("🎉 Final"));
        assert!(html.contains("background:#2ECC71"));
        assert!(html.contains("Standards Track: Core"));
        assert!(html.contains("Base fee &lt;burn&gt;"));
        assert!(html.contains("<th>Created</th><td>2019-04-13</td>"));
        assert!(html.contains("<a href=\"/eip/20\">ERC-20</a>, <a href=\"/eip/2718\">EIP-2718</a>"));
        assert!(html.contains("<h2>Simple Summary</h2>"));
        assert!(html.contains("rel=\"prev\" href=\"/eip/20\""));
        assert!(html.contains("rel=\"next\" href=\"/eip/2718\""));
    }

    #[test]
    fn test_erc_label() {
        let mut doc = document("---\ntitle: Token Standard\nstatus: Final\n---\n");
        doc.number = 20;
        doc.is_erc = true;
        let html = document_page(&doc, &catalogs());
        assert!(html.contains("<h1>ERC-20: Token Standard</h1>"));
    }

    #[test]
    fn test_unknown_status_badge_uses_draft_color() {
        let html = status_badge("Someday", "EIP");
        assert!(html.contains("#D69E2E"));
        assert!(html.contains(">Someday<"));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found_page(DocKind::Rip, 9999);
        assert!(html.contains("<h1>RIP-9999</h1>"));
        assert!(html.contains("404: Not Found"));
    }
}
