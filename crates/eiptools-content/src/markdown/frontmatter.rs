//! Front-matter splitting for standards documents.
//!
//! EIP-style documents open with a header block between two dash lines:
//!
//! ```markdown
//! ---
//! eip: 1559
//! title: Fee market change for ETH 1.0 chain
//! requires: 2718, 2930
//! ---
//!
//! ## Abstract
//! ```
//!
//! The block is not valid YAML in general (author lists contain `<` and `@`,
//! titles contain `:`), so it is kept as raw text here and parsed line by
//! line in [`crate::metadata`].

use std::sync::LazyLock;

use regex::Regex;

/// Opening delimiter at the very start, lazy header, closing delimiter line.
///
/// Delimiter lines tolerate stray spaces and extra dashes; CRLF is accepted.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[- ]*---[ -]*\r?\n([\s\S]*?)\r?\n[ -]*---[ -]*\r?\n([\s\S]*)")
        .expect("front-matter pattern is valid")
});

/// A document split into its header block and markdown body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    metadata: &'a str,
    body: &'a str,
}

impl<'a> Frontmatter<'a> {
    /// Raw header text between the delimiters, without the delimiter lines.
    ///
    /// Empty when the document has no header block.
    pub fn metadata(&self) -> &'a str {
        self.metadata
    }

    /// Markdown after the closing delimiter, or the whole text.
    pub fn body(&self) -> &'a str {
        self.body
    }

    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }
}

/// Split `text` into header and body.
///
/// When no delimited block opens the text, metadata is empty and the body is
/// the full text.
///
/// ```rust
/// use eiptools_content::extract_metadata;
///
/// let doc = "---\neip: 20\ntitle: Token Standard\n---\n## Simple Summary\n";
/// let split = extract_metadata(doc);
/// assert_eq!(split.metadata(), "eip: 20\ntitle: Token Standard");
/// assert_eq!(split.body(), "## Simple Summary\n");
///
/// let plain = extract_metadata("# No header");
/// assert!(!plain.has_metadata());
/// assert_eq!(plain.body(), "# No header");
/// ```
pub fn extract_metadata(text: &str) -> Frontmatter<'_> {
    match HEADER_RE.captures(text) {
        Some(caps) => Frontmatter {
            metadata: caps.get(1).map_or("", |m| m.as_str()),
            body: caps.get(2).map_or("", |m| m.as_str()),
        },
        None => {
            if text.trim_start().starts_with("---") {
                log::debug!("Header delimiter found but block is not closed");
            }
            Frontmatter {
                metadata: "",
                body: text,
            }
        }
    }
}

/// Body of `text` with any header block removed.
pub fn strip_metadata(text: &str) -> &str {
    extract_metadata(text).body()
}
