//! Content processing for Ethereum standards documents.
//!
//! Upstream documents are markdown files with a dash-delimited header
//! block. This crate splits the header from the body, parses the header
//! into [`DocumentMetadata`], renders bodies to HTML, and knows how each
//! lifecycle [`Status`] is presented.
//!
//! # Example
//!
//! ```rust
//! use eiptools_content::{parse_document, render_html};
//!
//! let text = "---\neip: 7\ntitle: DELEGATECALL\nstatus: Final\n---\n## Abstract\n\nAdds an opcode.\n";
//! let (meta, body) = parse_document(text);
//! assert_eq!(meta.number, Some(7));
//! assert!(render_html(body).contains("<h2>Abstract</h2>"));
//! ```

pub mod markdown;
pub mod metadata;
pub mod status;

pub use markdown::{
    Frontmatter, extract_first_heading, extract_first_paragraph, extract_metadata,
    extract_text_content, parse_comma_list, parse_number_list, render_document, render_html,
    rewrite_relative_links, strip_metadata,
};
pub use metadata::{DocumentMetadata, parse_document, parse_metadata};
pub use status::{Status, status_color};

pub use pulldown_cmark::HeadingLevel;
