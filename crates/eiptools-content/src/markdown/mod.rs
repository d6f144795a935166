//! Markdown handling for standards documents.
//!
//! - [`frontmatter`]: header block splitting
//! - [`parser`]: HTML rendering, heading/paragraph/text extraction
//! - [`helpers`]: comma lists, numbers, link resolution

pub mod frontmatter;
pub mod helpers;
pub mod parser;

pub use frontmatter::{Frontmatter, extract_metadata, strip_metadata};
pub use helpers::{
    is_relative_url, leading_number, parse_comma_list, parse_number_list, resolve_relative_url,
    rewrite_relative_links,
};
pub use parser::{
    extract_first_heading, extract_first_paragraph, extract_text_content, render_document,
    render_html,
};
