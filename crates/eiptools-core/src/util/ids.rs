//! Document number and graph ID utilities.
//!
//! Route segments arrive as `eip-1559`, `eip-1559.md` or plain `1559`; file
//! names look like `erc-20.md`; graph nodes are identified as `eip-{n}`.
//! These helpers convert between the forms.

use std::path::Path;

use crate::{Error, Result};

/// Extract a document number from a route segment.
///
/// Accepts `{prefix}-{digits}`, `{prefix}-{digits}.md`, or bare `{digits}`.
///
/// # Examples
///
/// ```
/// use eiptools_core::util::ids::extract_doc_number;
///
/// assert_eq!(extract_doc_number("eip-1559", "eip").unwrap(), 1559);
/// assert_eq!(extract_doc_number("eip-1559.md", "eip").unwrap(), 1559);
/// assert_eq!(extract_doc_number("4844", "eip").unwrap(), 4844);
/// assert!(extract_doc_number("rip-7212", "eip").is_err());
/// ```
pub fn extract_doc_number(input: &str, prefix: &str) -> Result<u32> {
    let digits = match input.strip_prefix(prefix).and_then(|s| s.strip_prefix('-')) {
        Some(rest) => rest.strip_suffix(".md").unwrap_or(rest),
        None => input,
    };

    parse_digits(digits).ok_or_else(|| {
        Error::invalid_input(format!("invalid {} format: '{input}'", prefix.to_uppercase()))
    })
}

/// Graph node ID for a document number.
///
/// ```
/// assert_eq!(eiptools_core::node_id(721), "eip-721");
/// ```
pub fn node_id(number: u32) -> String {
    format!("eip-{number}")
}

/// Parse a graph node ID back into its document number.
///
/// ```
/// use eiptools_core::parse_node_id;
///
/// assert_eq!(parse_node_id("eip-721"), Some(721));
/// assert_eq!(parse_node_id("721"), None);
/// ```
pub fn parse_node_id(id: &str) -> Option<u32> {
    id.strip_prefix("eip-").and_then(parse_digits)
}

/// Document number from a `{prefix}-{n}.md` file path.
///
/// Returns `None` for files that don't follow the naming scheme.
///
/// ```
/// use std::path::Path;
/// use eiptools_core::util::ids::number_from_path;
///
/// assert_eq!(number_from_path(Path::new("EIPS/eip-20.md"), "eip"), Some(20));
/// assert_eq!(number_from_path(Path::new("EIPS/eip-20.txt"), "eip"), None);
/// assert_eq!(number_from_path(Path::new("ERCS/erc-20.md"), "eip"), None);
/// ```
pub fn number_from_path(path: &Path, prefix: &str) -> Option<u32> {
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.strip_prefix(prefix))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(parse_digits)
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
