//! Markdown rendering and structure extraction.
//!
//! Rendering uses the GitHub-flavoured extensions the upstream documents
//! rely on (tables, footnotes, strikethrough, task lists). The extraction
//! helpers strip inline formatting and return plain strings.
//!
//! ```rust
//! use eiptools_content::markdown::parser::{extract_first_heading, extract_first_paragraph};
//! use pulldown_cmark::HeadingLevel;
//!
//! let body = "## Abstract\n\nA new transaction type with **blobs**.\n\n## Motivation";
//!
//! let (level, text) = extract_first_heading(body).unwrap();
//! assert_eq!(level, HeadingLevel::H2);
//! assert_eq!(text, "Abstract");
//!
//! assert_eq!(
//!     extract_first_paragraph(body, 200).unwrap(),
//!     "A new transaction type with blobs."
//! );
//! ```

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use super::helpers::rewrite_relative_links;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Render a markdown body to HTML, leaving link targets untouched.
///
/// ```rust
/// use eiptools_content::render_html;
///
/// let html = render_html("| a |\n|---|\n| 1 |");
/// assert!(html.contains("<table>"));
/// ```
pub fn render_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options()));
    out
}

/// Render a document body fetched from `markdown_url`.
///
/// Links to other documents become site paths; relative links and images
/// resolve against the source URL. `is_erc` reports whether a document
/// number lives in the ERC repository.
pub fn render_document<F>(markdown: &str, markdown_url: &str, is_erc: F) -> String
where
    F: Fn(u32) -> bool + Copy,
{
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    let events = rewrite_relative_links(
        Parser::new_ext(markdown, options()),
        markdown_url,
        is_erc,
    );
    html::push_html(&mut out, events);
    out
}

/// First heading of any level, with inline formatting removed.
pub fn extract_first_heading(content: &str) -> Option<(HeadingLevel, String)> {
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new_ext(content, options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => current = Some((level, String::new())),
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some((level, text.to_string()));
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    None
}

/// First non-empty paragraph outside headings, truncated to `max_chars`.
///
/// Truncation happens at a word boundary and appends `...`.
pub fn extract_first_paragraph(content: &str, max_chars: usize) -> Option<String> {
    let mut buf: Option<String> = None;

    for event in Parser::new_ext(content, options()) {
        match event {
            Event::Start(Tag::Paragraph) => buf = Some(String::new()),
            Event::End(TagEnd::Paragraph) => {
                if let Some(text) = buf.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some(truncate_text(text, max_chars));
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(b) = buf.as_mut() {
                    b.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(b) = buf.as_mut() {
                    b.push(' ');
                }
            }
            _ => {}
        }
    }

    None
}

/// Plain text of a markdown body, code blocks excluded.
///
/// Whitespace is collapsed to single spaces.
pub fn extract_text_content(content: &str) -> String {
    let mut text = String::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(content, options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) | Event::Code(t) if !in_code_block => {
                text.push(' ');
                text.push_str(&t);
            }
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_)) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    let head = &text[..cut];
    let head = head.rfind(char::is_whitespace).map_or(head, |i| &head[..i]);
    format!("{}...", head.trim_end())
}
