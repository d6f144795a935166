//! Value parsing and link resolution helpers.
//!
//! Header values are comma lists of names or numbers; document bodies link
//! to sibling documents (`./eip-2718.md`) and to assets relative to the
//! markdown file (`../assets/eip-4844/blob.png`). The link helpers turn the
//! former into site paths and the latter into absolute raw-content URLs.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Tag};
use regex::Regex;

static DOC_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:eip|erc)-(\d+)(?:\.md)?$").expect("document link pattern is valid")
});

static ASSET_DIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(assets/)?eip-(\d+)/").expect("asset directory pattern is valid")
});

static IMAGE_EXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|svg|webp|avif)$").expect("image extension pattern is valid")
});

const RAW_HOST: &str = "https://raw.githubusercontent.com/";

/// Split a comma-separated value into trimmed, non-empty items.
///
/// ```rust
/// use eiptools_content::parse_comma_list;
///
/// assert_eq!(
///     parse_comma_list("Vitalik Buterin (@vbuterin), Eric Conner (@econoar)"),
///     vec!["Vitalik Buterin (@vbuterin)", "Eric Conner (@econoar)"]
/// );
/// ```
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Leading unsigned integer of `input`, ignoring surrounding whitespace.
///
/// Trailing garbage is ignored (`"155 (draft)"` is 155); input without
/// leading digits, or a negative number, yields `None`.
pub fn leading_number(input: &str) -> Option<u32> {
    let s = input.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse a comma list of document numbers, dropping non-numeric items.
///
/// ```rust
/// use eiptools_content::parse_number_list;
///
/// assert_eq!(parse_number_list("155, 2718,TBD, 2930"), vec![155, 2718, 2930]);
/// ```
pub fn parse_number_list(input: &str) -> Vec<u32> {
    input.split(',').filter_map(leading_number).collect()
}

/// `true` unless `url` has a scheme (`https:`, `mailto:`) or is
/// protocol-relative (`//host/...`).
pub fn is_relative_url(url: &str) -> bool {
    if url.starts_with("//") {
        return false;
    }
    match url.find(':') {
        Some(pos) => {
            let scheme = &url[..pos];
            scheme.is_empty()
                || !scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => true,
    }
}

/// Site path for a link to another document, if `url` points at one.
///
/// The last path segment must be `eip-N`, `erc-N` or either with `.md`.
///
/// ```rust
/// use eiptools_content::markdown::helpers::doc_link;
///
/// assert_eq!(doc_link("./eip-2718.md").as_deref(), Some("/eip/2718"));
/// assert_eq!(doc_link("https://eips.ethereum.org/EIPS/eip-1559").as_deref(), Some("/eip/1559"));
/// assert_eq!(doc_link("../assets/eip-4844/blob.png"), None);
/// ```
pub fn doc_link(url: &str) -> Option<String> {
    let path = url.split(['#', '?']).next().unwrap_or(url);
    let last = path.rsplit('/').next()?;
    let caps = DOC_LINK_RE.captures(last)?;
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;
    Some(format!("/eip/{number}"))
}

/// Resolve a relative `url` found in the document at `markdown_url`.
///
/// Absolute URLs, fragment-only links and links into other documents are
/// left to the caller. For raw-content hosts the result is
/// `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`;
/// images use `refs/heads/{branch}` and, when `is_erc` says the document
/// moved to the ERC repository, an `eip-N` asset folder becomes `erc-N`.
pub fn resolve_relative_url<F>(markdown_url: &str, url: &str, is_erc: F) -> String
where
    F: Fn(u32) -> bool,
{
    let Some(rest) = markdown_url.strip_prefix(RAW_HOST) else {
        return join_url(markdown_url, url);
    };

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() < 4 {
        return join_url(markdown_url, url);
    }
    let (owner, repo, branch) = (parts[0], parts[1], parts[2]);
    let dir: Vec<&str> = parts[3..parts.len() - 1].to_vec();

    let mut target = url;
    let mut levels_up = 0;
    while let Some(stripped) = target.strip_prefix("../") {
        target = stripped;
        levels_up += 1;
    }
    let target = target.strip_prefix("./").unwrap_or(target);

    let base = &dir[..dir.len().saturating_sub(levels_up)];
    let mut resolved = if base.is_empty() {
        target.to_string()
    } else {
        format!("{}/{target}", base.join("/"))
    };

    if IMAGE_EXT_RE.is_match(url) {
        let slashed = format!("/{resolved}");
        if let Some(caps) = ASSET_DIR_RE.captures(&slashed) {
            let number = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            if number.is_some_and(&is_erc) {
                resolved = ASSET_DIR_RE
                    .replace(&slashed, "/${1}erc-${2}/")
                    .trim_start_matches('/')
                    .to_string();
            }
        }
        return format!("{RAW_HOST}{owner}/{repo}/refs/heads/{branch}/{resolved}");
    }

    format!("{RAW_HOST}{owner}/{repo}/{branch}/{resolved}")
}

fn join_url(base: &str, url: &str) -> String {
    let dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
    format!("{dir}/{}", url.strip_prefix("./").unwrap_or(url))
}

/// Rewrite link and image destinations in a pulldown-cmark event stream.
///
/// Links to other documents become site paths; other relative links and
/// images are resolved against `markdown_url`.
pub fn rewrite_relative_links<'a, I, F>(
    events: I,
    markdown_url: &'a str,
    is_erc: F,
) -> impl Iterator<Item = Event<'a>>
where
    I: Iterator<Item = Event<'a>>,
    F: Fn(u32) -> bool + Copy + 'a,
{
    events.map(move |event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest = rewrite_link(&dest_url, markdown_url, is_erc).map_or(dest_url, Into::into);
            Event::Start(Tag::Link {
                link_type,
                dest_url: dest,
                title,
                id,
            })
        }
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest = if is_relative_url(&dest_url) && !dest_url.is_empty() {
                resolve_relative_url(markdown_url, &dest_url, is_erc).into()
            } else {
                dest_url
            };
            Event::Start(Tag::Image {
                link_type,
                dest_url: dest,
                title,
                id,
            })
        }
        other => other,
    })
}

fn rewrite_link<F>(url: &str, markdown_url: &str, is_erc: F) -> Option<String>
where
    F: Fn(u32) -> bool,
{
    if url.is_empty() || url.starts_with('#') {
        return None;
    }
    if let Some(path) = doc_link(url) {
        return Some(path);
    }
    if is_relative_url(url) && !url.starts_with('/') {
        return Some(resolve_relative_url(markdown_url, url, is_erc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP_URL: &str = "https://raw.githubusercontent.com/ethereum/EIPs/master/EIPS/eip-4844.md";
    const ERC_URL: &str = "https://raw.githubusercontent.com/ethereum/ERCs/master/ERCS/erc-721.md";

    fn never(_: u32) -> bool {
        false
    }

    // ------------------------------------------------------------------------
    // value parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_comma_list_drops_empty_items() {
        assert_eq!(parse_comma_list("a,, b ,"), vec!["a", "b"]);
        assert!(parse_comma_list("").is_empty());
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number(" 1559"), Some(1559));
        assert_eq!(leading_number("20abc"), Some(20));
        assert_eq!(leading_number("+7"), Some(7));
        assert_eq!(leading_number("-7"), None);
        assert_eq!(leading_number("TBD"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_number_list() {
        assert_eq!(parse_number_list("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_number_list("x, y"), Vec::<u32>::new());
    }

    // ------------------------------------------------------------------------
    // link resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_is_relative_url() {
        assert!(is_relative_url("./eip-1.md"));
        assert!(is_relative_url("../assets/x.png"));
        assert!(is_relative_url("#abstract"));
        assert!(!is_relative_url("https://eips.ethereum.org"));
        assert!(!is_relative_url("mailto:someone@example.com"));
        assert!(!is_relative_url("//cdn.example.com/x.png"));
    }

    #[test]
    fn test_doc_link_variants() {
        assert_eq!(doc_link("eip-20").as_deref(), Some("/eip/20"));
        assert_eq!(doc_link("./erc-721.md").as_deref(), Some("/eip/721"));
        assert_eq!(doc_link("./eip-2930.md#specification").as_deref(), Some("/eip/2930"));
        assert_eq!(doc_link("https://github.com/ethereum/EIPs/pull/123"), None);
    }

    #[test]
    fn test_resolve_parent_asset() {
        let url = resolve_relative_url(EIP_URL, "../assets/eip-4844/bench.csv", never);
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/ethereum/EIPs/master/assets/eip-4844/bench.csv"
        );
    }

    #[test]
    fn test_resolve_sibling() {
        let url = resolve_relative_url(EIP_URL, "./notes.txt", never);
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/ethereum/EIPs/master/EIPS/notes.txt"
        );
    }

    #[test]
    fn test_resolve_image_uses_refs_heads() {
        let url = resolve_relative_url(EIP_URL, "../assets/eip-4844/blob.png", never);
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/ethereum/EIPs/refs/heads/master/assets/eip-4844/blob.png"
        );
    }

    #[test]
    fn test_resolve_image_renames_erc_asset_folder() {
        let url = resolve_relative_url(ERC_URL, "../assets/eip-721/logo.svg", |n| n == 721);
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/ethereum/ERCs/refs/heads/master/assets/erc-721/logo.svg"
        );
    }

    #[test]
    fn test_resolve_too_many_levels_goes_to_root() {
        let url = resolve_relative_url(EIP_URL, "../../../LICENSE.md", never);
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/ethereum/EIPs/master/LICENSE.md"
        );
    }

    #[test]
    fn test_resolve_non_raw_host() {
        let url = resolve_relative_url("https://example.com/docs/eip-1.md", "img.png", never);
        assert_eq!(url, "https://example.com/docs/img.png");
    }

    #[test]
    fn test_rewrite_link_keeps_absolute_and_fragments() {
        assert_eq!(rewrite_link("https://ethereum.org", EIP_URL, never), None);
        assert_eq!(rewrite_link("#motivation", EIP_URL, never), None);
        assert_eq!(rewrite_link("/eip/1", EIP_URL, never), None);
        assert_eq!(
            rewrite_link("./eip-1559.md", EIP_URL, never).as_deref(),
            Some("/eip/1559")
        );
    }
}
