//! Finding standards numbers in cast text.

use std::sync::LazyLock;

use regex::Regex;

/// Site that reply links point at.
pub const DEFAULT_SITE_URL: &str = "https://eip.tools";

/// First line of every reply.
pub const REPLY_HEADER: &str = "Explore the EIPs / ERCs mentioned in this cast:";

/// `eip-N`, `erc N`, or a bare number. Bare numbers are checked for
/// surrounding whitespace separately.
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)eip[-\s]?(\d+)|erc[-\s]?(\d+)|(\d+)").expect("mention pattern is valid")
});

fn standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
}

/// Numbers mentioned in `text` that `is_known` accepts.
///
/// Matches `EIP-1559`, `eip 1559`, `ERC20` and whitespace-delimited bare
/// numbers, case-insensitively. Results keep their first-seen order with
/// duplicates removed.
///
/// ```rust
/// use eiptools_webhook::extract_mentions;
///
/// let found = extract_mentions("EIP-7702 and erc 20, not 42x or 20 again", |n| n != 42);
/// assert_eq!(found, vec![7702, 20]);
/// ```
pub fn extract_mentions(text: &str, is_known: impl Fn(u32) -> bool) -> Vec<u32> {
    let mut found = Vec::new();
    for caps in MENTION_RE.captures_iter(text) {
        let digits = if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            m.as_str()
        } else if let Some(m) = caps.get(3) {
            if !standalone(text, m.start(), m.end()) {
                continue;
            }
            m.as_str()
        } else {
            continue;
        };

        let Ok(number) = digits.parse::<u32>() else {
            continue;
        };
        if is_known(number) && !found.contains(&number) {
            found.push(number);
        }
    }
    found
}

/// Site links for mentioned EIP numbers.
pub fn mention_urls(site_url: &str, numbers: &[u32]) -> Vec<String> {
    let base = site_url.trim_end_matches('/');
    numbers.iter().map(|n| format!("{base}/eip/{n}")).collect()
}

/// Reply body listing `urls`.
pub fn reply_text(urls: &[String]) -> String {
    format!("{REPLY_HEADER}\n\n{}", urls.join("\n"))
}
