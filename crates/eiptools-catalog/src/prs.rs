//! Work-in-progress documents from open pull requests.
//!
//! A document that has not been merged yet only exists on a PR branch. For
//! every open PR against an upstream repository, files added under the
//! document folder (directly or by rename) become catalog entries carrying
//! the PR number and a raw-content URL on the PR's head branch.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use eiptools_content::parse_document;
use eiptools_core::util::ids::number_from_path;
use eiptools_core::{DocKind, Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::catalog::{CatalogEntry, Catalogs};
use crate::source::MarkdownSource;

/// Public GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;
const LOW_RATE_LIMIT: u32 = 100;

/// An open pull request and the branch it comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u32,
    /// `owner/name` of the head repository; forks differ from upstream.
    pub head_repo: String,
    pub head_branch: String,
}

impl PullRequest {
    /// Raw-content URL of `filename` on the PR's head branch.
    pub fn raw_url(&self, filename: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/refs/heads/{}/{filename}",
            self.head_repo, self.head_branch
        )
    }
}

/// One file touched by a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, ...
    pub status: String,
    #[serde(default)]
    pub previous_filename: Option<String>,
}

/// The pull request queries the scanner needs.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    async fn open_pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>>;

    async fn changed_files(&self, owner: &str, repo: &str, number: u32) -> Result<Vec<ChangedFile>>;
}

/// [`PullRequestApi`] over the GitHub REST API.
#[derive(Clone, Debug)]
pub struct GithubPulls {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct PullJson {
    number: u32,
    head: HeadJson,
}

#[derive(Deserialize)]
struct HeadJson {
    #[serde(rename = "ref")]
    branch: String,
    // Null when the fork was deleted.
    repo: Option<RepoJson>,
}

#[derive(Deserialize)]
struct RepoJson {
    full_name: String,
}

impl GithubPulls {
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eiptools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}"), None))?;
        Ok(Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
            token,
        })
    }

    /// Point at a different API host, e.g. GitHub Enterprise.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Every page of a list endpoint, following `rel="next"` links.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}{path}{separator}per_page={PER_PAGE}&page={page}",
                self.base_url
            );
            let mut request = self
                .client
                .get(&url)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::http(format!("GET {url}: {e}"), None))?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::http(
                    format!("GET {url} returned {status}"),
                    Some(status.as_u16()),
                ));
            }

            let headers = response.headers();
            if let Some(remaining) = header_u32(headers, "x-ratelimit-remaining")
                && remaining < LOW_RATE_LIMIT
            {
                log::warn!("GitHub rate limit running low: {remaining} requests remaining");
            }
            let more = has_next_page(
                headers
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok()),
            );

            let batch: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::http(format!("decoding {url}: {e}"), Some(status.as_u16())))?;
            if batch.is_empty() {
                break;
            }
            items.extend(batch);
            if !more {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl PullRequestApi for GithubPulls {
    async fn open_pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        let pulls: Vec<PullJson> = self
            .get_all(&format!("/repos/{owner}/{repo}/pulls?state=open"))
            .await?;
        log::info!("{} open pull requests in {owner}/{repo}", pulls.len());

        Ok(pulls
            .into_iter()
            .filter_map(|pull| match pull.head.repo {
                Some(head_repo) => Some(PullRequest {
                    number: pull.number,
                    head_repo: head_repo.full_name,
                    head_branch: pull.head.branch,
                }),
                None => {
                    log::debug!("PR #{} has no head repository, skipping", pull.number);
                    None
                }
            })
            .collect())
    }

    async fn changed_files(&self, owner: &str, repo: &str, number: u32) -> Result<Vec<ChangedFile>> {
        self.get_all(&format!("/repos/{owner}/{repo}/pulls/{number}/files"))
            .await
    }
}

fn header_u32(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// `true` when a `Link` header advertises another page.
pub fn has_next_page(link: Option<&str>) -> bool {
    link.is_some_and(|link| link.split(',').any(|part| part.contains("rel=\"next\"")))
}

/// Document number of `filename` when it sits directly in `folder`.
///
/// The folder comparison ignores case; PRs occasionally use `eips/`.
fn document_number(filename: &str, folder: &str, prefix: &str) -> Option<u32> {
    let (dir, _) = filename.rsplit_once('/')?;
    if !dir.eq_ignore_ascii_case(folder) {
        return None;
    }
    number_from_path(Path::new(filename), prefix)
}

/// Files a PR adds under the document folder, renames included.
///
/// Returns the added filenames and the numbers that a rename moved away from.
fn added_documents(files: &[ChangedFile], folder: &str, prefix: &str) -> (Vec<(u32, String)>, Vec<u32>) {
    let mut added = Vec::new();
    let mut renamed_away = Vec::new();

    for file in files {
        match file.status.as_str() {
            "added" => {
                if let Some(number) = document_number(&file.filename, folder, prefix) {
                    added.push((number, file.filename.clone()));
                }
            }
            "renamed" => {
                let old = file
                    .previous_filename
                    .as_deref()
                    .and_then(|f| document_number(f, folder, prefix));
                let new = document_number(&file.filename, folder, prefix);
                if let Some(old) = old
                    && new != Some(old)
                {
                    renamed_away.push(old);
                }
                if let Some(new) = new {
                    added.push((new, file.filename.clone()));
                }
            }
            _ => {}
        }
    }

    (added, renamed_away)
}

/// Catalog entries for documents added by open PRs in one repository.
///
/// A PR whose files cannot be listed, or whose markdown cannot be fetched,
/// is skipped with a warning. When two PRs add the same number the later
/// one in listing order wins.
pub async fn scan_open_prs(
    api: &dyn PullRequestApi,
    markdown: &dyn MarkdownSource,
    kind: DocKind,
    is_erc: bool,
) -> Result<BTreeMap<u32, CatalogEntry>> {
    let owner = kind.owner();
    let repo = kind.repo_name(is_erc);
    let folder = kind.folder(is_erc);
    let prefix = kind.file_prefix(is_erc);

    let pulls = api.open_pulls(owner, repo).await?;
    let mut entries = BTreeMap::new();

    for pull in &pulls {
        let files = match api.changed_files(owner, repo, pull.number).await {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Skipping PR #{} in {owner}/{repo}: {e}", pull.number);
                continue;
            }
        };

        let (added, renamed_away) = added_documents(&files, folder, prefix);
        for number in renamed_away {
            if entries.remove(&number).is_some() {
                log::debug!("{prefix}-{number} renamed by PR #{}", pull.number);
            }
        }

        for (number, filename) in added {
            let url = pull.raw_url(&filename);
            let text = match markdown.fetch(&url).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    log::warn!("{url} from PR #{} not found", pull.number);
                    continue;
                }
                Err(e) => {
                    log::warn!("Could not read {prefix}-{number} from PR #{}: {e}", pull.number);
                    continue;
                }
            };

            let (meta, _) = parse_document(&text);
            log::debug!("Found WIP {prefix}-{number} in PR #{}", pull.number);
            entries.insert(
                number,
                CatalogEntry {
                    title: meta.title_or_default(kind, number),
                    status: Some(meta.status_or_default().to_string()),
                    is_erc: (kind == DocKind::Eip).then_some(is_erc),
                    pr_no: Some(pull.number),
                    markdown_path: url,
                    requires: meta.requires,
                },
            );
        }
    }

    log::info!("{} WIP documents in {owner}/{repo}", entries.len());
    Ok(entries)
}

/// WIP entries for every upstream repository.
///
/// ERC entries replace EIP entries with the same number.
pub async fn scan_all_open_prs(
    api: &dyn PullRequestApi,
    markdown: &dyn MarkdownSource,
) -> Result<Catalogs> {
    let mut catalogs = Catalogs::default();
    for (kind, is_erc) in [
        (DocKind::Eip, false),
        (DocKind::Eip, true),
        (DocKind::Rip, false),
        (DocKind::Caip, false),
    ] {
        let entries = scan_open_prs(api, markdown, kind, is_erc).await?;
        catalogs.get_mut(kind).merge(entries);
    }
    Ok(catalogs)
}
