//! Where document markdown comes from.
//!
//! Documents are addressed by their raw-content URL. [`HttpSource`] fetches
//! them over HTTP; [`LocalSource`] maps the same URLs onto repository
//! checkouts so the graph can be built offline; [`StaticSource`] serves
//! fixed content.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use eiptools_core::{DocKind, Error, Result};

/// Body the raw-content host returns for missing files.
pub const NOT_FOUND_BODY: &str = "404: Not Found";

/// A source of markdown files keyed by raw-content URL.
#[async_trait]
pub trait MarkdownSource: Send + Sync {
    /// Fetch the markdown at `url`.
    ///
    /// `Ok(None)` means the file does not exist; `Err` is reserved for
    /// transport and I/O failures.
    async fn fetch(&self, url: &str) -> Result<Option<String>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Fetches markdown over HTTP with a shared client.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eiptools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}"), None))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl MarkdownSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("GET {url}: {e}"), None))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!("{url} not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::http(
                format!("GET {url} returned {status}"),
                Some(status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("reading {url}: {e}"), Some(status.as_u16())))?;
        if body.trim() == NOT_FOUND_BODY {
            return Ok(None);
        }
        Ok(Some(body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Serves raw-content URLs from local repository checkouts.
#[derive(Clone, Debug, Default)]
pub struct LocalSource {
    mounts: Vec<(String, PathBuf)>,
}

impl LocalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve URLs starting with `url_prefix` from files under `dir`.
    pub fn mount(mut self, url_prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.mounts.push((url_prefix.into(), dir.into()));
        self
    }

    /// Mount every upstream repository from `root/{EIPs,ERCs,RIPs,CAIPs}`.
    pub fn from_checkouts(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let repos = [
            (DocKind::Eip, false),
            (DocKind::Eip, true),
            (DocKind::Rip, false),
            (DocKind::Caip, false),
        ];
        repos.into_iter().fold(Self::new(), |source, (kind, is_erc)| {
            source.mount(kind.raw_base(is_erc), root.join(kind.repo_name(is_erc)))
        })
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.mounts.iter().find_map(|(prefix, dir)| {
            let rest = url.strip_prefix(prefix.as_str())?;
            if rest.split('/').any(|part| part == "..") {
                return None;
            }
            Some(dir.join(rest))
        })
    }
}

#[async_trait]
impl MarkdownSource for LocalSource {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        let Some(path) = self.resolve(url) else {
            log::debug!("No local mount for {url}");
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_path(e, path)),
        }
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// In-memory source with fixed URL → markdown content.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    files: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, markdown: impl Into<String>) -> Self {
        self.files.insert(url.into(), markdown.into());
        self
    }
}

#[async_trait]
impl MarkdownSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        Ok(self.files.get(url).cloned())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_source_maps_raw_urls() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("ERCs/ERCS");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("erc-721.md"), "---\neip: 721\n---\n").unwrap();

        let source = LocalSource::from_checkouts(root.path());
        let text = source.fetch(&DocKind::Eip.raw_url(721, true)).await.unwrap();
        assert!(text.unwrap().contains("eip: 721"));

        let missing = source.fetch(&DocKind::Eip.raw_url(721, false)).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_local_source_unmounted_url() {
        let source = LocalSource::new().mount("https://example.com/", "/tmp");
        assert!(source.fetch("https://other.org/x.md").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_source_rejects_parent_segments() {
        let root = tempfile::tempdir().unwrap();
        let source = LocalSource::new().mount("https://example.com/", root.path());
        assert!(source.fetch("https://example.com/../etc/passwd").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new().with("u", "body");
        assert_eq!(source.fetch("u").await.unwrap().as_deref(), Some("body"));
        assert_eq!(source.fetch("v").await.unwrap(), None);
        assert_eq!(source.name(), "static");
    }

    #[test]
    fn test_http_source_builds() {
        let source = HttpSource::new(Duration::from_secs(5)).unwrap();
        assert_eq!(source.name(), "http");
    }
}
