//! The document catalog and everything that reads from it.
//!
//! - [`catalog`]: valid-document catalogs, one per kind
//! - [`scan`]: building catalogs from repository checkouts
//! - [`prs`]: work-in-progress documents from open pull requests
//! - [`source`]: markdown sources (HTTP, local checkouts, static)
//! - [`fetch`]: fetching one document with the ERC/EIP fallback
//! - [`bookmarks`]: the reading list in a key-value store
//! - [`shared`]: shareable reading-list links
//! - [`hardfork`]: meta-EIP groups

pub mod bookmarks;
pub mod catalog;
pub mod fetch;
pub mod hardfork;
pub mod prs;
pub mod scan;
pub mod shared;
pub mod source;

pub use bookmarks::{
    BOOKMARKS_KEY, Bookmark, BookmarkList, FileKvStore, KvStore, MemoryKvStore, UpdateFn,
};
pub use catalog::{Catalog, CatalogEntry, Catalogs};
pub use fetch::{Document, FetchedDocument, fetch_document};
pub use hardfork::{HardForkGroup, HardForkMember, KNOWN_HARD_FORKS, hard_fork, resolve_hard_fork};
pub use prs::{
    ChangedFile, GITHUB_API_URL, GithubPulls, PullRequest, PullRequestApi, scan_all_open_prs,
    scan_open_prs,
};
pub use scan::{build_catalogs, build_eip_catalog, repository_folder, scan_repository};
pub use shared::{
    SHARED_KEYS, SharedItem, import_shared, parse_shared, parse_shared_params, share_link,
    share_query,
};
pub use source::{HttpSource, LocalSource, MarkdownSource, NOT_FOUND_BODY, StaticSource};
