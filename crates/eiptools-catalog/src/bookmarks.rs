//! Reading-list bookmarks in a local key-value store.
//!
//! The list is a JSON array stored under [`BOOKMARKS_KEY`]. Older lists
//! stored document numbers as strings; both forms are accepted on read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use eiptools_core::util::files::{read_json_or_default, write_json};
use eiptools_core::{DocKind, Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Store key holding the bookmark list.
pub const BOOKMARKS_KEY: &str = "eip-bookmarks";

/// Closure for [`KvStore::update`]: current value in, replacement out.
pub type UpdateFn<'a> = dyn FnMut(Option<&str>) -> Result<Option<String>> + 'a;

/// String key-value persistence.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Read-modify-write of one key, atomic with respect to other calls on
    /// this store. `f` returning `None` leaves the value untouched.
    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<()>;
}

/// Key-value store backed by one JSON object file.
///
/// Every write rewrites the file atomically. Writers within one process
/// are serialised; separate processes are not coordinated.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file under the lock when `f` reports a change.
    fn rewrite<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<bool>,
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::config("bookmark store lock poisoned"))?;
        let mut map: BTreeMap<String, String> = read_json_or_default(&self.path)?;
        if f(&mut map)? {
            write_json(&self.path, &map)?;
        }
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map: BTreeMap<String, String> = read_json_or_default(&self.path)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.rewrite(|map| {
            map.insert(key.to_string(), value);
            Ok(true)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.rewrite(|map| Ok(map.remove(key).is_some()))
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        self.rewrite(|map| {
            let next = f(map.get(key).map(String::as_str))?;
            match next {
                Some(value) => {
                    map.insert(key.to_string(), value);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    map: Mutex<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.map
            .lock()
            .map_err(|_| Error::config("memory store lock poisoned"))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.map()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map()?.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        let mut map = self.map()?;
        let next = f(map.get(key).map(String::as_str))?;
        if let Some(value) = next {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }
}

/// A bookmarked document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(deserialize_with = "number_or_string")]
    pub eip_no: u32,
    /// Missing on bookmarks made from EIP pages.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Bookmark {
    pub fn new(kind: DocKind, number: u32) -> Self {
        Self {
            eip_no: number,
            kind: Some(kind),
            title: None,
            status: None,
        }
    }

    /// Kind, treating an untyped bookmark as an EIP.
    pub fn doc_kind(&self) -> DocKind {
        self.kind.unwrap_or(DocKind::Eip)
    }

    /// Same document, regardless of title or status.
    pub fn same_document(&self, kind: DocKind, number: u32) -> bool {
        self.eip_no == number && self.doc_kind() == kind
    }
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn parse_list(raw: Option<&str>) -> Result<Vec<Bookmark>> {
    match raw {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| Error::parse(format!("corrupt bookmark list: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// The reading list persisted in a [`KvStore`].
#[derive(Debug)]
pub struct BookmarkList<S> {
    store: S,
}

impl<S: KvStore> BookmarkList<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All bookmarks in insertion order. An absent key is an empty list.
    pub fn list(&self) -> Result<Vec<Bookmark>> {
        parse_list(self.store.get(BOOKMARKS_KEY)?.as_deref())
    }

    /// Run `f` on the stored list as one store update.
    ///
    /// The list is written back only when `f` reports a change.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Bookmark>) -> (bool, T)) -> Result<T> {
        let mut f = Some(f);
        let mut output = None;
        self.store.update(BOOKMARKS_KEY, &mut |raw| {
            let Some(f) = f.take() else {
                return Ok(None);
            };
            let mut bookmarks = parse_list(raw)?;
            let (changed, value) = f(&mut bookmarks);
            output = Some(value);
            if changed {
                Ok(Some(serde_json::to_string(&bookmarks)?))
            } else {
                Ok(None)
            }
        })?;
        output.ok_or_else(|| Error::config("bookmark store skipped the update"))
    }

    pub fn contains(&self, kind: DocKind, number: u32) -> Result<bool> {
        Ok(self
            .list()?
            .iter()
            .any(|b| b.same_document(kind, number)))
    }

    /// Append `bookmark` unless the same document is already listed.
    ///
    /// Returns `true` if it was added.
    pub fn add(&self, bookmark: Bookmark) -> Result<bool> {
        self.modify(|bookmarks| {
            if bookmarks
                .iter()
                .any(|b| b.same_document(bookmark.doc_kind(), bookmark.eip_no))
            {
                return (false, false);
            }
            log::debug!("Bookmarking {}-{}", bookmark.doc_kind(), bookmark.eip_no);
            bookmarks.push(bookmark);
            (true, true)
        })
    }

    /// Append every bookmark not already listed; returns how many were added.
    pub fn extend(&self, incoming: impl IntoIterator<Item = Bookmark>) -> Result<usize> {
        self.modify(|bookmarks| {
            let before = bookmarks.len();
            for bookmark in incoming {
                if !bookmarks
                    .iter()
                    .any(|b| b.same_document(bookmark.doc_kind(), bookmark.eip_no))
                {
                    bookmarks.push(bookmark);
                }
            }
            let added = bookmarks.len() - before;
            (added > 0, added)
        })
    }

    /// Remove the bookmark for a document; returns `true` if one was removed.
    pub fn remove(&self, kind: DocKind, number: u32) -> Result<bool> {
        self.modify(|bookmarks| {
            let before = bookmarks.len();
            bookmarks.retain(|b| !b.same_document(kind, number));
            let removed = bookmarks.len() != before;
            (removed, removed)
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(BOOKMARKS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_list() -> BookmarkList<MemoryKvStore> {
        BookmarkList::new(MemoryKvStore::new())
    }

    #[test]
    fn test_empty_list() {
        assert!(memory_list().list().unwrap().is_empty());
    }

    #[test]
    fn test_add_dedupes_by_number_and_kind() {
        let list = memory_list();
        assert!(list.add(Bookmark::new(DocKind::Eip, 1559)).unwrap());
        assert!(!list.add(Bookmark::new(DocKind::Eip, 1559)).unwrap());
        assert!(list.add(Bookmark::new(DocKind::Rip, 1559)).unwrap());
        assert_eq!(list.list().unwrap().len(), 2);
    }

    #[test]
    fn test_untyped_bookmark_is_eip() {
        let list = memory_list();
        let untyped = Bookmark {
            eip_no: 20,
            kind: None,
            title: Some("Token Standard".into()),
            status: None,
        };
        list.add(untyped).unwrap();
        assert!(list.contains(DocKind::Eip, 20).unwrap());
        assert!(!list.add(Bookmark::new(DocKind::Eip, 20)).unwrap());
    }

    #[test]
    fn test_remove_matches_kind() {
        let list = memory_list();
        list.add(Bookmark::new(DocKind::Eip, 7212)).unwrap();
        list.add(Bookmark::new(DocKind::Rip, 7212)).unwrap();

        assert!(list.remove(DocKind::Rip, 7212).unwrap());
        assert!(!list.remove(DocKind::Caip, 7212).unwrap());
        let left = list.list().unwrap();
        assert_eq!(left, vec![Bookmark::new(DocKind::Eip, 7212)]);
    }

    #[test]
    fn test_extend_counts_new_items() {
        let list = memory_list();
        list.add(Bookmark::new(DocKind::Eip, 1)).unwrap();
        let added = list
            .extend([Bookmark::new(DocKind::Eip, 1), Bookmark::new(DocKind::Caip, 2)])
            .unwrap();
        assert_eq!(added, 1);
    }

    #[test]
    fn test_reads_string_numbers() {
        let store = MemoryKvStore::new();
        store
            .set(
                BOOKMARKS_KEY,
                r#"[{"eipNo":"4844","type":"EIP","title":"Blobs","status":"Final"},{"eipNo":20}]"#
                    .to_string(),
            )
            .unwrap();
        let list = BookmarkList::new(store).list().unwrap();
        assert_eq!(list[0].eip_no, 4844);
        assert_eq!(list[1].kind, None);
    }

    #[test]
    fn test_corrupt_list_is_parse_error() {
        let store = MemoryKvStore::new();
        store.set(BOOKMARKS_KEY, "not json".to_string()).unwrap();
        let err = BookmarkList::new(store).list().unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    fn add_from_threads<S: KvStore>(list: &BookmarkList<S>) {
        std::thread::scope(|scope| {
            for worker in 0..8u32 {
                scope.spawn(move || {
                    for i in 0..25 {
                        list.add(Bookmark::new(DocKind::Eip, worker * 100 + i)).unwrap();
                    }
                });
            }
        });
    }

    #[test]
    fn test_concurrent_adds_all_kept() {
        let list = memory_list();
        add_from_threads(&list);
        assert_eq!(list.list().unwrap().len(), 200);

        let dir = tempfile::tempdir().unwrap();
        let list = BookmarkList::new(FileKvStore::new(dir.path().join("store.json")));
        add_from_threads(&list);
        assert_eq!(list.list().unwrap().len(), 200);
        assert!(list.contains(DocKind::Eip, 725).unwrap());
    }

    #[test]
    fn test_update_none_leaves_value() {
        let store = MemoryKvStore::new();
        store.set("k", "v".to_string()).unwrap();
        store.update("k", &mut |current| {
            assert_eq!(current, Some("v"));
            Ok(None)
        })
        .unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_corrupt_list_blocks_add() {
        let store = MemoryKvStore::new();
        store.set(BOOKMARKS_KEY, "[oops".to_string()).unwrap();
        let list = BookmarkList::new(store);
        assert!(list.add(Bookmark::new(DocKind::Eip, 1)).is_err());
        assert_eq!(list.store().get(BOOKMARKS_KEY).unwrap().as_deref(), Some("[oops"));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let list = BookmarkList::new(FileKvStore::new(&path));
        list.add(Bookmark::new(DocKind::Caip, 10)).unwrap();

        let reopened = BookmarkList::new(FileKvStore::new(&path));
        assert!(reopened.contains(DocKind::Caip, 10).unwrap());

        reopened.clear().unwrap();
        assert!(reopened.list().unwrap().is_empty());
    }
}
