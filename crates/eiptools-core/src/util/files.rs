//! JSON file helpers shared by the catalog, bookmark store and graph artifact.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    std::fs::write(tmp, bytes).map_err(|e| Error::io_with_path(e, tmp))?;
    std::fs::rename(tmp, path).map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    write_atomic(path, &body)
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::parse(format!("{}: {e}", path.display())))
}

/// Like [`read_json`], but a missing file yields `T::default()`.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        log::debug!("{} does not exist, starting empty", path.display());
        return Ok(T::default());
    }
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data.json");
        let mut map = BTreeMap::new();
        map.insert(20u32, "Token Standard".to_string());

        write_json(&path, &map).unwrap();
        let back: BTreeMap<u32, String> = read_json(&path).unwrap();
        assert_eq!(back, map);
        assert!(!dir.path().join("nested/data.json.tmp").exists());
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let map: BTreeMap<u32, String> =
            read_json_or_default(&dir.path().join("absent.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_json::<BTreeMap<u32, String>>(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
