//! File-backed key-value store: the native stand-in for `localStorage`.
//!
//! The whole map is kept in memory and rewritten as pretty JSON on every
//! change. A missing or unreadable-as-JSON file is an empty store; the next
//! write replaces it.

use constellation_core::error::SceneError;
use constellation_core::theme::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Loads the store at `path`. Corrupt contents are logged and treated
    /// as empty so the theme falls back to the default.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SceneError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("{} is not a JSON string map, ignoring it: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SceneError::Io(format!("{}: {e}", path.display()))),
        };
        log::debug!("opened theme store {}", path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SceneError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| SceneError::Storage(e.to_string()))?;
        fs::write(&self.path, text)
            .map_err(|e| SceneError::Storage(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// A failed write leaves the previous value in place.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SceneError> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        let result = self.flush();
        if result.is_err() {
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
        }
        result
    }

    fn remove(&mut self, key: &str) -> Result<(), SceneError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_core::theme::{MemoryStore, ThemeId, ThemeManager, STORAGE_KEY};

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("theme.json")).unwrap();
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("theme", "theme-metallic-sky").unwrap();

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get("theme").as_deref(), Some("theme-metallic-sky"));
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(STORAGE_KEY), None);

        let mut m = ThemeManager::new(store, MemoryStore::new());
        assert_eq!(m.active_theme(), ThemeId::LucidBlue);
        m.set_theme(ThemeId::MetallicSky).unwrap();
        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get(STORAGE_KEY).as_deref(), Some("theme-metallic-sky"));
    }

    #[test]
    fn unwritable_location_fails_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("missing").join("t.json")).unwrap();
        assert!(store.set("theme", "x").is_err());
    }

    #[test]
    fn manager_persists_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        {
            let mut m = ThemeManager::new(FileStore::open(&path).unwrap(), MemoryStore::new());
            m.set_theme(ThemeId::MetallicSky).unwrap();
        }
        let mut m = ThemeManager::new(FileStore::open(&path).unwrap(), MemoryStore::new());
        assert_eq!(m.active_theme(), ThemeId::MetallicSky);
        assert_eq!(m.durable().get("themeVersion").as_deref(), Some("2.0"));
    }

    #[test]
    fn broken_file_store_falls_back_to_session_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let durable = FileStore::open(dir.path().join("gone").join("t.json")).unwrap();
        let mut m = ThemeManager::new(durable, MemoryStore::new());
        m.set_theme(ThemeId::MetallicSky).unwrap();
        assert_eq!(m.active_theme(), ThemeId::MetallicSky);
    }
}
