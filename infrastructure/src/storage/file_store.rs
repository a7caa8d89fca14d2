//! File-backed key/value store.
//!
//! All keys live in one JSON object on disk. Every write replaces the whole
//! file through a temporary file and a rename, so a crash mid-write leaves
//! either the old or the new contents, never a torn file.

use mindmingle_application::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Key/value store persisted to a single JSON file.
///
/// The file is read once on open and kept in memory; writes go through to
/// disk before returning.
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileKeyValueStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A file that is not a JSON object of strings is reported as
    /// [`StoreError::Corrupt`] rather than silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = Self::read_entries(&path)?;
        debug!(
            "Opened key/value store {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Entries, StoreError> {
        if !path.exists() {
            return Ok(Entries::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let tmp_path = self.temp_path();
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            warn!("Atomic rename to {} failed: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_entries(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write_entries(&next)?;
        *entries = next;
        Ok(())
    }
}
