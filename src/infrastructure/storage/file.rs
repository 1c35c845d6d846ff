//! JSON file key/value store
//!
//! Keeps every key in one JSON object on disk so state survives restarts.
//! Writes go through a temporary file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

type Entries = BTreeMap<String, String>;

/// Key/value store persisted as a single JSON object file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store at `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "Opening file store");

        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, DomainError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if data.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&data).map_err(|e| {
            DomainError::storage_read(format!("Malformed store file {}: {}", self.path.display(), e))
        })
    }

    /// Reads the entries for a write, discarding a corrupted file
    fn read_for_update(&self) -> Result<Entries, DomainError> {
        match self.read_entries() {
            Err(DomainError::StorageRead { message }) => {
                warn!(error = %message, "Store file unreadable, starting from empty");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::storage(format!("Failed to serialize store: {}", e)))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data).map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            DomainError::storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), DomainError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut entries = self.read_for_update()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn clear(&self) -> Result<(), DomainError> {
        self.update(|entries| entries.clear())
    }
}
