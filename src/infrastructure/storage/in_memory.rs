//! In-memory key/value store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

/// Thread-safe in-memory store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            entries: RwLock::new(map),
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.clear();
        Ok(())
    }
}
