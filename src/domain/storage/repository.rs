//! Key/value store trait definition

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// String key/value store the chat client persists its state into
///
/// Values are raw strings. Use [`KeyValueStoreExt`] for typed JSON access.
/// Reads and writes are synchronous; callers decide how to treat failures.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Gets the raw value stored under a key
    fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a raw value under a key, replacing any previous value
    fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes every key
    fn clear(&self) -> Result<(), DomainError>;
}

/// Extension trait providing typed JSON get/set operations
pub trait KeyValueStoreExt: KeyValueStore {
    /// Gets and deserializes a JSON value
    ///
    /// A present but malformed value is reported as `StorageRead`.
    fn get_json<V>(&self, key: &str) -> Result<Option<V>, DomainError>
    where
        V: DeserializeOwned,
    {
        match self.get_raw(key)? {
            Some(data) => {
                let value = serde_json::from_str(&data).map_err(|e| {
                    DomainError::storage_read(format!("Malformed value under '{}': {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores a JSON value
    fn set_json<V>(&self, key: &str, value: &V) -> Result<(), DomainError>
    where
        V: Serialize + ?Sized,
    {
        let data = serde_json::to_string(value).map_err(|e| {
            DomainError::storage(format!("Failed to serialize value for '{}': {}", key, e))
        })?;
        self.set_raw(key, &data)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock store for testing, optionally failing every call or only writes
    #[derive(Debug, Default)]
    pub struct MockStore {
        entries: Mutex<HashMap<String, String>>,
        error: Mutex<Option<String>>,
        write_error: Mutex<Option<String>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Reads succeed, every write fails
        pub fn with_write_error(self, error: impl Into<String>) -> Self {
            *self.write_error.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }

        fn check_write_error(&self) -> Result<(), DomainError> {
            self.check_error()?;
            if let Some(error) = self.write_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    impl KeyValueStore for MockStore {
        fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
            self.check_write_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<(), DomainError> {
            self.check_write_error()?;
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_store_json_round_trip() {
            let store = MockStore::new();
            store.set_json("numbers", &vec![1, 2, 3]).unwrap();

            let result: Option<Vec<i32>> = store.get_json("numbers").unwrap();
            assert_eq!(result, Some(vec![1, 2, 3]));
        }

        #[test]
        fn test_mock_store_malformed_json() {
            let store = MockStore::new().with_entry("numbers", "not json");

            let result: Result<Option<Vec<i32>>, _> = store.get_json("numbers");
            assert!(matches!(result, Err(DomainError::StorageRead { .. })));
        }

        #[test]
        fn test_mock_store_with_error() {
            let store = MockStore::new().with_error("disk gone");

            assert!(store.get_raw("key").is_err());
            assert!(store.set_raw("key", "value").is_err());
        }

        #[test]
        fn test_mock_store_with_write_error() {
            let store = MockStore::new()
                .with_entry("key", "value")
                .with_write_error("read only");

            assert_eq!(store.get_raw("key").unwrap(), Some("value".to_string()));
            assert!(store.set_raw("key", "other").is_err());
            assert!(store.clear().is_err());
            assert_eq!(store.get_raw("key").unwrap(), Some("value".to_string()));
        }
    }
}
