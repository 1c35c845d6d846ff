//! Store factory for runtime store selection

use std::sync::Arc;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::file::JsonFileStore;
use super::in_memory::InMemoryStore;

/// Supported store types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    InMemory,
    /// JSON file on disk
    File,
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "file" | "json" => Ok(Self::File),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: memory, file",
                s
            ))),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    File { path: String },
}

impl StoreConfig {
    /// Builds a configuration from a type name and a file path
    pub fn from_parts(kind: &str, path: &str) -> Result<Self, DomainError> {
        match kind.parse::<StoreType>()? {
            StoreType::InMemory => Ok(Self::InMemory),
            StoreType::File => {
                if path.trim().is_empty() {
                    return Err(DomainError::configuration("File store requires a path"));
                }
                Ok(Self::File {
                    path: path.to_string(),
                })
            }
        }
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory => StoreType::InMemory,
            Self::File { .. } => StoreType::File,
        }
    }
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn create(config: &StoreConfig) -> Arc<dyn KeyValueStore> {
        match config {
            StoreConfig::InMemory => Arc::new(InMemoryStore::new()),
            StoreConfig::File { path } => Arc::new(JsonFileStore::open(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!("memory".parse::<StoreType>().unwrap(), StoreType::InMemory);
        assert_eq!("In-Memory".parse::<StoreType>().unwrap(), StoreType::InMemory);
        assert_eq!("file".parse::<StoreType>().unwrap(), StoreType::File);
        assert!("redis".parse::<StoreType>().is_err());
    }

    #[test]
    fn test_file_store_requires_path() {
        assert!(StoreConfig::from_parts("file", "  ").is_err());

        let config = StoreConfig::from_parts("file", "data/chat.json").unwrap();
        assert_eq!(config.store_type(), StoreType::File);
    }

    #[test]
    fn test_create_in_memory() {
        let store = StoreFactory::create(&StoreConfig::InMemory);
        store.set_raw("k", "v").unwrap();
        assert_eq!(store.get_raw("k").unwrap(), Some("v".to_string()));
    }
}
