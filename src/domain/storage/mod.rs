//! Storage domain - key/value persistence abstraction

mod repository;

pub use repository::{KeyValueStore, KeyValueStoreExt};

#[cfg(test)]
pub use repository::mock;
