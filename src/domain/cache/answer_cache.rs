//! Bounded answer cache persisted in a key/value store

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::key::{normalize_question, ANSWER_CACHE_KEY, DEFAULT_CACHE_CAPACITY};
use crate::domain::chat::Message;
use crate::domain::storage::{KeyValueStore, KeyValueStoreExt};
use crate::domain::DomainError;

/// Persisted cache entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAnswer {
    /// Normalized question text
    pub question: String,
    pub answer: String,
    /// Epoch milliseconds, strictly increasing within one cache
    pub timestamp: i64,
}

/// Answer cache keyed by normalized question text
///
/// Holds at most one entry per normalized question and at most `capacity`
/// entries overall; the oldest entries are evicted first. Unreadable
/// persisted data is treated as an empty cache.
#[derive(Debug, Clone)]
pub struct AnswerCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
}

impl AnswerCache {
    /// Creates a cache with the default capacity of 50 entries
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(store, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self {
            store,
            key: ANSWER_CACHE_KEY.to_string(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached answer for a question, if any
    pub fn lookup(&self, question: &str) -> Option<String> {
        let normalized = normalize_question(question);

        let found = self
            .entries()
            .into_iter()
            .find(|entry| normalize_question(&entry.question) == normalized)
            .map(|entry| entry.answer);

        debug!(question = %normalized, hit = found.is_some(), "Answer cache lookup");
        found
    }

    /// Stores an answer, replacing any previous entry for the same question
    pub fn store(&self, question: &str, answer: &str) {
        let normalized = normalize_question(question);
        let mut entries = self.entries();

        let newest = entries.iter().map(|entry| entry.timestamp).max();
        entries.retain(|entry| entry.question != normalized);

        entries.push(CachedAnswer {
            question: normalized,
            answer: answer.to_string(),
            timestamp: next_timestamp(newest),
        });

        if entries.len() > self.capacity {
            entries.sort_by_key(|entry| entry.timestamp);
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
            debug!(evicted = excess, "Evicted oldest cached answers");
        }

        if let Err(e) = self.store.set_json(&self.key, &entries) {
            warn!(error = %e, "Failed to persist answer cache");
        }
    }

    /// Returns every cached answer as a message, oldest first
    pub fn load_all(&self) -> Vec<Message> {
        let mut entries = self.entries();
        entries.sort_by_key(|entry| entry.timestamp);

        entries
            .into_iter()
            .map(|entry| Message::new(entry.question, entry.answer))
            .collect()
    }

    /// Number of cached answers
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw persisted entries in storage order, empty when unreadable
    pub fn entries(&self) -> Vec<CachedAnswer> {
        match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Answer cache unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn read_entries(&self) -> Result<Vec<CachedAnswer>, DomainError> {
        Ok(self
            .store
            .get_json::<Vec<CachedAnswer>>(&self.key)?
            .unwrap_or_default())
    }
}

fn next_timestamp(newest: Option<i64>) -> i64 {
    let now = chrono::Utc::now().timestamp_millis();

    match newest {
        Some(newest) if newest >= now => newest.saturating_add(1),
        _ => now,
    }
}
