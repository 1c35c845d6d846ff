//! Cache domain - bounded answer cache over a key/value store

mod answer_cache;
mod key;

pub use answer_cache::{AnswerCache, CachedAnswer};
pub use key::{normalize_question, ANSWER_CACHE_KEY, DEFAULT_CACHE_CAPACITY};
