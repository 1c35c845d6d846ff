//! Store commands - inspect and reset the local chat store

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AnswerCache, KeyValueStore, UsageLimiter};

/// Usage and cache figures for the configured store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReport {
    pub usage_count: u32,
    pub usage_limit: u32,
    pub cached_answers: usize,
    pub cache_capacity: usize,
}

impl std::fmt::Display for StoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Questions used: {}/{}", self.usage_count, self.usage_limit)?;
        write!(
            f,
            "Cached answers: {}/{}",
            self.cached_answers, self.cache_capacity
        )
    }
}

fn report(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> StoreReport {
    let cache = AnswerCache::with_capacity(store.clone(), config.chat.cache_capacity);
    let limiter = UsageLimiter::with_limit(store, config.chat.usage_limit);

    StoreReport {
        usage_count: limiter.current_count(),
        usage_limit: limiter.limit(),
        cached_answers: cache.len(),
        cache_capacity: cache.capacity(),
    }
}

/// Print the usage counter and cache size
pub async fn usage() -> anyhow::Result<()> {
    let config = super::load_config();
    super::init_logging(&config);

    let store = super::open_store(&config)?;
    println!("{}", report(&config, store));

    Ok(())
}

/// Remove every cached answer and reset the usage counter
pub async fn clear() -> anyhow::Result<()> {
    let config = super::load_config();
    super::init_logging(&config);

    let store = super::open_store(&config)?;
    store.clear()?;

    info!(path = %config.store.path, "Chat store cleared");
    println!("Chat history and usage cleared");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::ANSWER_CACHE_KEY;
    use crate::domain::usage::USAGE_KEY;
    use crate::infrastructure::storage::InMemoryStore;

    fn seeded_store() -> Arc<dyn KeyValueStore> {
        Arc::new(InMemoryStore::with_entries([
            (USAGE_KEY, "3"),
            (
                ANSWER_CACHE_KEY,
                r#"[{"question":"hi","answer":"hello","timestamp":1}]"#,
            ),
        ]))
    }

    #[test]
    fn test_report_reads_store() {
        let report = report(&AppConfig::default(), seeded_store());

        assert_eq!(
            report,
            StoreReport {
                usage_count: 3,
                usage_limit: 10,
                cached_answers: 1,
                cache_capacity: 50,
            }
        );
        assert_eq!(
            report.to_string(),
            "Questions used: 3/10\nCached answers: 1/50"
        );
    }

    #[test]
    fn test_report_after_clear_is_empty() {
        let store = seeded_store();
        store.clear().unwrap();

        let report = report(&AppConfig::default(), store);
        assert_eq!(report.usage_count, 0);
        assert_eq!(report.cached_answers, 0);
    }
}
