//! CLI module for folio-chat
//!
//! Subcommands:
//! - `serve`: chat proxy server
//! - `chat`: interactive terminal chat
//! - `ask`: one question, answered through the cache and usage limit
//! - `usage` / `clear`: inspect or reset the local store

pub mod chat;
pub mod serve;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::{AnswerCache, ChatSession, KeyValueStore, UsageLimiter};
use crate::infrastructure::client::HttpChatClient;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{StoreConfig, StoreFactory};

/// folio-chat - portfolio assistant chat proxy and client
#[derive(Parser)]
#[command(name = "folio-chat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the chat proxy server
    Serve(serve::ServeArgs),

    /// Start an interactive chat session
    Chat,

    /// Ask a single question
    Ask(chat::AskArgs),

    /// Show questions used and cached answers
    Usage,

    /// Wipe the cached answers and the usage counter
    Clear,
}

fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();
    AppConfig::load().unwrap_or_default()
}

fn init_logging(config: &AppConfig) {
    if let Err(e) = logging::init_logging(&(&config.logging).into()) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store_config = StoreConfig::from_parts(&config.store.kind, &config.store.path)?;
    debug!(store = ?store_config.store_type(), "Opening store");
    Ok(StoreFactory::create(&store_config))
}

fn build_session(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<ChatSession> {
    let client = HttpChatClient::with_timeout(
        &config.client.base_url,
        &config.client.route,
        Duration::from_secs(config.client.timeout_secs),
    )?;
    debug!(endpoint = %client.endpoint(), "Chat client ready");

    let cache = AnswerCache::with_capacity(store.clone(), config.chat.cache_capacity);
    let limiter = UsageLimiter::with_limit(store, config.chat.usage_limit);

    Ok(ChatSession::new(Arc::new(client), cache, limiter))
}
