//! folio-chat
//!
//! Portfolio assistant chat:
//! - A pass-through proxy that forwards questions to an upstream
//!   question-answering service
//! - A chat client library with a bounded local answer cache, a lifetime
//!   usage limit and a session controller
//! - A terminal front end driving that library

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
