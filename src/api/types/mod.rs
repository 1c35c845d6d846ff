//! Proxy API types
//!
//! Request and success bodies are the domain chat types; only errors have
//! their own shape here.

pub mod error;

pub use crate::domain::chat::{ChatRequest, ChatResponse};
pub use error::{ApiError, ApiErrorResponse, INTERNAL_ERROR_MESSAGE};
