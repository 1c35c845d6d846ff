//! Domain layer - Chat session logic and its seams

pub mod cache;
pub mod chat;
pub mod error;
pub mod session;
pub mod storage;
pub mod usage;

pub use cache::{normalize_question, AnswerCache, CachedAnswer};
pub use chat::{ChatClient, ChatRequest, ChatResponse, Message};
pub use error::DomainError;
pub use session::{
    ChatSession, ChatSnapshot, SessionHandle, SessionPhase, SubmitOutcome, SubmitRejection,
    QUICK_QUESTIONS,
};
pub use storage::{KeyValueStore, KeyValueStoreExt};
pub use usage::UsageLimiter;
