//! Chat client trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::ChatResponse;
use crate::domain::DomainError;

/// Outbound question-answering call used by the chat session
///
/// Implementations make exactly one request per call and never cache or retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatClient: Send + Sync + std::fmt::Debug {
    async fn ask_question(&self, question: &str) -> Result<ChatResponse, DomainError>;
}
