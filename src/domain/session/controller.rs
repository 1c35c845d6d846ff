//! Chat session controller
//!
//! Owns the transcript and drives the cache, the usage limiter and the chat
//! client through the `Idle -> AwaitingResponse -> Idle | Blocked` cycle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::state::{ChatSnapshot, SessionPhase, SubmitOutcome, SubmitRejection};
use crate::domain::cache::AnswerCache;
use crate::domain::chat::{ChatClient, ChatResponse, Message};
use crate::domain::usage::UsageLimiter;
use crate::domain::DomainError;

/// First step of a submission
#[derive(Debug)]
pub(super) enum Submission {
    Rejected(SubmitRejection),
    /// Served from the cache and already appended
    Answered(Message),
    /// Cache miss; the question must be sent to the client
    Dispatch(String),
}

/// Single-owner chat controller
#[derive(Debug)]
pub struct ChatSession {
    client: Arc<dyn ChatClient>,
    cache: AnswerCache,
    limiter: UsageLimiter,
    input: String,
    messages: Vec<Message>,
    phase: SessionPhase,
    usage_count: u32,
    last_error: Option<String>,
}

impl ChatSession {
    /// Creates a session, hydrating the transcript and usage from storage
    pub fn new(client: Arc<dyn ChatClient>, cache: AnswerCache, limiter: UsageLimiter) -> Self {
        let usage_count = limiter.current_count();
        let messages = cache.load_all();
        let phase = if limiter.is_blocked(usage_count) {
            SessionPhase::Blocked
        } else {
            SessionPhase::Idle
        };

        info!(
            usage_count,
            usage_limit = limiter.limit(),
            cached_messages = messages.len(),
            phase = %phase,
            "Chat session started"
        );

        Self {
            client,
            cache,
            limiter,
            input: String::new(),
            messages,
            phase,
            usage_count,
            last_error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            input: self.input.clone(),
            messages: self.messages.clone(),
            phase: self.phase,
            usage_count: self.usage_count,
            usage_limit: self.limiter.limit(),
            last_error: self.last_error.clone(),
        }
    }

    /// Replaces the input text; ignored unless the session is idle
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }

        self.input = text.into();
        true
    }

    /// Submits the current input and waits for the answer
    pub async fn submit(&mut self) -> SubmitOutcome {
        let submission = self.begin_submit();
        self.drive(submission).await
    }

    /// Pre-fills a canned question and submits it
    pub async fn quick_submit(&mut self, question: &str) -> SubmitOutcome {
        let submission = self.begin_quick_submit(question);
        self.drive(submission).await
    }

    async fn drive(&mut self, submission: Submission) -> SubmitOutcome {
        match submission {
            Submission::Rejected(reason) => SubmitOutcome::Rejected(reason),
            Submission::Answered(message) => SubmitOutcome::Answered(message),
            Submission::Dispatch(question) => {
                let result = self.client.ask_question(&question).await;

                match self.complete(&question, result) {
                    Ok(message) => SubmitOutcome::Answered(message),
                    Err(message) => SubmitOutcome::Failed(message),
                }
            }
        }
    }

    pub(super) fn client(&self) -> Arc<dyn ChatClient> {
        self.client.clone()
    }

    pub(super) fn begin_submit(&mut self) -> Submission {
        if let Some(reason) = self.refusal() {
            return Submission::Rejected(reason);
        }

        let question = self.input.trim().to_string();

        if question.is_empty() {
            return Submission::Rejected(SubmitRejection::EmptyInput);
        }

        self.phase = SessionPhase::AwaitingResponse;
        self.last_error = None;

        match self.cache.lookup(&question) {
            Some(answer) => {
                debug!(question = %question, "Answer served from cache");
                Submission::Answered(self.finish(Message::new(question, answer)))
            }
            None => {
                debug!(question = %question, "Cache miss, dispatching question");
                Submission::Dispatch(question)
            }
        }
    }

    pub(super) fn begin_quick_submit(&mut self, question: &str) -> Submission {
        if let Some(reason) = self.refusal() {
            return Submission::Rejected(reason);
        }

        self.input = question.to_string();
        self.begin_submit()
    }

    /// Applies the client's result to a dispatched question
    ///
    /// Returns the appended message, or the failure text shown to the user.
    pub(super) fn complete(
        &mut self,
        question: &str,
        result: Result<ChatResponse, DomainError>,
    ) -> Result<Message, String> {
        if self.phase != SessionPhase::AwaitingResponse {
            warn!(phase = %self.phase, question = %question, "Ignoring completion outside of a pending request");
            return Err("No question was pending".to_string());
        }

        match result {
            Ok(response) => {
                self.cache.store(question, &response.answer);
                Ok(self.finish(Message::from(response)))
            }
            Err(e) => {
                error!(error = %e, status = ?e.status(), question = %question, "Error sending message");
                let message = format!("Could not get an answer: {}", e.message());

                self.phase = SessionPhase::Idle;
                self.last_error = Some(message.clone());
                Err(message)
            }
        }
    }

    fn refusal(&mut self) -> Option<SubmitRejection> {
        if self.phase == SessionPhase::AwaitingResponse {
            return Some(SubmitRejection::Busy);
        }

        if self.phase == SessionPhase::Blocked || self.limiter.is_blocked(self.usage_count) {
            self.phase = SessionPhase::Blocked;
            return Some(SubmitRejection::Blocked);
        }

        None
    }

    fn finish(&mut self, message: Message) -> Message {
        self.messages.push(message.clone());
        self.input.clear();
        self.usage_count = self.limiter.increment(self.usage_count);

        self.phase = if self.limiter.is_blocked(self.usage_count) {
            SessionPhase::Blocked
        } else {
            SessionPhase::Idle
        };

        info!(
            usage_count = self.usage_count,
            transcript_len = self.messages.len(),
            phase = %self.phase,
            "Question answered"
        );

        message
    }
}
