//! Session phases, snapshots and submission outcomes

use serde::Serialize;
use thiserror::Error;

use crate::domain::chat::Message;

/// Canned questions offered as one-click shortcuts
pub const QUICK_QUESTIONS: [&str; 3] = [
    "What technologies do you use?",
    "Show me your projects",
    "Tell me about yourself",
];

/// Controller state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AwaitingResponse,
    Blocked,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResponse => write!(f, "awaiting_response"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// Why a submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("Question is empty")]
    EmptyInput,

    #[error("Still waiting for the previous answer")]
    Busy,

    #[error("Question limit reached")]
    Blocked,
}

/// Result of a submit or quick-submit command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A message was appended to the transcript
    Answered(Message),
    /// A request is in flight; the answer will show up in a later snapshot
    Pending,
    /// The request failed; nothing was appended or counted
    Failed(String),
    Rejected(SubmitRejection),
}

/// Read-only view of the chat state for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub input: String,
    pub messages: Vec<Message>,
    pub phase: SessionPhase,
    pub usage_count: u32,
    pub usage_limit: u32,
    /// Message from the last failed send, cleared by the next accepted one
    pub last_error: Option<String>,
}

impl ChatSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::AwaitingResponse
    }

    pub fn is_blocked(&self) -> bool {
        self.phase == SessionPhase::Blocked
    }

    pub fn remaining(&self) -> u32 {
        self.usage_limit.saturating_sub(self.usage_count)
    }
}
