//! Chat wire and transcript types

use serde::{Deserialize, Serialize};

/// Body sent to the proxy and forwarded upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Successful answer returned by the upstream service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
}

/// One completed question/answer exchange in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub question: String,
    pub answer: String,
}

impl Message {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

impl From<ChatResponse> for Message {
    fn from(response: ChatResponse) -> Self {
        Self {
            question: response.question,
            answer: response.answer,
        }
    }
}
