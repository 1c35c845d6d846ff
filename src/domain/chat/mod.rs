//! Chat domain - messages and the outbound client seam

mod client;
mod message;

pub use client::ChatClient;
pub use message::{ChatRequest, ChatResponse, Message};

#[cfg(test)]
pub use client::MockChatClient;
