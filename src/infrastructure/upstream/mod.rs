//! Upstream infrastructure - forwarding to the question-answering service

mod client;

pub use client::{UpstreamClient, UpstreamReply, DEFAULT_ASK_PATH};
