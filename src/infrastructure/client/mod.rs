//! Chat client infrastructure - HTTP implementation of the chat client

mod http_chat_client;

pub use http_chat_client::{HttpChatClient, DEFAULT_ROUTE, DEFAULT_TIMEOUT};
