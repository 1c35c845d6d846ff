//! Application state for the proxy

use std::sync::Arc;

use crate::infrastructure::upstream::UpstreamClient;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream: Arc::new(upstream),
        }
    }
}
