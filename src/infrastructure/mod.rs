//! Infrastructure layer - External service implementations

pub mod client;
pub mod logging;
pub mod storage;
pub mod upstream;
