//! API middleware components

pub mod logging;

pub use logging::{logging_middleware, truncate_for_log, REQUEST_ID_HEADER};
