//! Usage domain - lifetime question limit

mod limiter;

pub use limiter::{UsageLimiter, DEFAULT_USAGE_LIMIT, USAGE_KEY};
