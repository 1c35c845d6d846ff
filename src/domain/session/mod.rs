//! Session domain - the chat controller state machine

mod controller;
mod handle;
mod state;

pub use controller::ChatSession;
pub use handle::SessionHandle;
pub use state::{ChatSnapshot, SessionPhase, SubmitOutcome, SubmitRejection, QUICK_QUESTIONS};
