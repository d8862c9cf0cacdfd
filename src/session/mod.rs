//! Session management: the refresh scheduler, the session/UI event channel,
//! and the session lifecycle.

pub mod events;
pub mod poller;
pub mod session_manager;

pub use events::{SessionEvent, UiCommand};
pub use session_manager::{SessionConfig, SessionManager, SessionState, SessionStats};
