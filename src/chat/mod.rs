mod session;
mod transcript;

pub use session::{is_exit_sentinel, ChatSession, SessionReport, EXIT_SENTINEL, SEPARATOR};
pub use transcript::SessionLog;
