//! Socket Mode connection management

mod socket;

pub use socket::{run_session, SessionEnd, SocketModeClient};
