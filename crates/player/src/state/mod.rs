//! Per-session state shared between the orchestrator, the refresher and the
//! video handoff.

mod session_context;

pub use session_context::{ActiveConnection, SessionContext};
