//! Adapters for running without a UI
//!
//! The headless runner has nobody to ask for a login and no video stack, so the gate
//! always confirms and the handoff only records the connection.

use async_trait::async_trait;
use covey_domain::SessionJoinResult;

use crate::ports::outbound::{LoginGateError, LoginGatePort, VideoError, VideoHandoffPort};
use crate::state::SessionContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirmLoginGate;

#[async_trait]
impl LoginGatePort for AutoConfirmLoginGate {
    async fn confirm(&self, session: &SessionJoinResult) -> Result<bool, LoginGateError> {
        tracing::debug!(user_id = %session.user_id, town = %session.friendly_name, "Auto-confirming login");
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingVideoHandoff;

#[async_trait]
impl VideoHandoffPort for LoggingVideoHandoff {
    async fn connect(&self, context: &SessionContext, token: String) -> Result<(), VideoError> {
        if token.is_empty() {
            return Err(VideoError::ConnectFailed("empty provider token".into()));
        }
        tracing::info!(
            session_id = %context.id(),
            token_len = token.len(),
            "Video handoff accepted provider token"
        );
        Ok(())
    }
}
