//! Video Handoff Port - hands the provider token to the video subsystem

use async_trait::async_trait;

use crate::state::SessionContext;

use super::VideoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoHandoffPort: Send + Sync {
    /// Connect the video call for `context` using a provider token.
    ///
    /// The token is moved in: it is valid for this attempt only.
    async fn connect(&self, context: &SessionContext, token: String) -> Result<(), VideoError>;
}
