//! Login Gate Port - confirms a freshly established session
//!
//! Returning `Ok(false)` is a normal outcome (the user did not log in), not an error.

use async_trait::async_trait;
use covey_domain::SessionJoinResult;

use super::LoginGateError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginGatePort: Send + Sync {
    async fn confirm(&self, session: &SessionJoinResult) -> Result<bool, LoginGateError>;
}
