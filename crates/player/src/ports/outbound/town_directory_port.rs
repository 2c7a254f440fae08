//! Town Directory Port - list, create and join towns
//!
//! Only `list_towns` is idempotent. `create_town` and `join_session` may have
//! side effects on the service, so callers issue each of them at most once per
//! user action and never retry.

use async_trait::async_trait;
use covey_domain::{
    SessionCreateRequest, SessionCreateResult, SessionJoinRequest, SessionJoinResult,
    TownSummary,
};

use super::DirectoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TownDirectoryPort: Send + Sync {
    /// Publicly listed towns, in the order the service returns them.
    async fn list_towns(&self) -> Result<Vec<TownSummary>, DirectoryError>;

    async fn create_town(
        &self,
        request: &SessionCreateRequest,
    ) -> Result<SessionCreateResult, DirectoryError>;

    /// Establish a session for `request.display_name` in `request.town_id`.
    async fn join_session(
        &self,
        request: &SessionJoinRequest,
    ) -> Result<SessionJoinResult, DirectoryError>;
}
