//! Session join/create payloads exchanged with the towns directory.

use serde::{Deserialize, Serialize};

use crate::value_objects::{DisplayName, FriendlyName, TownId};

/// Request to join (establish a session in) an existing town.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionJoinRequest {
    pub display_name: DisplayName,
    pub town_id: TownId,
}

/// Result of a successful session join.
///
/// Deliberately not `Clone`: a result is consumed by the login gate and then by
/// the video handoff within a single attempt, and is never reused.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionJoinResult {
    pub user_id: String,
    pub session_token: String,
    pub provider_video_token: String,
    pub friendly_name: String,
    pub is_publicly_listed: bool,
}

impl SessionJoinResult {
    pub fn has_video_token(&self) -> bool {
        !self.provider_video_token.is_empty()
    }

    /// Consume the result, handing out the provider token.
    pub fn into_video_token(self) -> String {
        self.provider_video_token
    }
}

/// Request to create a new town.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCreateRequest {
    pub friendly_name: FriendlyName,
    pub is_publicly_listed: bool,
}

/// Credentials of a freshly created town.
///
/// The edit password is shown to the user once and never stored by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreateResult {
    pub town_id: TownId,
    pub edit_password: String,
}
