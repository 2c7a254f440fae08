//! Application error types
//!
//! `ValidationError` is user-correctable and never reaches the network. `JoinError`
//! wraps every way a join or create attempt can fail; port errors collapse into
//! `Service` carrying their message unchanged.

use thiserror::Error;

use crate::ports::outbound::{DirectoryError, LoginGateError, VideoError};

/// Missing input detected before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("display name is required")]
    MissingName,
    #[error("town ID is required")]
    MissingTownId,
    #[error("town name is required")]
    MissingTownName,
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "missing-name",
            ValidationError::MissingTownId => "missing-town-id",
            ValidationError::MissingTownName => "missing-town-name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A collaborator failed; the message is shown to the user as is
    #[error("{0}")]
    Service(String),

    /// A collaborator broke its contract
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Another town connection is already in progress")]
    FlowInProgress,
}

impl JoinError {
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn validation_code(&self) -> Option<&'static str> {
        match self {
            JoinError::Validation(e) => Some(e.code()),
            _ => None,
        }
    }
}

impl From<DirectoryError> for JoinError {
    fn from(e: DirectoryError) -> Self {
        Self::Service(e.to_string())
    }
}

impl From<LoginGateError> for JoinError {
    fn from(e: LoginGateError) -> Self {
        Self::Service(e.to_string())
    }
}

impl From<VideoError> for JoinError {
    fn from(e: VideoError) -> Self {
        Self::Service(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_distinct() {
        assert_eq!(ValidationError::MissingName.code(), "missing-name");
        assert_eq!(ValidationError::MissingTownId.code(), "missing-town-id");
        assert_eq!(ValidationError::MissingTownName.code(), "missing-town-name");
    }

    #[test]
    fn directory_errors_keep_their_message() {
        let err: JoinError = DirectoryError::request("connection refused").into();
        assert_eq!(err, JoinError::Service("connection refused".into()));

        let err: JoinError = DirectoryError::Rejected("Invalid town ID".into()).into();
        assert_eq!(err.to_string(), "Error processing request: Invalid town ID");
    }

    #[test]
    fn validation_code_only_for_validation_errors() {
        assert_eq!(
            JoinError::from(ValidationError::MissingTownId).validation_code(),
            Some("missing-town-id")
        );
        assert_eq!(JoinError::FlowInProgress.validation_code(), None);
    }
}
