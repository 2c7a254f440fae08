//! Error types for outbound port operations.
//!
//! Display strings are shown to the user verbatim, so they carry the underlying
//! failure text rather than a code.

/// Failures talking to the towns directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The request never produced a usable HTTP response.
    #[error("{0}")]
    Request(String),

    /// The service processed the request and refused it.
    #[error("Error processing request: {0}")]
    Rejected(String),

    /// The service answered with something that is not a valid payload.
    #[error("Invalid response from towns service: {0}")]
    InvalidResponse(String),
}

impl DirectoryError {
    pub fn request(message: impl ToString) -> Self {
        Self::Request(message.to_string())
    }

    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse(message.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginGateError {
    #[error("Login failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VideoError {
    #[error("Video connection failed: {0}")]
    ConnectFailed(String),
}
