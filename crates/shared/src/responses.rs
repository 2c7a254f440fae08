//! Response types returned by the towns service
//!
//! Every endpoint answers with a `ResponseEnvelope` whose `response` field carries the
//! endpoint-specific payload when `isOK` is true.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Envelope
// =============================================================================

/// Wrapper around every towns service response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(rename = "isOK")]
    pub is_ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub response: Option<T>,
}

/// Why an envelope could not be unwrapped into its payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The service answered `isOK: false`
    #[error("Error processing request: {0}")]
    Rejected(String),
    /// The service answered `isOK: true` but sent no payload
    #[error("Response payload missing")]
    MissingResponse,
}

impl<T> ResponseEnvelope<T> {
    pub fn ok(response: T) -> Self {
        Self {
            is_ok: true,
            message: None,
            response: Some(response),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_ok: false,
            message: Some(message.into()),
            response: None,
        }
    }

    /// Unwrap the payload, turning a rejection into an error carrying the service message.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if !self.is_ok {
            return Err(EnvelopeError::Rejected(self.message.unwrap_or_default()));
        }
        self.response.ok_or(EnvelopeError::MissingResponse)
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// One publicly listed town
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveyTownInfo {
    pub friendly_name: String,
    #[serde(rename = "coveyTownID")]
    pub covey_town_id: String,
    pub current_occupancy: u32,
    pub maximum_occupancy: u32,
}

/// Payload of `GET /towns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownListResponse {
    pub towns: Vec<CoveyTownInfo>,
}

/// Payload of `POST /towns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownCreateResponse {
    #[serde(rename = "coveyTownID")]
    pub covey_town_id: String,
    #[serde(rename = "coveyTownPassword")]
    pub covey_town_password: String,
}

/// Payload of `POST /sessions`
///
/// The service also sends the current player list; the client does not use it
/// at join time, so it is ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownJoinResponse {
    #[serde(rename = "coveyUserID")]
    pub covey_user_id: String,
    pub covey_session_token: String,
    #[serde(default)]
    pub provider_video_token: String,
    pub friendly_name: String,
    pub is_publicly_listed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_envelope_carries_service_message() {
        let envelope: ResponseEnvelope<TownListResponse> =
            serde_json::from_value(json!({"isOK": false, "message": "Invalid password"}))
                .unwrap();

        let err = envelope.into_result().unwrap_err();
        assert_eq!(err, EnvelopeError::Rejected("Invalid password".into()));
        assert_eq!(err.to_string(), "Error processing request: Invalid password");
    }

    #[test]
    fn ok_envelope_without_payload_is_an_error() {
        let envelope: ResponseEnvelope<TownCreateResponse> =
            serde_json::from_value(json!({"isOK": true})).unwrap();

        assert_eq!(envelope.into_result(), Err(EnvelopeError::MissingResponse));
    }

    #[test]
    fn join_response_ignores_player_list() {
        let envelope: ResponseEnvelope<TownJoinResponse> = serde_json::from_value(json!({
            "isOK": true,
            "response": {
                "coveyUserID": "u1",
                "coveySessionToken": "s1",
                "providerVideoToken": "tok-1",
                "currentPlayers": [{"_id": "p1", "_userName": "bob"}],
                "friendlyName": "Party",
                "isPubliclyListed": false
            }
        }))
        .unwrap();

        let response = envelope.into_result().unwrap();
        assert_eq!(response.provider_video_token, "tok-1");
        assert!(!response.is_publicly_listed);
    }

    #[test]
    fn town_list_parses_service_field_names() {
        let listing: TownListResponse = serde_json::from_value(json!({
            "towns": [{
                "friendlyName": "Lobby",
                "coveyTownID": "t1",
                "currentOccupancy": 2,
                "maximumOccupancy": 8
            }]
        }))
        .unwrap();

        assert_eq!(listing.towns[0].covey_town_id, "t1");
        assert_eq!(listing.towns[0].maximum_occupancy, 8);
    }
}
