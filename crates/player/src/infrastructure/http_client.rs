//! Towns service REST client
//!
//! Every endpoint answers with a `ResponseEnvelope`; the envelope is parsed whatever
//! the HTTP status so the service's own message reaches the user.

use std::time::Duration;

use async_trait::async_trait;
use covey_domain::{
    SessionCreateRequest, SessionCreateResult, SessionJoinRequest, SessionJoinResult, TownId,
    TownSummary,
};
use covey_shared::{
    CoveyTownInfo, EnvelopeError, ResponseEnvelope, TownCreateRequest, TownCreateResponse,
    TownJoinRequest, TownJoinResponse, TownListResponse,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::infrastructure::config::PlayerConfig;
use crate::ports::outbound::{DirectoryError, TownDirectoryPort};

/// Client for the Covey towns service
#[derive(Clone)]
pub struct TownsServiceClient {
    client: Client,
    base_url: String,
}

impl TownsServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.towns_service_url.as_str(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DirectoryError> {
        let response = request.send().await.map_err(DirectoryError::request)?;
        let status = response.status();
        let body = response.text().await.map_err(DirectoryError::request)?;

        let envelope: ResponseEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                DirectoryError::invalid_response(e)
            } else {
                DirectoryError::Request(format!("HTTP {status}: {body}"))
            }
        })?;

        envelope.into_result().map_err(|e| match e {
            EnvelopeError::Rejected(message) => DirectoryError::Rejected(message),
            EnvelopeError::MissingResponse => DirectoryError::invalid_response(e),
        })
    }
}

#[async_trait]
impl TownDirectoryPort for TownsServiceClient {
    async fn list_towns(&self) -> Result<Vec<TownSummary>, DirectoryError> {
        let listed: TownListResponse = self
            .send(self.client.get(format!("{}/towns", self.base_url)))
            .await?;
        Ok(listed
            .towns
            .into_iter()
            .filter_map(|info| match town_summary(info) {
                Ok(town) => Some(town),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed town in listing");
                    None
                }
            })
            .collect())
    }

    async fn create_town(
        &self,
        request: &SessionCreateRequest,
    ) -> Result<SessionCreateResult, DirectoryError> {
        let body = TownCreateRequest {
            friendly_name: request.friendly_name.to_string(),
            is_publicly_listed: request.is_publicly_listed,
        };
        let created: TownCreateResponse = self
            .send(
                self.client
                    .post(format!("{}/towns", self.base_url))
                    .json(&body),
            )
            .await?;

        Ok(SessionCreateResult {
            town_id: TownId::new(created.covey_town_id).map_err(DirectoryError::invalid_response)?,
            edit_password: created.covey_town_password,
        })
    }

    async fn join_session(
        &self,
        request: &SessionJoinRequest,
    ) -> Result<SessionJoinResult, DirectoryError> {
        let body = TownJoinRequest {
            user_name: request.display_name.to_string(),
            covey_town_id: request.town_id.to_string(),
        };
        let joined: TownJoinResponse = self
            .send(
                self.client
                    .post(format!("{}/sessions", self.base_url))
                    .json(&body),
            )
            .await?;

        Ok(SessionJoinResult {
            user_id: joined.covey_user_id,
            session_token: joined.covey_session_token,
            provider_video_token: joined.provider_video_token,
            friendly_name: joined.friendly_name,
            is_publicly_listed: joined.is_publicly_listed,
        })
    }
}

/// Towns in the listing are public by construction.
fn town_summary(info: CoveyTownInfo) -> Result<TownSummary, DirectoryError> {
    Ok(TownSummary {
        id: TownId::new(info.covey_town_id).map_err(DirectoryError::invalid_response)?,
        display_name: info.friendly_name,
        is_public: true,
        current_occupancy: info.current_occupancy,
        maximum_occupancy: info.maximum_occupancy,
    })
}
