//! Request bodies sent to the towns service.

use serde::{Deserialize, Serialize};

/// Body of `POST /towns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownCreateRequest {
    pub friendly_name: String,
    pub is_publicly_listed: bool,
}

/// Body of `POST /sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownJoinRequest {
    pub user_name: String,
    #[serde(rename = "coveyTownID")]
    pub covey_town_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_request_uses_service_field_names() {
        let body = TownJoinRequest {
            user_name: "alice".into(),
            covey_town_id: "town1".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"userName": "alice", "coveyTownID": "town1"})
        );
    }

    #[test]
    fn create_request_uses_camel_case() {
        let body = TownCreateRequest {
            friendly_name: "Party".into(),
            is_publicly_listed: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"friendlyName": "Party", "isPubliclyListed": false})
        );
    }
}
