//! Request and response bodies of the HTTP API.
//!
//! One struct per endpoint shape. The server crate builds these and hands
//! them to `axum::Json`; tests and clients deserialize them back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Player, PlayerSummary};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/server/auth`, `/api/players/join` and `/api/players/leave`.
///
/// `username` is kept as a raw JSON value: a missing field, `null`, a
/// number or an object all have to be rejected as invalid input rather
/// than failing deserialization with a framework error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: Option<serde_json::Value>,
}

impl UsernameRequest {
    /// Builds a request carrying a string username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(serde_json::Value::String(username.into())),
        }
    }

    /// The username, if one was sent and it is a JSON string.
    pub fn username(&self) -> Option<&str> {
        self.username.as_ref().and_then(serde_json::Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime: u64,
}

/// `POST /api/server/auth` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub username: String,
    pub message: String,
}

/// `POST /api/players/join` on success (201).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    pub message: String,
    pub player: Player,
    pub players_online: usize,
}

/// `POST /api/players/leave` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveResponse {
    pub success: bool,
    pub message: String,
    pub players_online: usize,
}

/// `GET /api/players`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub players: Vec<PlayerSummary>,
    pub count: usize,
    pub max_players: usize,
}

/// `GET /`: a descriptive payload listing the endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    pub name: String,
    pub status: String,
    pub version: String,
    pub message: String,
    /// Endpoint label → `"METHOD /path"`. A `BTreeMap` keeps the JSON key
    /// order stable across runs.
    pub endpoints: BTreeMap<String, String>,
}

/// Body of every non-2xx response.
///
/// `message` carries fault details and is only filled in development
/// mode; `path` is only set for unmatched routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    /// An error body with only the `error` field.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_request_accepts_string() {
        let req: UsernameRequest =
            serde_json::from_str(r#"{"username":"steve"}"#).unwrap();
        assert_eq!(req.username(), Some("steve"));
    }

    #[test]
    fn test_username_request_missing_field_is_none() {
        let req: UsernameRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.username(), None);
    }

    #[test]
    fn test_username_request_non_string_is_none() {
        // A number or object must not sneak through as a username.
        for body in [
            r#"{"username":42}"#,
            r#"{"username":null}"#,
            r#"{"username":{"name":"x"}}"#,
            r#"{"username":["a"]}"#,
        ] {
            let req: UsernameRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.username(), None, "body {body} should be rejected");
        }
    }

    #[test]
    fn test_username_request_new_round_trips_through_json() {
        let req = UsernameRequest::new("alex");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "username": "alex" }));
    }

    #[test]
    fn test_error_body_skips_empty_optionals() {
        let json = serde_json::to_value(ErrorBody::new("Servidor cheio")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Servidor cheio" }));
    }

    #[test]
    fn test_error_body_includes_path_when_set() {
        let body = ErrorBody {
            path: Some("/nope".into()),
            ..ErrorBody::new("Rota não encontrada")
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["path"], "/nope");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_leave_response_uses_camel_case() {
        let resp = LeaveResponse {
            success: true,
            message: "Jogador desconectado".into(),
            players_online: 0,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["playersOnline"], 0);
    }

    #[test]
    fn test_player_list_response_uses_camel_case() {
        let resp = PlayerListResponse {
            players: Vec::new(),
            count: 0,
            max_players: 10,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["maxPlayers"], 10);
        assert_eq!(json["players"], serde_json::json!([]));
    }
}
