//! Frames sent over the WebSocket push channel.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, ServerInfo};

/// An event pushed from the server to a subscriber.
///
/// `#[serde(tag = "event", content = "data")]` produces "adjacently
/// tagged" JSON, the shape socket.io-style clients already listen for:
///
/// ```text
/// { "event": "server:info", "data": { "name": "…", "playersOnline": 0, … } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PushEvent {
    /// Sent once, right after a subscriber connects.
    #[serde(rename = "server:info")]
    ServerInfo(ServerInfo),
}

impl PushEvent {
    /// Encodes the event as a JSON text frame.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Decodes an event from a JSON frame.
    pub fn from_json(data: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
