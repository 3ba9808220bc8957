//! HTTP API response DTOs for the admin endpoints.

use serde::{Deserialize, Serialize};

use crate::{common::time::timestamp_to_rfc3339, domain::SessionSnapshot};

/// One registered session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub session_id: String,
    /// `None` while the handshake is still pending
    pub username: Option<String>,
    pub peer: String,
    pub connected_at: String, // RFC 3339
}

impl From<&SessionSnapshot> for SessionDto {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            session_id: snapshot.id.to_string(),
            username: snapshot
                .username
                .as_ref()
                .map(|name| name.as_str().to_string()),
            peer: snapshot.peer.to_string(),
            connected_at: timestamp_to_rfc3339(snapshot.connected_at.value()),
        }
    }
}

/// Session counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCountDto {
    /// Registered sessions, including ones still awaiting a name
    pub connected: usize,
    /// Sessions that completed the handshake
    pub active: usize,
}
