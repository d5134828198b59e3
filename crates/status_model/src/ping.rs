//! Outbound status ping structure.
//!
//! The field layout mirrors the JSON status response the host protocol sends
//! to clients before login: a description line, an optional players section
//! with a hover sample list, an optional version section, and an optional
//! embedded favicon data URI.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed identity used for synthetic hover sample entries.
///
/// Hover lines produced by the customization core are not real players, so
/// they all carry the nil UUID.
pub const PLACEHOLDER_PLAYER_ID: Uuid = Uuid::nil();

/// The outbound status response as the host protocol lays it out.
///
/// Sections that are absent on the wire stay absent here; the composer never
/// invents a players or version section that the host did not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPing {
    /// Server description line (the "message of the day").
    pub description: String,
    /// Player counts and hover sample, if the host included them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Players>,
    /// Version name and protocol number, if the host included them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ServerVersion>,
    /// Embedded server icon as a `data:image/png;base64,...` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

/// Players section of a status ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Players {
    pub max: i32,
    pub online: i32,
    /// Hover sample shown when the client mouses over the player count.
    #[serde(default)]
    pub sample: Vec<PlayerInfo>,
}

/// A single entry in the hover sample list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub id: Uuid,
}

/// Version section of a status ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub name: String,
    pub protocol: i32,
}

impl StatusPing {
    /// Creates a ping with only a description, no players/version sections.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            players: None,
            version: None,
            favicon: None,
        }
    }
}
