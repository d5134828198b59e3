//! The sparse overlay value produced by the decision core for each ping.

/// Per-ping customization result.
///
/// Every field is independently present or absent; an absent field means
/// "leave the corresponding target field untouched". The core fills in only
/// what it actually wants to change, so applying a default (fully absent)
/// response is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub description: Option<String>,
    pub players_online: Option<i32>,
    pub max_players: Option<i32>,
    pub player_hover: Option<String>,
    pub version: Option<String>,
    pub protocol: Option<i32>,
}

impl Response {
    /// Returns true if no field is present, i.e. applying this response
    /// would leave any target unchanged.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.players_online.is_none()
            && self.max_players.is_none()
            && self.player_hover.is_none()
            && self.version.is_none()
            && self.protocol.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response_is_empty() {
        assert!(Response::default().is_empty());
    }

    #[test]
    fn test_any_present_field_makes_it_non_empty() {
        let response = Response {
            protocol: Some(767),
            ..Default::default()
        };
        assert!(!response.is_empty());
    }
}
