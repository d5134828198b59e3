//! Merging a sparse response onto an outbound ping.

use crate::ping::{PlayerInfo, StatusPing, PLACEHOLDER_PLAYER_ID};
use crate::response::Response;

impl Response {
    /// Overlays this response onto `ping`, field by field.
    ///
    /// Only present fields are written, and only into sections the ping
    /// already has: player counts and hover text require an existing players
    /// section, version name and protocol an existing version section. A
    /// present hover text replaces the whole sample list with a single
    /// synthetic entry carrying the placeholder identity.
    ///
    /// This is a strict partial overlay, never a full replace; applying the
    /// same response twice is equivalent to applying it once.
    pub fn apply_to(&self, ping: &mut StatusPing) {
        if let Some(description) = &self.description {
            ping.description = description.clone();
        }

        if let Some(players) = &mut ping.players {
            if let Some(online) = self.players_online {
                players.online = online;
            }
            if let Some(max) = self.max_players {
                players.max = max;
            }
            if let Some(hover) = &self.player_hover {
                players.sample = vec![PlayerInfo {
                    name: hover.clone(),
                    id: PLACEHOLDER_PLAYER_ID,
                }];
            }
        }

        if let Some(version) = &mut ping.version {
            if let Some(name) = &self.version {
                version.name = name.clone();
            }
            if let Some(protocol) = self.protocol {
                version.protocol = protocol;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ping::{Players, ServerVersion};

    fn target() -> StatusPing {
        StatusPing {
            description: "Old".to_string(),
            players: Some(Players {
                max: 3,
                online: 3,
                sample: vec![],
            }),
            version: Some(ServerVersion {
                name: "1.21".to_string(),
                protocol: 767,
            }),
            favicon: None,
        }
    }

    #[test]
    fn test_empty_response_leaves_target_unchanged() {
        let mut ping = target();
        let before = ping.clone();

        Response::default().apply_to(&mut ping);

        assert_eq!(ping, before);
    }

    #[test]
    fn test_partial_overlay_scenario() {
        // Response{description="Hi", playersOnline=absent, maxPlayers=5}
        // onto target{description="Old", online=3, max=3}.
        let mut ping = target();
        let response = Response {
            description: Some("Hi".to_string()),
            max_players: Some(5),
            ..Default::default()
        };

        response.apply_to(&mut ping);

        assert_eq!(ping.description, "Hi");
        let players = ping.players.unwrap();
        assert_eq!(players.online, 3);
        assert_eq!(players.max, 5);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let response = Response {
            description: Some("Hi".to_string()),
            players_online: Some(12),
            player_hover: Some("Welcome!".to_string()),
            protocol: Some(999),
            ..Default::default()
        };

        let mut once = target();
        response.apply_to(&mut once);

        let mut twice = target();
        response.apply_to(&mut twice);
        response.apply_to(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_hover_replaces_sample_with_synthetic_entry() {
        let mut ping = target();
        ping.players.as_mut().unwrap().sample = vec![
            PlayerInfo {
                name: "Steve".to_string(),
                id: uuid::Uuid::new_v4(),
            },
            PlayerInfo {
                name: "Alex".to_string(),
                id: uuid::Uuid::new_v4(),
            },
        ];

        let response = Response {
            player_hover: Some("Hello there".to_string()),
            ..Default::default()
        };
        response.apply_to(&mut ping);

        let sample = &ping.players.unwrap().sample;
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].name, "Hello there");
        assert_eq!(sample[0].id, PLACEHOLDER_PLAYER_ID);
    }

    #[test]
    fn test_absent_target_sections_are_not_created() {
        let mut ping = StatusPing::new("Old");
        let response = Response {
            players_online: Some(99),
            max_players: Some(100),
            player_hover: Some("hover".to_string()),
            version: Some("Custom".to_string()),
            protocol: Some(1),
            ..Default::default()
        };

        response.apply_to(&mut ping);

        assert!(ping.players.is_none());
        assert!(ping.version.is_none());
        assert_eq!(ping.description, "Old");
    }

    #[test]
    fn test_version_overlay() {
        let mut ping = target();
        let response = Response {
            version: Some("Maintenance".to_string()),
            protocol: Some(-1),
            ..Default::default()
        };

        response.apply_to(&mut ping);

        let version = ping.version.unwrap();
        assert_eq!(version.name, "Maintenance");
        assert_eq!(version.protocol, -1);
    }
}
