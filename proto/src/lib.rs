//! Network protocol for two-controller Pong
//!
//! Every message is a JSON object tagged by a snake_case `type` field.

use serde::{Deserialize, Serialize};

/// Role slot a controller occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player1,
    Player2,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Player1, Role::Player2];

    pub fn slot(self) -> usize {
        match self {
            Role::Player1 => 0,
            Role::Player2 => 1,
        }
    }
}

/// Paddle input sent by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Stop,
}

// ============================================================================
// Client to Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Screen announces itself; origin is where controllers should connect
    RegisterScreen {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
    /// Controller asks for a role slot
    RegisterPlayer,
    Move {
        direction: Direction,
    },
    /// First player opts to play the computer
    StartVsAi,
    RestartGame,
    /// Screen reports the end of a round
    GameEnded {
        winner: Role,
    },
    WaitForPlayers,
}

// ============================================================================
// Server to Client
// ============================================================================

/// Everything the relay sends. The screen only ever receives the
/// screen-bound variants and controllers the player-bound ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    // --- screen-bound ---
    QrCode {
        #[serde(rename = "qrCode")]
        qr_code: String,
        url: String,
    },
    HideQr,
    ShowQr,
    StartGame,
    EnableAi,
    PlayerMove {
        player: Role,
        direction: Direction,
    },
    PlayerDisconnected {
        player: Role,
    },
    AllPlayersDisconnected,
    RestartGame {
        #[serde(rename = "aiMode")]
        ai_mode: bool,
    },
    #[serde(rename = "player1_connected")]
    Player1Connected,

    // --- player-bound ---
    Assigned {
        player: Role,
    },
    Error {
        message: String,
    },
    GameEnded {
        winner: Role,
    },
    GameRestarted,
    GameStart,
}

impl ServerMsg {
    /// Whether this message is meant for the screen rather than a controller
    pub fn is_screen_bound(&self) -> bool {
        matches!(
            self,
            ServerMsg::QrCode { .. }
                | ServerMsg::HideQr
                | ServerMsg::ShowQr
                | ServerMsg::StartGame
                | ServerMsg::EnableAi
                | ServerMsg::PlayerMove { .. }
                | ServerMsg::PlayerDisconnected { .. }
                | ServerMsg::AllPlayersDisconnected
                | ServerMsg::RestartGame { .. }
                | ServerMsg::Player1Connected
        )
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl ClientMsg {
    /// Serialize ClientMsg to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize ClientMsg from a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ServerMsg {
    /// Serialize ServerMsg to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize ServerMsg from a JSON text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_move_wire_format() {
        let msg = ClientMsg::from_json(r#"{"type":"move","direction":"left"}"#)
            .expect("Deserialization should succeed");
        assert_eq!(
            msg,
            ClientMsg::Move {
                direction: Direction::Left
            }
        );
    }

    #[test]
    fn test_register_screen_origin_is_optional() {
        let bare = ClientMsg::from_json(r#"{"type":"register_screen"}"#).expect("bare");
        assert_eq!(bare, ClientMsg::RegisterScreen { origin: None });

        let with_origin =
            ClientMsg::from_json(r#"{"type":"register_screen","origin":"http://10.0.0.2:8787"}"#)
                .expect("with origin");
        assert_eq!(
            with_origin,
            ClientMsg::RegisterScreen {
                origin: Some("http://10.0.0.2:8787".to_string())
            }
        );
    }

    #[test]
    fn test_unit_variants_parse() {
        for (text, expected) in [
            (r#"{"type":"register_player"}"#, ClientMsg::RegisterPlayer),
            (r#"{"type":"start_vs_ai"}"#, ClientMsg::StartVsAi),
            (r#"{"type":"restart_game"}"#, ClientMsg::RestartGame),
            (r#"{"type":"wait_for_players"}"#, ClientMsg::WaitForPlayers),
        ] {
            assert_eq!(ClientMsg::from_json(text).expect(text), expected);
        }
    }

    #[test]
    fn test_qr_code_uses_camel_case_field() {
        let msg = ServerMsg::QrCode {
            qr_code: "data:image/svg+xml,abc".to_string(),
            url: "http://host/controller.html".to_string(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&msg.to_json().expect("serialize")).expect("valid json");
        assert_eq!(
            value,
            json!({"type": "qr_code", "qrCode": "data:image/svg+xml,abc", "url": "http://host/controller.html"})
        );
    }

    #[test]
    fn test_restart_and_player_messages() {
        let restart = ServerMsg::RestartGame { ai_mode: true }.to_json().expect("ser");
        assert_eq!(restart, r#"{"type":"restart_game","aiMode":true}"#);

        let moved = ServerMsg::PlayerMove {
            player: Role::Player2,
            direction: Direction::Stop,
        }
        .to_json()
        .expect("ser");
        assert_eq!(
            moved,
            r#"{"type":"player_move","player":"player2","direction":"stop"}"#
        );

        let connected = ServerMsg::Player1Connected.to_json().expect("ser");
        assert_eq!(connected, r#"{"type":"player1_connected"}"#);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(ClientMsg::from_json("not json").is_err());
        assert!(ClientMsg::from_json(r#"{"type":"teleport"}"#).is_err());
        assert!(ClientMsg::from_json(r#"{"type":"move","direction":"up"}"#).is_err());
    }

    #[test]
    fn test_screen_bound_split() {
        assert!(ServerMsg::StartGame.is_screen_bound());
        assert!(ServerMsg::AllPlayersDisconnected.is_screen_bound());
        assert!(!ServerMsg::GameStart.is_screen_bound());
        assert!(!ServerMsg::Assigned {
            player: Role::Player1
        }
        .is_screen_bound());
    }
}
