//! Controller State Machine
//!
//! Drives a phone controller from relay messages and button presses.

use crate::network::decode_server_message;
use proto::{ClientMsg, Direction, Role, ServerMsg};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Controller phases
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Connecting,
    ModeSelection,
    WaitingForOpponent,
    Playing,
    GameOver,
    Rejected,
    Disconnected,
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAction {
    Assigned(Role),
    Refused,
    GameStart,
    GameEnded,
    GameRestarted,
    PlayVsAi,
    WaitForOpponent,
    PlayAgain,
    WaitForPlayers,
    Exit,
    ConnectionLost,
}

/// Next phase for an action, if the action is valid from `phase`
pub fn next_phase(phase: ControllerPhase, action: ControllerAction) -> Option<ControllerPhase> {
    use ControllerAction as A;
    use ControllerPhase as P;

    match (phase, action) {
        (P::Connecting, A::Assigned(Role::Player1)) => Some(P::ModeSelection),
        (P::Connecting, A::Assigned(Role::Player2)) => Some(P::Playing),
        (P::Connecting, A::Refused) => Some(P::Rejected),

        (P::ModeSelection, A::PlayVsAi) => Some(P::Playing),
        (P::ModeSelection, A::WaitForOpponent) => Some(P::WaitingForOpponent),
        (P::ModeSelection | P::WaitingForOpponent, A::GameStart) => Some(P::Playing),
        (P::WaitingForOpponent, A::PlayVsAi) => Some(P::Playing),

        (P::Playing, A::GameEnded) => Some(P::GameOver),
        (P::Playing, A::GameStart | A::GameRestarted) => Some(P::Playing),

        (P::GameOver, A::PlayAgain | A::GameRestarted | A::GameStart) => Some(P::Playing),
        (P::GameOver, A::WaitForPlayers) => Some(P::ModeSelection),

        (P::Rejected, A::Exit) => Some(P::Disconnected),
        (P::Rejected, _) => None,
        (_, A::Exit | A::ConnectionLost) => Some(P::Disconnected),

        _ => None,
    }
}

pub struct ControllerApp {
    phase: ControllerPhase,
    role: Option<Role>,
    rejection: Option<String>,
    winner: Option<Role>,
    held: Direction,
    outbox: Vec<ClientMsg>,
}

impl Default for ControllerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerApp {
    pub fn new() -> Self {
        Self {
            phase: ControllerPhase::Connecting,
            role: None,
            rejection: None,
            winner: None,
            held: Direction::Stop,
            outbox: Vec::new(),
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn take_outbox(&mut self) -> Vec<ClientMsg> {
        std::mem::take(&mut self.outbox)
    }

    /// Ask the relay for a slot once the socket is open
    pub fn register(&mut self) {
        self.outbox.push(ClientMsg::RegisterPlayer);
    }

    fn transition(&mut self, action: ControllerAction) -> bool {
        match next_phase(self.phase, action) {
            Some(next) => {
                if next != self.phase {
                    log::debug!("Controller {:?} -> {:?} on {:?}", self.phase, next, action);
                }
                self.phase = next;
                if next != ControllerPhase::Playing {
                    self.held = Direction::Stop;
                }
                true
            }
            None => {
                log::debug!("Ignoring {:?} in {:?}", action, self.phase);
                false
            }
        }
    }

    pub fn handle_text(&mut self, text: &str) {
        match decode_server_message(text) {
            Ok(msg) => self.handle_message(msg),
            Err(e) => log::warn!("{e}"),
        }
    }

    pub fn handle_message(&mut self, msg: ServerMsg) {
        if msg.is_screen_bound() {
            log::debug!("Controller ignoring {msg:?}");
            return;
        }
        match msg {
            ServerMsg::Assigned { player } => {
                if self.transition(ControllerAction::Assigned(player)) {
                    self.role = Some(player);
                }
            }
            ServerMsg::Error { message } => {
                if self.transition(ControllerAction::Refused) {
                    self.rejection = Some(message);
                }
            }
            ServerMsg::GameStart => {
                self.transition(ControllerAction::GameStart);
            }
            ServerMsg::GameEnded { winner } => {
                if self.transition(ControllerAction::GameEnded) {
                    self.winner = Some(winner);
                }
            }
            ServerMsg::GameRestarted => {
                self.transition(ControllerAction::GameRestarted);
            }
            _ => {}
        }
    }

    /// Steer. Repeats of the held direction are not re-sent.
    pub fn press(&mut self, direction: Direction) {
        if self.phase != ControllerPhase::Playing || direction == self.held {
            return;
        }
        self.held = direction;
        self.outbox.push(ClientMsg::Move { direction });
    }

    pub fn release(&mut self) {
        self.press(Direction::Stop);
    }

    pub fn play_vs_ai(&mut self) {
        if self.transition(ControllerAction::PlayVsAi) {
            self.outbox.push(ClientMsg::StartVsAi);
        }
    }

    /// Stay in the lobby until a second controller joins; nothing is sent
    pub fn wait_for_opponent(&mut self) {
        self.transition(ControllerAction::WaitForOpponent);
    }

    pub fn play_again(&mut self) {
        if self.transition(ControllerAction::PlayAgain) {
            self.outbox.push(ClientMsg::RestartGame);
        }
    }

    pub fn wait_for_players(&mut self) {
        if self.transition(ControllerAction::WaitForPlayers) {
            self.outbox.push(ClientMsg::WaitForPlayers);
        }
    }

    pub fn exit(&mut self) {
        self.transition(ControllerAction::Exit);
    }

    pub fn connection_lost(&mut self) {
        self.transition(ControllerAction::ConnectionLost);
    }

    /// One-line status for the page
    pub fn status_text(&self) -> String {
        let me = match self.role {
            Some(Role::Player1) => "Player 1",
            Some(Role::Player2) => "Player 2",
            None => "Controller",
        };
        match self.phase {
            ControllerPhase::Connecting => "Connecting...".to_string(),
            ControllerPhase::ModeSelection => format!("{me}: choose a game mode"),
            ControllerPhase::WaitingForOpponent => "Waiting for an opponent...".to_string(),
            ControllerPhase::Playing => format!("{me}: move to serve"),
            ControllerPhase::GameOver => match self.winner {
                Some(winner) if Some(winner) == self.role => "You win!".to_string(),
                Some(_) => "You lose".to_string(),
                None => "Game over".to_string(),
            },
            ControllerPhase::Rejected => self
                .rejection
                .clone()
                .unwrap_or_else(|| "Could not join".to_string()),
            ControllerPhase::Disconnected => "Disconnected".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigned(role: Role) -> ControllerApp {
        let mut app = ControllerApp::new();
        app.handle_message(ServerMsg::Assigned { player: role });
        app
    }

    #[test]
    fn test_initial_phase() {
        let app = ControllerApp::new();
        assert_eq!(app.phase(), ControllerPhase::Connecting);
        assert_eq!(app.status_text(), "Connecting...");
    }

    #[test]
    fn test_player1_chooses_mode() {
        let mut app = assigned(Role::Player1);
        assert_eq!(app.phase(), ControllerPhase::ModeSelection);

        app.play_vs_ai();
        assert_eq!(app.phase(), ControllerPhase::Playing);
        assert_eq!(app.take_outbox(), vec![ClientMsg::StartVsAi]);
    }

    #[test]
    fn test_player2_plays_immediately() {
        let app = assigned(Role::Player2);
        assert_eq!(app.phase(), ControllerPhase::Playing);
        assert_eq!(app.role(), Some(Role::Player2));
    }

    #[test]
    fn test_waiting_for_opponent_is_local() {
        let mut app = assigned(Role::Player1);
        app.wait_for_opponent();
        assert_eq!(app.phase(), ControllerPhase::WaitingForOpponent);
        assert!(app.take_outbox().is_empty());

        app.handle_message(ServerMsg::GameStart);
        assert_eq!(app.phase(), ControllerPhase::Playing);
    }

    #[test]
    fn test_rejection_keeps_message() {
        let mut app = ControllerApp::new();
        app.handle_text(r#"{"type":"error","message":"Game is full"}"#);
        assert_eq!(app.phase(), ControllerPhase::Rejected);
        assert_eq!(app.rejection(), Some("Game is full"));
        assert_eq!(app.status_text(), "Game is full");

        app.connection_lost();
        assert_eq!(app.phase(), ControllerPhase::Rejected);
    }

    #[test]
    fn test_press_sends_changes_only() {
        let mut app = assigned(Role::Player2);
        app.press(Direction::Left);
        app.press(Direction::Left);
        app.release();
        app.release();
        assert_eq!(
            app.take_outbox(),
            vec![
                ClientMsg::Move {
                    direction: Direction::Left
                },
                ClientMsg::Move {
                    direction: Direction::Stop
                },
            ]
        );
    }

    #[test]
    fn test_no_moves_outside_play() {
        let mut app = assigned(Role::Player1);
        app.press(Direction::Right);
        assert!(app.take_outbox().is_empty());
    }

    #[test]
    fn test_game_over_then_play_again() {
        let mut app = assigned(Role::Player2);
        app.handle_message(ServerMsg::GameEnded {
            winner: Role::Player2,
        });
        assert_eq!(app.phase(), ControllerPhase::GameOver);
        assert_eq!(app.status_text(), "You win!");

        app.play_again();
        assert_eq!(app.phase(), ControllerPhase::Playing);
        assert_eq!(app.take_outbox(), vec![ClientMsg::RestartGame]);
    }

    #[test]
    fn test_wait_for_players_returns_to_mode_selection() {
        let mut app = assigned(Role::Player1);
        app.play_vs_ai();
        app.handle_message(ServerMsg::GameEnded {
            winner: Role::Player2,
        });
        app.take_outbox();

        app.wait_for_players();
        assert_eq!(app.phase(), ControllerPhase::ModeSelection);
        assert_eq!(app.take_outbox(), vec![ClientMsg::WaitForPlayers]);

        // The relay's broadcast to both players does not pull us back in
        app.handle_message(ServerMsg::GameRestarted);
        assert_eq!(app.phase(), ControllerPhase::ModeSelection);
    }

    #[test]
    fn test_other_player_restart_resumes_play() {
        let mut app = assigned(Role::Player2);
        app.handle_message(ServerMsg::GameEnded {
            winner: Role::Player1,
        });
        app.handle_message(ServerMsg::GameRestarted);
        assert_eq!(app.phase(), ControllerPhase::Playing);
    }

    #[test]
    fn test_exit_disconnects() {
        let mut app = assigned(Role::Player2);
        app.exit();
        assert_eq!(app.phase(), ControllerPhase::Disconnected);
        app.press(Direction::Left);
        assert!(app.take_outbox().is_empty());
    }

    #[test]
    fn test_invalid_transition_is_ignored() {
        assert_eq!(
            next_phase(ControllerPhase::Connecting, ControllerAction::PlayAgain),
            None
        );
        let mut app = ControllerApp::new();
        app.play_again();
        assert_eq!(app.phase(), ControllerPhase::Connecting);
        assert!(app.take_outbox().is_empty());
    }

    #[test]
    fn test_screen_messages_are_ignored() {
        let mut app = assigned(Role::Player1);
        app.handle_message(ServerMsg::StartGame);
        app.handle_message(ServerMsg::RestartGame { ai_mode: false });
        assert_eq!(app.phase(), ControllerPhase::ModeSelection);
        assert!(app.take_outbox().is_empty());
    }
}
