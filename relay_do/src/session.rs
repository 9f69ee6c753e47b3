//! Lobby bookkeeping: who is the screen, who holds which paddle, and which
//! messages each inbound event fans out to.

use crate::config::RelayConfig;
use crate::qr::QrEncoder;
use crate::relay::Environment;
use proto::{ClientMsg, Direction, Role, ServerMsg};
use serde::{Deserialize, Serialize};

/// Relay-assigned id for one WebSocket, stored as the socket attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No player 1 yet, or the screen is back to showing the QR code
    Waiting,
    /// Player 1 is choosing between the computer and a second player
    ModeSelection,
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Message(ConnectionId, ClientMsg),
    Disconnect(ConnectionId),
}

/// One outbound message and the connection it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: ConnectionId,
    pub msg: ServerMsg,
}

impl Envelope {
    pub fn new(to: ConnectionId, msg: ServerMsg) -> Self {
        Self { to, msg }
    }
}

#[derive(Debug)]
pub struct Session {
    config: RelayConfig,
    screen: Option<ConnectionId>,
    slots: [Option<ConnectionId>; 2],
    ai_mode: bool,
    phase: SessionPhase,
}

impl Session {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            screen: None,
            slots: [None, None],
            ai_mode: false,
            phase: SessionPhase::Waiting,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn ai_mode(&self) -> bool {
        self.ai_mode
    }

    pub fn screen(&self) -> Option<ConnectionId> {
        self.screen
    }

    pub fn holder(&self, role: Role) -> Option<ConnectionId> {
        self.slots[role.slot()]
    }

    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| self.slots[role.slot()] == Some(conn))
    }

    /// Process one event and return the messages it produces, in send order.
    pub fn apply(
        &mut self,
        event: SessionEvent,
        env: &dyn Environment,
        qr: &dyn QrEncoder,
    ) -> Vec<Envelope> {
        let mut out = Vec::new();
        match event {
            SessionEvent::Message(conn, msg) => self.on_message(conn, msg, env, qr, &mut out),
            SessionEvent::Disconnect(conn) => self.on_disconnect(conn, env, &mut out),
        }
        out
    }

    fn on_message(
        &mut self,
        conn: ConnectionId,
        msg: ClientMsg,
        env: &dyn Environment,
        qr: &dyn QrEncoder,
        out: &mut Vec<Envelope>,
    ) {
        match msg {
            ClientMsg::RegisterScreen { origin } => {
                self.register_screen(conn, origin.as_deref(), env, qr, out)
            }
            ClientMsg::RegisterPlayer => self.register_player(conn, env, out),
            ClientMsg::StartVsAi => self.start_vs_ai(conn, env, out),
            ClientMsg::Move { direction } => self.forward_move(conn, direction, env, out),
            ClientMsg::GameEnded { winner } => self.game_ended(conn, winner, env, out),
            ClientMsg::RestartGame => self.restart_game(conn, env, out),
            ClientMsg::WaitForPlayers => self.wait_for_players(conn, env, out),
        }
    }

    fn register_screen(
        &mut self,
        conn: ConnectionId,
        origin: Option<&str>,
        env: &dyn Environment,
        qr: &dyn QrEncoder,
        out: &mut Vec<Envelope>,
    ) {
        if let Some(previous) = self.screen.replace(conn) {
            if previous != conn {
                env.log(format!("Screen rebound from {previous:?} to {conn:?}"));
            }
        }

        let url = self.config.controller_url(origin);
        let qr_code = match qr.encode(&url) {
            Ok(image) => image,
            Err(e) => {
                env.warn(format!("QR generation for {url} failed: {e}"));
                String::new()
            }
        };
        out.push(Envelope::new(conn, ServerMsg::QrCode { qr_code, url }));
    }

    fn register_player(&mut self, conn: ConnectionId, env: &dyn Environment, out: &mut Vec<Envelope>) {
        if let Some(player) = self.role_of(conn) {
            out.push(Envelope::new(conn, ServerMsg::Assigned { player }));
            return;
        }

        let role = if self.slots[Role::Player1.slot()].is_none() {
            Role::Player1
        } else if self.slots[Role::Player2.slot()].is_none() && !self.ai_mode {
            Role::Player2
        } else {
            env.log(format!("Rejecting {conn:?}: game is full"));
            out.push(Envelope::new(
                conn,
                ServerMsg::Error {
                    message: "Game is full".to_string(),
                },
            ));
            return;
        };

        self.slots[role.slot()] = Some(conn);
        env.log(format!("{conn:?} assigned as {role:?}"));
        out.push(Envelope::new(conn, ServerMsg::Assigned { player: role }));

        if role == Role::Player1 {
            if let Some(screen) = self.screen {
                out.push(Envelope::new(screen, ServerMsg::Player1Connected));
            }
        }

        let both_human = self.slots.iter().all(Option::is_some) && !self.ai_mode;
        if both_human {
            env.log("Both players connected, starting game".to_string());
            if let Some(screen) = self.screen {
                out.push(Envelope::new(screen, ServerMsg::StartGame));
                out.push(Envelope::new(screen, ServerMsg::HideQr));
            }
            self.push_to_players(ServerMsg::GameStart, out);
            self.phase = SessionPhase::Active;
        } else if role == Role::Player1 {
            self.phase = SessionPhase::ModeSelection;
        }
    }

    fn start_vs_ai(&mut self, conn: ConnectionId, env: &dyn Environment, out: &mut Vec<Envelope>) {
        let slot1_only = self.holder(Role::Player1).is_some() && self.holder(Role::Player2).is_none();
        if self.role_of(conn).is_none() || !slot1_only {
            env.log(format!("Ignoring start_vs_ai from {conn:?}"));
            return;
        }

        self.ai_mode = true;
        self.phase = SessionPhase::Active;
        env.log("Starting game against the computer".to_string());
        if let Some(screen) = self.screen {
            out.push(Envelope::new(screen, ServerMsg::EnableAi));
            out.push(Envelope::new(screen, ServerMsg::StartGame));
        }
    }

    fn forward_move(
        &mut self,
        conn: ConnectionId,
        direction: Direction,
        env: &dyn Environment,
        out: &mut Vec<Envelope>,
    ) {
        match (self.role_of(conn), self.screen) {
            (Some(player), Some(screen)) => {
                out.push(Envelope::new(screen, ServerMsg::PlayerMove { player, direction }));
            }
            (None, _) => env.log(format!("Dropping move from unassigned {conn:?}")),
            (Some(player), None) => env.log(format!("Dropping {player:?} move: no screen")),
        }
    }

    fn game_ended(
        &mut self,
        conn: ConnectionId,
        winner: Role,
        env: &dyn Environment,
        out: &mut Vec<Envelope>,
    ) {
        if self.screen != Some(conn) {
            env.warn(format!("game_ended from non-screen {conn:?} ignored"));
            return;
        }
        env.log(format!("Game over, {winner:?} wins"));
        self.phase = SessionPhase::Ended;
        self.push_to_players(ServerMsg::GameEnded { winner }, out);
    }

    fn restart_game(&mut self, conn: ConnectionId, env: &dyn Environment, out: &mut Vec<Envelope>) {
        if self.role_of(conn).is_none() {
            env.log(format!("Ignoring restart_game from {conn:?}"));
            return;
        }
        self.phase = SessionPhase::Active;
        if let Some(screen) = self.screen {
            out.push(Envelope::new(
                screen,
                ServerMsg::RestartGame {
                    ai_mode: self.ai_mode,
                },
            ));
        }
        self.push_to_players(ServerMsg::GameRestarted, out);
    }

    fn wait_for_players(&mut self, conn: ConnectionId, env: &dyn Environment, out: &mut Vec<Envelope>) {
        if self.role_of(conn).is_none() {
            env.log(format!("Ignoring wait_for_players from {conn:?}"));
            return;
        }
        self.ai_mode = false;
        self.phase = SessionPhase::Waiting;
        if let Some(screen) = self.screen {
            out.push(Envelope::new(screen, ServerMsg::ShowQr));
        }
        self.push_to_players(ServerMsg::GameRestarted, out);
    }

    fn on_disconnect(&mut self, conn: ConnectionId, env: &dyn Environment, out: &mut Vec<Envelope>) {
        if let Some(player) = self.role_of(conn) {
            self.slots[player.slot()] = None;
            env.log(format!("{player:?} disconnected"));
            if let Some(screen) = self.screen {
                out.push(Envelope::new(screen, ServerMsg::PlayerDisconnected { player }));
            }

            if self.slots.iter().all(Option::is_none) {
                self.ai_mode = false;
                self.phase = SessionPhase::Waiting;
                if let Some(screen) = self.screen {
                    out.push(Envelope::new(screen, ServerMsg::AllPlayersDisconnected));
                }
            } else if self.holder(Role::Player1).is_some() {
                self.phase = SessionPhase::ModeSelection;
            } else {
                self.phase = SessionPhase::Waiting;
            }
        } else if self.screen == Some(conn) {
            env.log("Screen disconnected".to_string());
            self.screen = None;
            self.ai_mode = false;
        }
    }

    fn push_to_players(&self, msg: ServerMsg, out: &mut Vec<Envelope>) {
        for conn in self.slots.iter().flatten() {
            out.push(Envelope::new(*conn, msg.clone()));
        }
    }
}
