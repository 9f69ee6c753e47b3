//! The shared screen: runs the authoritative simulation and reacts to relay
//! messages. Platform timers and drawing come in through the `Scheduler`
//! and `Renderer` seams so the whole flow runs natively in tests.

use crate::network::decode_server_message;
use crate::state::{ScreenView, STATUS_PLAYER1};
use game_core::{
    Config, FrameHandle, FrameOutcome, GameLoop, GameRng, GameState, LoopPhase, Renderer,
    Scheduler, Side, Steer,
};
use proto::{ClientMsg, Direction, Role, ServerMsg};

pub fn side_for(role: Role) -> Side {
    match role {
        Role::Player1 => Side::Player1,
        Role::Player2 => Side::Player2,
    }
}

pub fn role_for(side: Side) -> Role {
    match side {
        Side::Player1 => Role::Player1,
        Side::Player2 => Role::Player2,
    }
}

pub fn steer_for(direction: Direction) -> Steer {
    match direction {
        Direction::Left => Steer::Left,
        Direction::Right => Steer::Right,
        Direction::Stop => Steer::Stop,
    }
}

pub struct ScreenApp<S: Scheduler, R: Renderer> {
    config: Config,
    state: GameState,
    game_loop: GameLoop,
    rng: GameRng,
    scheduler: S,
    renderer: R,
    view: ScreenView,
    outbox: Vec<ClientMsg>,
}

impl<S: Scheduler, R: Renderer> ScreenApp<S, R> {
    pub fn new(scheduler: S, renderer: R, seed: u64) -> Self {
        let config = Config::new();
        let state = GameState::new(&config);
        Self {
            config,
            state,
            game_loop: GameLoop::new(),
            rng: GameRng::new(seed),
            scheduler,
            renderer,
            view: ScreenView::default(),
            outbox: Vec::new(),
        }
    }

    pub fn view(&self) -> &ScreenView {
        &self.view
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loop_phase(&self) -> LoopPhase {
        self.game_loop.phase()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Announce this page as the screen once the socket is open
    pub fn register(&mut self, origin: Option<String>) {
        self.outbox.push(ClientMsg::RegisterScreen { origin });
    }

    /// Messages waiting to go out, oldest first
    pub fn take_outbox(&mut self) -> Vec<ClientMsg> {
        std::mem::take(&mut self.outbox)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.view.set_status(status);
    }

    pub fn handle_text(&mut self, text: &str) {
        match decode_server_message(text) {
            Ok(msg) => self.handle_message(msg),
            Err(e) => log::warn!("{e}"),
        }
    }

    pub fn handle_message(&mut self, msg: ServerMsg) {
        if !msg.is_screen_bound() {
            log::debug!("Screen ignoring {msg:?}");
            return;
        }
        match msg {
            ServerMsg::QrCode { qr_code, url } => {
                log::info!("Controllers join at {url}");
                self.view.set_qr(qr_code, url);
            }
            ServerMsg::HideQr => self.view.qr_visible = false,
            ServerMsg::ShowQr
            | ServerMsg::PlayerDisconnected { .. }
            | ServerMsg::AllPlayersDisconnected => self.back_to_waiting(),
            ServerMsg::Player1Connected => self.view.set_status(STATUS_PLAYER1),
            ServerMsg::StartGame => self.start_round(Some(self.config.start_delay_ms)),
            ServerMsg::EnableAi => {
                self.state.ai.enabled = true;
                self.state.ai.init(&self.config, &mut self.rng);
            }
            ServerMsg::PlayerMove { player, direction } => {
                self.state.apply_move(
                    side_for(player),
                    steer_for(direction),
                    &self.config,
                    &mut self.rng,
                );
            }
            ServerMsg::RestartGame { ai_mode } => {
                self.state.ai.enabled = ai_mode;
                self.start_round(None);
            }
            ServerMsg::Assigned { .. }
            | ServerMsg::Error { .. }
            | ServerMsg::GameEnded { .. }
            | ServerMsg::GameRestarted
            | ServerMsg::GameStart => {}
        }
    }

    /// Drive one scheduled frame
    pub fn on_frame(&mut self, handle: FrameHandle) -> FrameOutcome {
        let outcome = self.game_loop.on_frame(
            handle,
            &mut self.state,
            &self.config,
            &mut self.rng,
            &mut self.scheduler,
            &mut self.renderer,
        );
        if let FrameOutcome::Ended(winner) = outcome {
            let winner = role_for(winner);
            self.view.set_status(match winner {
                Role::Player1 => "Player 1 wins!",
                Role::Player2 => "Player 2 wins!",
            });
            self.outbox.push(ClientMsg::GameEnded { winner });
        }
        outcome
    }

    fn start_round(&mut self, delay_ms: Option<u32>) {
        self.state.reset_round(&self.config);
        self.state.running = true;
        if self.state.ai.enabled {
            self.state.ai.init(&self.config, &mut self.rng);
        }
        self.view.show_playfield();
        self.game_loop
            .start(&mut self.scheduler, &mut self.renderer, delay_ms);
    }

    fn back_to_waiting(&mut self) {
        self.game_loop.reset(&mut self.scheduler);
        self.state.reset_to_waiting(&self.config);
        self.view.show_lobby();
    }
}
