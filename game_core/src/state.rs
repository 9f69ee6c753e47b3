//! Screen-owned game state

use crate::physics::random_launch_component;
use crate::{AiState, Ball, Config, Paddle, RandomSource, Score, Side, Steer};
use glam::Vec2;
use hecs::{Entity, World};

/// Everything the screen simulates: one ball, two paddles and the round flags.
pub struct GameState {
    pub world: World,
    ball: Entity,
    paddles: [Entity; 2],
    pub score: Score,
    pub running: bool,
    pub ball_started: bool,
    pub ai: AiState,
    pub winner: Option<Side>,
}

impl GameState {
    pub fn new(config: &Config) -> Self {
        let mut world = World::new();
        let ball = crate::create_ball(
            &mut world,
            config.table_center(),
            Vec2::splat(config.ball_initial_speed),
            config.ball_radius,
        );
        let paddles = Side::BOTH.map(|side| crate::create_paddle(&mut world, side, config));

        Self {
            world,
            ball,
            paddles,
            score: Score::new(),
            running: false,
            ball_started: false,
            ai: AiState::new(),
            winner: None,
        }
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world.get::<&Ball>(self.ball).ok().map(|ball| *ball)
    }

    pub fn ball_mut(&mut self) -> Option<&mut Ball> {
        self.world.query_one_mut::<&mut Ball>(self.ball).ok()
    }

    pub fn paddle(&self, side: Side) -> Option<Paddle> {
        self.world
            .get::<&Paddle>(self.paddles[side.index()])
            .ok()
            .map(|paddle| *paddle)
    }

    pub fn paddle_mut(&mut self, side: Side) -> Option<&mut Paddle> {
        self.world
            .query_one_mut::<&mut Paddle>(self.paddles[side.index()])
            .ok()
    }

    /// Center the ball, zero its velocity and freeze it until served.
    pub fn reset_ball(&mut self, config: &Config) {
        if let Some(ball) = self.ball_mut() {
            ball.pos = config.table_center();
            ball.vel = Vec2::ZERO;
        }
        self.ball_started = false;
    }

    /// Credit a point. Either ends the round or re-centers the ball with a
    /// pending serve heading toward the scorer.
    pub fn apply_score(&mut self, scorer: Side, config: &Config, rng: &mut dyn RandomSource) {
        // A decided round only changes through reset_round
        if self.winner.is_some() {
            return;
        }
        let total = self.score.increment(scorer);

        if total >= config.win_score {
            log::info!("{scorer:?} wins {}-{}", self.score.player1, self.score.player2);
            self.winner = Some(scorer);
            self.running = false;
            return;
        }

        self.reset_ball(config);
        let vx = random_launch_component(rng, config.ball_initial_speed);
        let vy = match scorer {
            Side::Player1 => -config.ball_initial_speed,
            Side::Player2 => config.ball_initial_speed,
        };
        if let Some(ball) = self.ball_mut() {
            ball.vel = Vec2::new(vx, vy);
        }
    }

    /// Apply a relayed controller input to a paddle, serving a frozen ball
    /// when the input qualifies.
    pub fn apply_move(
        &mut self,
        side: Side,
        steer: Steer,
        config: &Config,
        rng: &mut dyn RandomSource,
    ) {
        if let Some(paddle) = self.paddle_mut(side) {
            paddle.speed = match steer {
                Steer::Left => -config.paddle_player_speed,
                Steer::Right => config.paddle_player_speed,
                Steer::Stop => 0.0,
            };
        }

        if self.ball_started || steer == Steer::Stop {
            return;
        }

        let Some(ball) = self.ball() else {
            return;
        };
        // The side the pending serve travels away from gets to launch it
        let should_start = ball.is_stationary()
            || (side == Side::Player2 && ball.vel.y < 0.0)
            || (side == Side::Player1 && ball.vel.y > 0.0);

        if should_start {
            if ball.is_stationary() {
                let vx = random_launch_component(rng, config.ball_initial_speed);
                let vy = random_launch_component(rng, config.ball_initial_speed);
                if let Some(ball) = self.ball_mut() {
                    ball.vel = Vec2::new(vx, vy);
                }
            }
            self.ball_started = true;
        }
    }

    /// Back to a fresh round: zero score, centered paddles and ball.
    /// The AI flag is left alone; callers decide whether the next round has it.
    pub fn reset_round(&mut self, config: &Config) {
        self.score = Score::new();
        self.winner = None;
        self.ai.miss_counter = 0;
        let home_x = config.paddle_home_x();
        for side in Side::BOTH {
            if let Some(paddle) = self.paddle_mut(side) {
                paddle.pos.x = home_x;
                paddle.speed = 0.0;
            }
        }
        self.reset_ball(config);
    }

    /// Full reset after every player left or the session went back to waiting.
    pub fn reset_to_waiting(&mut self, config: &Config) {
        self.running = false;
        self.ai.enabled = false;
        self.reset_round(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;

    /// Replays fixed coin flips; `below` always returns 0.
    struct ScriptedRng(Vec<bool>);

    impl RandomSource for ScriptedRng {
        fn coin_flip(&mut self) -> bool {
            if self.0.is_empty() {
                true
            } else {
                self.0.remove(0)
            }
        }
        fn below(&mut self, _n: u32) -> u32 {
            0
        }
    }

    fn setup() -> (GameState, Config) {
        let config = Config::new();
        let mut state = GameState::new(&config);
        state.reset_round(&config);
        state.running = true;
        (state, config)
    }

    #[test]
    fn test_reset_ball_centers_and_freezes() {
        let (mut state, config) = setup();
        if let Some(ball) = state.ball_mut() {
            ball.pos = Vec2::new(12.0, 590.0);
            ball.vel = Vec2::new(-7.0, 9.0);
        }
        state.ball_started = true;

        state.reset_ball(&config);

        let ball = state.ball().expect("ball exists");
        assert_eq!(ball.pos, config.table_center());
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(!state.ball_started);
    }

    #[test]
    fn test_apply_score_loads_serve_toward_scorer() {
        let (mut state, config) = setup();
        let mut rng = ScriptedRng(vec![false]);

        state.apply_score(Side::Player1, &config, &mut rng);

        assert_eq!(state.score.player1, 1);
        assert!(!state.ball_started);
        assert!(state.running);
        let ball = state.ball().expect("ball exists");
        assert_eq!(ball.pos, config.table_center());
        assert_eq!(ball.vel, Vec2::new(-3.0, -3.0));
    }

    #[test]
    fn test_apply_score_reaching_threshold_ends_round() {
        let (mut state, config) = setup();
        let mut rng = GameRng::new(1);
        for _ in 0..10 {
            state.apply_score(Side::Player2, &config, &mut rng);
        }
        assert!(state.running);
        assert_eq!(state.winner, None);

        if let Some(ball) = state.ball_mut() {
            ball.pos = Vec2::new(100.0, 610.0);
        }
        state.apply_score(Side::Player2, &config, &mut rng);

        assert_eq!(state.score.player2, 11);
        assert_eq!(state.winner, Some(Side::Player2));
        assert!(!state.running);
        let ball = state.ball().expect("ball exists");
        assert_eq!(ball.pos, Vec2::new(100.0, 610.0), "Ball is not relaunched");
    }

    #[test]
    fn test_move_sets_paddle_speed() {
        let (mut state, config) = setup();
        let mut rng = GameRng::default();
        state.apply_move(Side::Player1, Steer::Left, &config, &mut rng);
        assert_eq!(state.paddle(Side::Player1).map(|p| p.speed), Some(-8.0));
        state.apply_move(Side::Player1, Steer::Stop, &config, &mut rng);
        assert_eq!(state.paddle(Side::Player1).map(|p| p.speed), Some(0.0));
    }

    #[test]
    fn test_first_move_serves_stationary_ball() {
        let (mut state, config) = setup();
        let mut rng = ScriptedRng(vec![true, false]);

        state.apply_move(Side::Player2, Steer::Right, &config, &mut rng);

        assert!(state.ball_started);
        assert_eq!(state.ball().map(|b| b.vel), Some(Vec2::new(3.0, -3.0)));
    }

    #[test]
    fn test_stop_never_serves() {
        let (mut state, config) = setup();
        let mut rng = GameRng::default();
        state.apply_move(Side::Player1, Steer::Stop, &config, &mut rng);
        assert!(!state.ball_started);
    }

    #[test]
    fn test_only_conceding_side_serves_pending_ball() {
        let (mut state, config) = setup();
        let mut rng = ScriptedRng(vec![true]);
        // Player 1 scored: serve heads up, player 2 conceded and serves
        state.apply_score(Side::Player1, &config, &mut rng);

        state.apply_move(Side::Player1, Steer::Right, &config, &mut rng);
        assert!(!state.ball_started, "Scorer cannot launch the serve");

        state.apply_move(Side::Player2, Steer::Left, &config, &mut rng);
        assert!(state.ball_started);
        assert_eq!(state.ball().map(|b| b.vel), Some(Vec2::new(3.0, -3.0)));
    }

    #[test]
    fn test_reset_to_waiting_clears_everything() {
        let (mut state, config) = setup();
        state.ai.enabled = true;
        state.score.player1 = 4;
        state.winner = Some(Side::Player1);

        state.reset_to_waiting(&config);

        assert!(!state.running);
        assert!(!state.ai.enabled);
        assert_eq!(state.score, Score::new());
        assert_eq!(state.winner, None);
        assert_eq!(
            state.paddle(Side::Player2).map(|p| p.pos.x),
            Some(config.paddle_home_x())
        );
    }
}
