//! Computer opponent for the bottom paddle.
//!
//! The AI tracks the ball for a few frames, then stalls until the ball is
//! back in its own half. The stall length comes from a random threshold so
//! it misses now and then.

use crate::{Config, GameState, RandomSource, Side};

/// Side driven by the AI when it is enabled
pub const AI_SIDE: Side = Side::Player2;

#[derive(Debug, Clone, Copy, Default)]
pub struct AiState {
    pub enabled: bool,
    pub miss_counter: u32,
    pub miss_threshold: u32,
}

impl AiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the counter and draw a fresh miss threshold.
    pub fn init(&mut self, config: &Config, rng: &mut dyn RandomSource) {
        self.miss_counter = 0;
        self.miss_threshold = draw_threshold(config, rng);
    }

    pub fn is_stalled(&self) -> bool {
        self.miss_counter >= self.miss_threshold
    }
}

fn draw_threshold(config: &Config, rng: &mut dyn RandomSource) -> u32 {
    config.ai_miss_min + rng.below(config.ai_miss_range.max(1))
}

/// Run one AI tick: steer or stall the AI paddle, and serve a frozen ball
/// that is loaded to leave the AI's side (the same rule a player 2 move
/// follows).
pub fn update_ai(state: &mut GameState, config: &Config, rng: &mut dyn RandomSource) {
    let Some(ball) = state.ball() else {
        return;
    };

    state.ai.miss_counter += 1;

    let speed = if state.ai.is_stalled() {
        if ball.pos.y > config.table_height / 2.0 {
            state.ai.miss_counter = 0;
            state.ai.miss_threshold = draw_threshold(config, rng);
        }
        0.0
    } else {
        let diff = state
            .paddle(AI_SIDE)
            .map_or(0.0, |paddle| ball.pos.x - paddle.center_x());
        if diff.abs() > config.paddle_ai_dead_zone {
            config.paddle_ai_speed.copysign(diff)
        } else {
            0.0
        }
    };

    if let Some(paddle) = state.paddle_mut(AI_SIDE) {
        paddle.speed = speed;
    }

    if !state.ball_started && ball.vel.y < 0.0 && ball.vel.x != 0.0 {
        state.ball_started = true;
    }
}
