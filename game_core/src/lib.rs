pub mod ai;
pub mod components;
pub mod config;
pub mod game_loop;
pub mod params;
pub mod physics;
pub mod resources;
pub mod state;
pub mod systems;

pub use ai::*;
pub use components::*;
pub use config::*;
pub use game_loop::*;
pub use params::*;
pub use resources::*;
pub use state::*;

use glam::Vec2;
use hecs::World;
use systems::*;

/// Advance the Pong simulation by one display frame
pub fn step(
    state: &mut GameState,
    config: &Config,
    events: &mut Events,
    rng: &mut dyn RandomSource,
) {
    // Clear events at start of frame
    events.clear();

    // 1. Computer opponent picks its paddle speed
    if state.ai.enabled {
        update_ai(state, config, rng);
    }

    // 2. Move paddles and clamp to the table
    move_paddles(&mut state.world, config);

    // 3. Ball physics only once served
    if state.ball_started {
        move_ball(&mut state.world, true);
        check_collisions(&mut state.world, config);
        check_scoring(state, config, events, rng);
    }
}

/// Helper to create a paddle entity at its home position
pub fn create_paddle(world: &mut World, side: Side, config: &Config) -> hecs::Entity {
    let pos = Vec2::new(config.paddle_home_x(), config.paddle_y(side));
    world.spawn((Paddle::new(
        side,
        pos,
        config.paddle_width,
        config.paddle_height,
    ),))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: Vec2, vel: Vec2, radius: f32) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel, radius),))
}
