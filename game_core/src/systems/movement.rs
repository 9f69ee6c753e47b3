use crate::physics::{advance_ball, advance_paddle};
use crate::{Ball, Config, Paddle};
use hecs::World;

/// Apply paddle velocities and clamp paddles to the table
pub fn move_paddles(world: &mut World, config: &Config) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        advance_paddle(paddle, config.table_width);
    }
}

/// Move ball based on velocity, if it has been served
pub fn move_ball(world: &mut World, started: bool) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        advance_ball(ball, started);
    }
}
