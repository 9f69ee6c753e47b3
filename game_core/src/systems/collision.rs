use crate::physics::{paddle_collision, wall_bounce};
use crate::{Ball, Config, Paddle};
use hecs::World;

/// Check ball collisions with side walls and paddles
pub fn check_collisions(world: &mut World, config: &Config) {
    // Copy paddles out first so the ball can be borrowed mutably
    let mut paddles: Vec<Paddle> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, paddle)| *paddle)
        .collect();
    // Top paddle is resolved before the bottom one
    paddles.sort_by_key(|paddle| paddle.side.index());

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        wall_bounce(ball, config.table_width);

        for paddle in &paddles {
            if paddle_collision(ball, paddle, config.ball_acceleration) {
                log::debug!(
                    "Paddle hit by {:?}, speed now {:.2}",
                    paddle.side,
                    ball.vel.length()
                );
            }
        }
    }
}
