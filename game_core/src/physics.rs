//! Pure geometry and physics helpers.
//!
//! Every function here only touches the values it is handed. The systems in
//! [`crate::systems`] apply them to the entities in the world.

use crate::{Ball, Paddle, RandomSource, Side};

/// Move a paddle by its speed, then hard-clamp it to the table.
pub fn advance_paddle(paddle: &mut Paddle, table_width: f32) {
    paddle.pos.x += paddle.speed;
    paddle.pos.x = paddle.pos.x.clamp(0.0, table_width - paddle.width);
}

/// Move the ball by its velocity. A ball that has not been served stays put.
pub fn advance_ball(ball: &mut Ball, started: bool) {
    if started {
        ball.pos += ball.vel;
    }
}

/// Bounce off the side walls. Only the x component is ever changed.
///
/// Returns true if the ball touched a wall this frame.
pub fn wall_bounce(ball: &mut Ball, table_width: f32) -> bool {
    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = ball.radius;
        ball.vel.x = ball.vel.x.abs();
        true
    } else if ball.pos.x + ball.radius > table_width {
        ball.pos.x = table_width - ball.radius;
        ball.vel.x = -ball.vel.x.abs();
        true
    } else {
        false
    }
}

/// Resolve a ball/paddle contact.
///
/// A hit only counts while the ball is still travelling toward the paddle,
/// so a ball that has already been reflected cannot bounce twice on the same
/// contact. On a hit the ball is placed flush on the paddle face and both
/// velocity components are scaled by `acceleration`.
pub fn paddle_collision(ball: &mut Ball, paddle: &Paddle, acceleration: f32) -> bool {
    let within_x = ball.pos.x > paddle.pos.x && ball.pos.x < paddle.pos.x + paddle.width;
    if !within_x {
        return false;
    }

    let face_top = paddle.pos.y;
    let face_bottom = paddle.pos.y + paddle.height;

    match paddle.side {
        // Top paddle: ball arrives moving up, leaves moving down
        Side::Player1 => {
            let overlaps = ball.pos.y - ball.radius < face_bottom && ball.pos.y > face_top;
            if overlaps && ball.vel.y < 0.0 {
                ball.pos.y = face_bottom + ball.radius;
                ball.vel.y = ball.vel.y.abs() * acceleration;
                ball.vel.x *= acceleration;
                return true;
            }
        }
        // Bottom paddle: ball arrives moving down, leaves moving up
        Side::Player2 => {
            let overlaps = ball.pos.y + ball.radius > face_top && ball.pos.y < face_bottom;
            if overlaps && ball.vel.y > 0.0 {
                ball.pos.y = face_top - ball.radius;
                ball.vel.y = -ball.vel.y.abs() * acceleration;
                ball.vel.x *= acceleration;
                return true;
            }
        }
    }
    false
}

/// Side whose goal line the ball has completely crossed, if any.
pub fn check_out_of_bounds(ball: &Ball, table_height: f32) -> Option<Side> {
    if ball.pos.y + ball.radius < 0.0 {
        Some(Side::Player1)
    } else if ball.pos.y - ball.radius > table_height {
        Some(Side::Player2)
    } else {
        None
    }
}

/// `speed` with a random sign.
pub fn random_launch_component(rng: &mut dyn RandomSource, speed: f32) -> f32 {
    if rng.coin_flip() {
        speed
    } else {
        -speed
    }
}
