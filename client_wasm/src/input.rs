//! Keyboard input handling

use proto::Direction;

/// Direction for a key press, if the key steers
pub fn handle_key_down(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Releasing any steering key stops the paddle
pub fn handle_key_up(key: &str) -> Option<Direction> {
    handle_key_down(key).map(|_| Direction::Stop)
}
