use crate::{Params, Side};

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub table_width: f32,
    pub table_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_margin: f32,
    pub paddle_player_speed: f32,
    pub paddle_ai_speed: f32,
    pub paddle_ai_dead_zone: f32,
    pub ball_radius: f32,
    pub ball_initial_speed: f32,
    pub ball_acceleration: f32,
    pub ai_miss_min: u32,
    pub ai_miss_range: u32,
    pub win_score: u8,
    pub start_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_width: Params::TABLE_WIDTH,
            table_height: Params::TABLE_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_margin: Params::PADDLE_MARGIN,
            paddle_player_speed: Params::PADDLE_PLAYER_SPEED,
            paddle_ai_speed: Params::PADDLE_AI_SPEED,
            paddle_ai_dead_zone: Params::PADDLE_AI_DEAD_ZONE,
            ball_radius: Params::BALL_RADIUS,
            ball_initial_speed: Params::BALL_INITIAL_SPEED,
            ball_acceleration: Params::BALL_ACCELERATION,
            ai_miss_min: Params::AI_MISS_MIN,
            ai_miss_range: Params::AI_MISS_RANGE,
            win_score: Params::WIN_SCORE,
            start_delay_ms: Params::START_DELAY_MS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Y position (top edge) for a paddle
    pub fn paddle_y(&self, side: Side) -> f32 {
        match side {
            Side::Player1 => self.paddle_margin,
            Side::Player2 => self.table_height - self.paddle_margin - self.paddle_height,
        }
    }

    /// X position that centers a paddle on the table
    pub fn paddle_home_x(&self) -> f32 {
        (self.table_width - self.paddle_width) / 2.0
    }

    /// Clamp paddle X to table bounds
    pub fn clamp_paddle_x(&self, x: f32) -> f32 {
        x.clamp(0.0, self.table_width - self.paddle_width)
    }

    pub fn table_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.table_width / 2.0, self.table_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paddle_y() {
        let config = Config::new();
        assert_eq!(config.paddle_y(Side::Player1), 20.0, "Top paddle Y position");
        assert_eq!(
            config.paddle_y(Side::Player2),
            565.0,
            "Bottom paddle Y position"
        );
    }

    #[test]
    fn test_config_clamp_paddle_x() {
        let config = Config::new();
        assert_eq!(config.clamp_paddle_x(-50.0), 0.0);
        assert_eq!(
            config.clamp_paddle_x(1000.0),
            config.table_width - config.paddle_width
        );
        assert_eq!(config.clamp_paddle_x(350.0), 350.0);
    }

    #[test]
    fn test_paddle_home_is_centered() {
        let config = Config::new();
        let home = config.paddle_home_x();
        assert_eq!(home + config.paddle_width / 2.0, config.table_width / 2.0);
    }
}
