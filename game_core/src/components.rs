use glam::Vec2;

/// Which end of the table a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top paddle, first controller to join
    Player1,
    /// Bottom paddle, second controller or the AI
    Player2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player1, Side::Player2];

    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Player1 => 0,
            Side::Player2 => 1,
        }
    }
}

/// Controller input along the paddle's movable axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
    Stop,
}

/// Paddle component - horizontal paddle guarding one goal line
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2, // top-left corner; only x moves
    pub width: f32,
    pub height: f32,
    pub speed: f32, // velocity along x, pixels per frame
}

impl Paddle {
    pub fn new(side: Side, pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            side,
            pos,
            width,
            height,
            speed: 0.0,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    pub fn is_stationary(&self) -> bool {
        self.vel == Vec2::ZERO
    }
}
