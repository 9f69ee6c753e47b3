/// Game tuning parameters for Pong
///
/// Distances are in canvas pixels, speeds in pixels per frame.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Table
    pub const TABLE_WIDTH: f32 = 800.0;
    pub const TABLE_HEIGHT: f32 = 600.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_MARGIN: f32 = 20.0; // gap between paddle and goal line
    pub const PADDLE_PLAYER_SPEED: f32 = 8.0;
    pub const PADDLE_AI_SPEED: f32 = 6.0;
    pub const PADDLE_AI_DEAD_ZONE: f32 = 10.0;

    // Ball
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_INITIAL_SPEED: f32 = 3.0;
    pub const BALL_ACCELERATION: f32 = 1.01; // Multiply velocity on paddle hit

    // AI miss window: threshold drawn from MIN..MIN+RANGE
    pub const AI_MISS_MIN: u32 = 3;
    pub const AI_MISS_RANGE: u32 = 3;

    // Score
    pub const WIN_SCORE: u8 = 11;

    // Loop
    pub const START_DELAY_MS: u32 = 100; // lets the canvas show before the first tick
}
