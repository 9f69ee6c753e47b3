use game_core::physics::{advance_paddle, paddle_collision, wall_bounce};
use game_core::*;
use glam::Vec2;
use proptest::prelude::*;

fn new_round() -> (GameState, Config, Events, GameRng) {
    let config = Config::new();
    let mut state = GameState::new(&config);
    state.reset_round(&config);
    state.running = true;
    (state, config, Events::new(), GameRng::new(42))
}

#[test]
fn test_rally_until_someone_wins() {
    let (mut state, config, mut events, mut rng) = new_round();
    state.ai.enabled = true;
    state.ai.init(&config, &mut rng);

    // Player 2 is the AI, so only player 1 ever sends input
    state.apply_move(Side::Player1, Steer::Right, &config, &mut rng);
    state.apply_move(Side::Player1, Steer::Stop, &config, &mut rng);

    let mut frames = 0;
    while state.running && frames < 500_000 {
        step(&mut state, &config, &mut events, &mut rng);
        if events.scored.is_some() && state.running {
            let toward_ai = state.ball().is_some_and(|b| b.vel.y > 0.0);
            if toward_ai {
                state.apply_move(Side::Player1, Steer::Left, &config, &mut rng);
                state.apply_move(Side::Player1, Steer::Stop, &config, &mut rng);
            }
        }
        frames += 1;
    }

    let winner = state.winner.expect("someone wins eventually");
    assert_eq!(state.score.get(winner), config.win_score);
    assert!(state.score.get(winner.opponent()) < config.win_score);
}

#[test]
fn test_ai_relaunches_after_human_scores() {
    let (mut state, config, mut events, mut rng) = new_round();
    state.ai.enabled = true;
    state.ai.init(&config, &mut rng);
    state.apply_score(Side::Player1, &config, &mut rng);
    assert!(!state.ball_started);

    // Player 1 keeps steering; nothing arrives for player 2
    for frame in 0..10_000 {
        let steer = if frame % 2 == 0 { Steer::Left } else { Steer::Right };
        state.apply_move(Side::Player1, steer, &config, &mut rng);
        step(&mut state, &config, &mut events, &mut rng);
        if state.ball_started {
            break;
        }
    }

    assert!(state.ball_started, "Ball relaunched without player 2 input");
    let ball = state.ball().expect("ball");
    assert_ne!(ball.pos, config.table_center(), "Ball is moving again");
}

#[test]
fn test_threshold_is_never_exceeded() {
    let (mut state, config, _events, mut rng) = new_round();

    for _ in 0..10 {
        state.apply_score(Side::Player2, &config, &mut rng);
    }
    for _ in 0..10 {
        state.apply_score(Side::Player1, &config, &mut rng);
        assert_eq!(state.winner, None, "Neither side has reached 11");
    }

    state.apply_score(Side::Player1, &config, &mut rng);
    assert_eq!(state.winner, Some(Side::Player1));
    assert!(!state.running);

    state.apply_score(Side::Player1, &config, &mut rng);
    state.apply_score(Side::Player2, &config, &mut rng);
    assert_eq!(state.score.player1, 11);
    assert_eq!(state.score.player2, 10);
    assert_eq!(state.winner, Some(Side::Player1));
    assert!(!state.running, "Stays over until an explicit restart");
}

#[test]
fn test_restart_clears_winner() {
    let (mut state, config, _events, mut rng) = new_round();
    for _ in 0..11 {
        state.apply_score(Side::Player2, &config, &mut rng);
    }
    assert_eq!(state.winner, Some(Side::Player2));

    state.reset_round(&config);
    state.running = true;

    assert_eq!(state.winner, None);
    assert_eq!(state.score, Score::new());
    let ball = state.ball().expect("ball");
    assert_eq!(ball.pos, config.table_center());
    assert_eq!(ball.vel, Vec2::ZERO);
    assert!(!state.ball_started);
}

#[test]
fn test_speed_never_drops_during_rally() {
    let (mut state, config, mut events, mut rng) = new_round();
    state.apply_move(Side::Player2, Steer::Left, &config, &mut rng);
    state.apply_move(Side::Player2, Steer::Stop, &config, &mut rng);

    let mut last_speed = state.ball().map(|b| b.vel.length()).unwrap_or(0.0);
    for _ in 0..2_000 {
        // Keep both paddles under the ball so the rally continues
        let ball_x = state.ball().map(|b| b.pos.x).unwrap_or(0.0);
        for side in Side::BOTH {
            if let Some(paddle) = state.paddle_mut(side) {
                paddle.pos.x = config.clamp_paddle_x(ball_x - paddle.width / 2.0);
            }
        }
        step(&mut state, &config, &mut events, &mut rng);
        assert!(events.scored.is_none(), "Rally should not break");
        let speed = state.ball().map(|b| b.vel.length()).unwrap_or(0.0);
        assert!(speed >= last_speed - 1e-4);
        last_speed = speed;
    }
}

proptest! {
    #[test]
    fn prop_paddle_stays_on_table(x in -2000.0f32..2000.0, speed in -50.0f32..50.0) {
        let config = Config::new();
        let mut paddle = Paddle::new(Side::Player1, Vec2::new(x, 20.0), config.paddle_width, config.paddle_height);
        paddle.speed = speed;
        advance_paddle(&mut paddle, config.table_width);
        prop_assert!(paddle.pos.x >= 0.0);
        prop_assert!(paddle.pos.x <= config.table_width - config.paddle_width);
    }

    #[test]
    fn prop_wall_bounce_inside_is_noop(x in 8.0f32..792.0, y in 0.0f32..600.0, vx in -20.0f32..20.0, vy in -20.0f32..20.0) {
        let mut ball = Ball::new(Vec2::new(x, y), Vec2::new(vx, vy), 8.0);
        prop_assert!(!wall_bounce(&mut ball, 800.0));
        prop_assert_eq!(ball.vel, Vec2::new(vx, vy));
        prop_assert_eq!(ball.pos, Vec2::new(x, y));
    }

    #[test]
    fn prop_wall_bounce_flips_only_x(overshoot in 0.01f32..30.0, vx in 0.1f32..20.0, vy in -20.0f32..20.0, right in any::<bool>()) {
        let (x, vel_x) = if right { (792.0 + overshoot, vx) } else { (8.0 - overshoot, -vx) };
        let mut ball = Ball::new(Vec2::new(x, 300.0), Vec2::new(vel_x, vy), 8.0);
        prop_assert!(wall_bounce(&mut ball, 800.0));
        prop_assert_eq!(ball.vel.x, -vel_x);
        prop_assert_eq!(ball.vel.y, vy);
    }

    #[test]
    fn prop_no_paddle_hit_when_moving_away(x in 350.0f32..450.0, y in 0.0f32..600.0, vx in -10.0f32..10.0, vy in 0.0f32..10.0) {
        let config = Config::new();
        let top = Paddle::new(Side::Player1, Vec2::new(350.0, 20.0), 100.0, 15.0);
        let bottom = Paddle::new(Side::Player2, Vec2::new(350.0, 565.0), 100.0, 15.0);

        // Moving down (away from top paddle)
        let mut ball = Ball::new(Vec2::new(x, y), Vec2::new(vx, vy), 8.0);
        prop_assert!(!paddle_collision(&mut ball, &top, config.ball_acceleration));

        // Moving up (away from bottom paddle)
        let mut ball = Ball::new(Vec2::new(x, y), Vec2::new(vx, -vy), 8.0);
        prop_assert!(!paddle_collision(&mut ball, &bottom, config.ball_acceleration));
    }

    #[test]
    fn prop_score_increments_by_one(points in 0u8..10, side_is_one in any::<bool>()) {
        let (mut state, config, _events, mut rng) = new_round();
        let side = if side_is_one { Side::Player1 } else { Side::Player2 };
        for _ in 0..points {
            state.apply_score(side, &config, &mut rng);
        }
        let before = state.score.get(side);
        state.apply_score(side, &config, &mut rng);
        prop_assert_eq!(state.score.get(side), before + 1);
        prop_assert_eq!(state.score.get(side.opponent()), 0);
    }
}
