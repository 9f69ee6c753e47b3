use crate::physics::check_out_of_bounds;
use crate::{Config, Events, GameState, RandomSource};

/// Check if ball left the table past a goal line and credit the other side
pub fn check_scoring(
    state: &mut GameState,
    config: &Config,
    events: &mut Events,
    rng: &mut dyn RandomSource,
) {
    let Some(ball) = state.ball() else {
        return;
    };
    let Some(conceded) = check_out_of_bounds(&ball, config.table_height) else {
        return;
    };

    let scorer = conceded.opponent();
    state.apply_score(scorer, config, rng);
    events.scored = Some(scorer);
    if state.winner.is_some() {
        events.winner = state.winner;
    }
    log::debug!(
        "{scorer:?} scored: {}-{}",
        state.score.player1,
        state.score.player2
    );
}
