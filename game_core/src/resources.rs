use crate::Side;

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub player1: u8,
    pub player2: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Player1 => self.player1,
            Side::Player2 => self.player2,
        }
    }

    /// Add a point and return the new total for that side
    pub fn increment(&mut self, side: Side) -> u8 {
        let slot = match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn has_winner(&self, win_score: u8) -> Option<Side> {
        if self.player1 >= win_score {
            Some(Side::Player1)
        } else if self.player2 >= win_score {
            Some(Side::Player2)
        } else {
            None
        }
    }
}

/// Source of randomness for serves and AI timing.
///
/// Injected so tests can script exact sequences.
pub trait RandomSource {
    /// Fair coin
    fn coin_flip(&mut self) -> bool;
    /// Uniform integer in `0..n`; `n` is never zero
    fn below(&mut self, n: u32) -> u32;
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

impl RandomSource for GameRng {
    fn coin_flip(&mut self) -> bool {
        use rand::Rng;
        self.0.gen_bool(0.5)
    }

    fn below(&mut self, n: u32) -> u32 {
        use rand::Rng;
        self.0.gen_range(0..n.max(1))
    }
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Events {
    pub scored: Option<Side>,
    pub winner: Option<Side>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.scored = None;
        self.winner = None;
    }
}
