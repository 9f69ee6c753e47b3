//! Frame loop driver
//!
//! The loop never owns a timer. It asks a [`Scheduler`] for the next frame
//! and is called back through [`GameLoop::on_frame`] with the handle it was
//! given. Only the most recently scheduled handle is honoured, so at most one
//! tick is ever in flight and `stop` takes effect immediately even if the
//! platform still fires a cancelled callback.

use crate::{step, Config, Events, GameState, RandomSource, Side};

/// Token for one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Platform timer: display refresh in the browser, manual stepping in tests
pub trait Scheduler {
    /// Request a tick on the next display refresh
    fn schedule_frame(&mut self) -> FrameHandle;
    /// Request a tick after a fixed delay
    fn schedule_after(&mut self, delay_ms: u32) -> FrameHandle;
    /// Drop a pending tick. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Drawing surface for the playfield
pub trait Renderer {
    /// Forget any cached drawing context; the surface may have been swapped
    fn reset_context(&mut self);
    fn draw(&mut self, state: &GameState, config: &Config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Running,
    Ended,
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Callback for a handle that is no longer pending; nothing ran
    Stale,
    /// The round is not running; the loop went idle without ticking
    Halted,
    /// Ticked and scheduled the next frame
    Continued(Events),
    /// Ticked, a winner was set, no further frames scheduled
    Ended(Side),
}

#[derive(Debug)]
pub struct GameLoop {
    phase: LoopPhase,
    pending: Option<FrameHandle>,
    events: Events,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            phase: LoopPhase::Idle,
            pending: None,
            events: Events::new(),
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// (Re)start the loop. Any pending tick is cancelled first.
    pub fn start(
        &mut self,
        scheduler: &mut dyn Scheduler,
        renderer: &mut dyn Renderer,
        delay_ms: Option<u32>,
    ) {
        self.stop(scheduler);
        renderer.reset_context();
        let handle = match delay_ms {
            Some(ms) => scheduler.schedule_after(ms),
            None => scheduler.schedule_frame(),
        };
        self.pending = Some(handle);
        self.phase = LoopPhase::Running;
        log::debug!("Game loop started ({handle:?}, delay {delay_ms:?})");
    }

    /// Cancel the pending tick, if any. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    /// Stop and return to idle, e.g. when every player has left.
    pub fn reset(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop(scheduler);
        self.phase = LoopPhase::Idle;
    }

    /// Run one tick for `handle`.
    #[allow(clippy::too_many_arguments)]
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        state: &mut GameState,
        config: &Config,
        rng: &mut dyn RandomSource,
        scheduler: &mut dyn Scheduler,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        if self.pending != Some(handle) {
            return FrameOutcome::Stale;
        }
        self.pending = None;

        if !state.running {
            self.phase = LoopPhase::Idle;
            return FrameOutcome::Halted;
        }

        step(state, config, &mut self.events, rng);
        renderer.draw(state, config);

        if let Some(winner) = self.events.winner {
            self.phase = LoopPhase::Ended;
            log::info!("Round over, {winner:?} wins");
            return FrameOutcome::Ended(winner);
        }

        self.pending = Some(scheduler.schedule_frame());
        FrameOutcome::Continued(self.events)
    }
}
