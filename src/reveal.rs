// Programmatic full-surface reveal: a timed fade of the whole overlay.

use crate::clock::{AnimationClock, Tick, TickSubscription};
use std::time::Duration;

/// Where a session is in its life.
///
/// ```text
/// Idle --first point--> Scratching --reveal()--> Revealing --progress 1--> FullyRevealed
///   \___________________reveal()_______________/^
/// any state --reset()--> Idle
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScratchState {
    #[default]
    Idle,
    Scratching,
    Revealing,
    FullyRevealed,
}

impl ScratchState {
    /// Scratch input is only taken before any reveal.
    pub fn accepts_input(self) -> bool {
        matches!(self, ScratchState::Idle | ScratchState::Scratching)
    }

    pub fn is_revealed(self) -> bool {
        matches!(self, ScratchState::Revealing | ScratchState::FullyRevealed)
    }
}

/// Owns the clock subscription for the current reveal, if any.
#[derive(Debug)]
pub struct RevealController<C: AnimationClock> {
    clock: C,
    state: ScratchState,
    active: Option<TickSubscription>,
    progress: f32,
}

impl<C: AnimationClock> RevealController<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, state: ScratchState::Idle, active: None, progress: 0.0 }
    }

    pub fn state(&self) -> ScratchState {
        self.state
    }

    /// Reveal animation progress in [0, 1]; 0 when no reveal has started.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// First accepted scratch point of a session.
    pub fn note_scratch(&mut self) {
        if self.state == ScratchState::Idle {
            self.state = ScratchState::Scratching;
        }
    }

    /// Start fading the overlay out over `duration`.
    /// Any reveal already running is cancelled first.
    pub fn reveal(&mut self, duration: Duration) {
        self.cancel();
        self.active = Some(self.clock.subscribe(duration));
        self.progress = 0.0;
        self.state = ScratchState::Revealing;
        tracing::debug!(?duration, "reveal started");
    }

    /// Apply one tick. Ticks for any subscription other than the live one are
    /// stale and ignored. Returns true if visible state changed.
    pub fn handle_tick(&mut self, tick: Tick) -> bool {
        if self.state != ScratchState::Revealing || self.active != Some(tick.subscription) {
            return false;
        }
        let p = tick.progress.clamp(0.0, 1.0);
        let changed = p > self.progress;
        self.progress = self.progress.max(p);
        if tick.is_final() {
            self.progress = 1.0;
            self.cancel();
            self.state = ScratchState::FullyRevealed;
            tracing::debug!("reveal finished");
            return true;
        }
        changed
    }

    /// Drain the clock and apply every tick. Returns true if anything changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        for tick in self.clock.drain() {
            changed |= self.handle_tick(tick);
        }
        changed
    }

    /// Overlay alpha multiplier: 1 until a reveal starts, then 1 - progress.
    pub fn opacity(&self) -> f32 {
        match self.state {
            ScratchState::Idle | ScratchState::Scratching => 1.0,
            ScratchState::Revealing => 1.0 - self.progress,
            ScratchState::FullyRevealed => 0.0,
        }
    }

    /// False once fully revealed: the overlay is skipped entirely.
    pub fn overlay_visible(&self) -> bool {
        self.state != ScratchState::FullyRevealed
    }

    /// Back to Idle. Detaches from the clock before returning.
    pub fn reset(&mut self) {
        self.cancel();
        self.state = ScratchState::Idle;
        self.progress = 0.0;
    }

    /// Release the clock subscription without changing the state.
    pub fn cancel(&mut self) {
        if let Some(id) = self.active.take() {
            self.clock.unsubscribe(id);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_state_machine() {
        let mut rc = RevealController::new(ManualClock::new());
        assert_eq!(rc.state(), ScratchState::Idle);
        rc.note_scratch();
        assert_eq!(rc.state(), ScratchState::Scratching);
        rc.reveal(ms(100));
        assert_eq!(rc.state(), ScratchState::Revealing);
        assert!(!rc.state().accepts_input());
        // Scratching after a reveal doesn't roll the state back.
        rc.note_scratch();
        assert_eq!(rc.state(), ScratchState::Revealing);

        rc.clock_mut().advance(ms(100));
        assert!(rc.pump());
        assert_eq!(rc.state(), ScratchState::FullyRevealed);
        assert!(!rc.overlay_visible());
        assert!(!rc.is_animating());

        rc.reset();
        assert_eq!(rc.state(), ScratchState::Idle);
        assert!(rc.state().accepts_input());
    }

    #[test]
    fn test_opacity_follows_progress() {
        let mut rc = RevealController::new(ManualClock::new());
        assert_eq!(rc.opacity(), 1.0);
        rc.reveal(ms(1000));
        rc.pump();
        assert_eq!(rc.opacity(), 1.0);
        rc.clock_mut().advance(ms(250));
        rc.pump();
        assert_eq!(rc.opacity(), 0.75);
        rc.clock_mut().advance(ms(750));
        rc.pump();
        assert_eq!(rc.opacity(), 0.0);
    }

    #[test]
    fn test_reset_detaches_from_clock() {
        let mut rc = RevealController::new(ManualClock::new());
        rc.reveal(ms(100));
        rc.reset();
        assert!(!rc.clock().is_running());
        rc.clock_mut().advance(ms(50));
        assert!(!rc.pump());
        assert_eq!(rc.state(), ScratchState::Idle);
        assert_eq!(rc.progress(), 0.0);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut rc = RevealController::new(ManualClock::new());
        rc.reveal(ms(100));
        rc.clock_mut().advance(ms(50));
        let stale = rc.clock_mut().drain();
        rc.reveal(ms(100)); // restart: old subscription is gone
        for t in &stale {
            assert!(!rc.handle_tick(*t));
        }
        assert_eq!(rc.progress(), 0.0);

        let current = rc.active.unwrap();
        rc.reset();
        let late = Tick { subscription: current, progress: 1.0 };
        assert!(!rc.handle_tick(late));
        assert_eq!(rc.state(), ScratchState::Idle);
    }

    #[test]
    fn test_progress_never_goes_backwards() {
        let mut rc = RevealController::new(ManualClock::new());
        rc.reveal(ms(100));
        let sub = rc.active.unwrap();
        assert!(rc.handle_tick(Tick { subscription: sub, progress: 0.6 }));
        assert!(!rc.handle_tick(Tick { subscription: sub, progress: 0.3 }));
        assert_eq!(rc.progress(), 0.6);
    }
}
