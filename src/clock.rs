// Animation clock: hands out 0 -> 1 ramps over a duration.
//
// The surface subscribes a ramp when a reveal starts and unsubscribes it,
// synchronously, when the reveal is replaced or the session is reset. Ticks
// are drained by the host thread and carry the subscription they belong to,
// so a tick that was already in flight when its ramp got cancelled can be
// recognised and dropped.

use std::time::{Duration, Instant};

/// Handle to one subscribed ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickSubscription(u64);

/// One progress sample for one subscription.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub subscription: TickSubscription,
    /// In [0, 1]; the final tick of a ramp is exactly 1.0.
    pub progress: f32,
}

impl Tick {
    pub fn is_final(&self) -> bool {
        self.progress >= 1.0
    }
}

pub trait AnimationClock {
    /// Start a ramp that reaches 1.0 after `duration`.
    fn subscribe(&mut self, duration: Duration) -> TickSubscription;

    /// Stop a ramp. After this returns, `drain` never yields it again.
    fn unsubscribe(&mut self, subscription: TickSubscription);

    /// Progress of every live ramp right now. Ramps that reach 1.0 are
    /// reported once more at exactly 1.0 and then dropped.
    fn drain(&mut self) -> Vec<Tick>;

    /// True while any ramp is live.
    fn is_running(&self) -> bool;
}

#[derive(Debug)]
struct Ramp {
    id: TickSubscription,
    started: Duration,
    duration: Duration,
}

impl Ramp {
    fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Bookkeeping shared by both clocks; time is a Duration since some origin.
#[derive(Debug, Default)]
struct Ramps {
    next_id: u64,
    live: Vec<Ramp>,
}

impl Ramps {
    fn add(&mut self, now: Duration, duration: Duration) -> TickSubscription {
        self.next_id += 1;
        let id = TickSubscription(self.next_id);
        self.live.push(Ramp { id, started: now, duration });
        id
    }

    fn remove(&mut self, id: TickSubscription) {
        self.live.retain(|r| r.id != id);
    }

    fn drain(&mut self, now: Duration) -> Vec<Tick> {
        let ticks: Vec<Tick> = self
            .live
            .iter()
            .map(|r| Tick { subscription: r.id, progress: r.progress(now) })
            .collect();
        self.live.retain(|r| r.progress(now) < 1.0);
        ticks
    }
}

/// Wall-clock ramps, sampled whenever the host drains (once per frame).
#[derive(Debug)]
pub struct FrameClock {
    origin: Instant,
    ramps: Ramps,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), ramps: Ramps::default() }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl AnimationClock for FrameClock {
    fn subscribe(&mut self, duration: Duration) -> TickSubscription {
        let now = self.now();
        self.ramps.add(now, duration)
    }

    fn unsubscribe(&mut self, subscription: TickSubscription) {
        self.ramps.remove(subscription);
    }

    fn drain(&mut self) -> Vec<Tick> {
        let now = self.now();
        self.ramps.drain(now)
    }

    fn is_running(&self) -> bool {
        !self.ramps.live.is_empty()
    }
}

/// Time only moves when told to. For tests and fixed-step hosts.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    ramps: Ramps,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }
}

impl AnimationClock for ManualClock {
    fn subscribe(&mut self, duration: Duration) -> TickSubscription {
        self.ramps.add(self.now, duration)
    }

    fn unsubscribe(&mut self, subscription: TickSubscription) {
        self.ramps.remove(subscription);
    }

    fn drain(&mut self) -> Vec<Tick> {
        self.ramps.drain(self.now)
    }

    fn is_running(&self) -> bool {
        !self.ramps.live.is_empty()
    }
}
