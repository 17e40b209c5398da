use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of monotonic time, injectable so tests can drive the clock
/// without real waits
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced time source for tests and replay harnesses
#[derive(Debug)]
pub struct ManualTimeSource {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the source forward by `delta`
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.lock().expect("time offset lock poisoned");
        *offset += delta;
    }

    /// Move the source forward by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().expect("time offset lock poisoned");
        self.origin + *offset
    }
}

/// Remaining time decomposed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub total: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub fn from_secs(total: u64) -> Self {
        Self {
            total,
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    /// Format as "MM:SS"
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Countdown against an absolute deadline.
///
/// Remaining time is recomputed from `deadline - now` on every tick rather
/// than decremented, so a stalled or suspended host never stretches the
/// interval beyond real elapsed time. Expiry is reported exactly once per
/// `start`: the deadline is cleared before the caller sees it.
pub struct Clock {
    time: Arc<dyn TimeSource>,
    deadline: Option<Instant>,
    remaining: Remaining,
}

impl Clock {
    pub fn new(time: Arc<dyn TimeSource>) -> Self {
        Self {
            time,
            deadline: None,
            remaining: Remaining::default(),
        }
    }

    /// Begin counting down `duration` from now. Starting while already
    /// running replaces the prior deadline; there is never more than one.
    pub fn start(&mut self, duration: Duration) {
        let now = self.time.now();
        self.deadline = Some(now + duration);
        self.remaining = Remaining::from_secs(duration.as_secs());
    }

    /// Cancel the countdown, keeping the last computed remaining time so a
    /// later `start` can resume it. No-op when not running.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Stop and reset the displayed remaining time to a full duration
    pub fn reload(&mut self, duration: Duration) {
        self.deadline = None;
        self.remaining = Remaining::from_secs(duration.as_secs());
    }

    /// Recompute remaining time from the deadline. Returns true exactly once
    /// when the countdown reaches zero; the deadline is cleared before
    /// returning so a slow expiry handler cannot observe a second expiry.
    pub fn tick(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        let now = self.time.now();
        let left = deadline.saturating_duration_since(now);
        self.remaining = Remaining::from_secs(left.as_secs());

        if self.remaining.total == 0 {
            self.deadline = None;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self) -> Remaining {
        self.remaining
    }

    /// Remaining time as a duration, for resuming after a pause
    pub fn remaining_duration(&self) -> Duration {
        Duration::from_secs(self.remaining.total)
    }
}
