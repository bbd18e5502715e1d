//! Wall-clock time source and cancellable interval timers
//!
//! Frame physics runs on `dt`; cooldowns, coin spawns and mine lifespans run
//! on milliseconds read from a `Clock`. The host advances the clock with the
//! measured frame gap, tests advance it by hand.

/// Virtual millisecond clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    now_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self { now_ms }
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Advance by a frame gap in seconds
    pub fn advance(&mut self, dt: f32) {
        self.now_ms += dt as f64 * 1000.0;
    }

    pub fn advance_ms(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Jump to a host-supplied timestamp (never goes backwards)
    pub fn set(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

/// Recurring timer handle
///
/// Owners must `stop()` it when their screen exits. Stopping is idempotent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due: Option<f64>,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_due: None,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// (Re)start counting a full period from `now`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due = Some(now_ms + self.period_ms);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Consume one due firing, if any
    ///
    /// Call in a loop to catch up on every period that elapsed since the last
    /// frame.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.next_due {
            Some(due) if due <= now_ms => {
                self.next_due = Some(due + self.period_ms);
                true
            }
            _ => false,
        }
    }
}

/// One-shot countdown on the wall clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    at_ms: Option<f64>,
}

impl Deadline {
    pub fn after(now_ms: f64, duration_ms: f64) -> Self {
        Self {
            at_ms: Some(now_ms + duration_ms),
        }
    }

    pub fn cancelled() -> Self {
        Self { at_ms: None }
    }

    pub fn cancel(&mut self) {
        self.at_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.at_ms.is_some()
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        self.at_ms.is_some_and(|at| now_ms >= at)
    }
}
