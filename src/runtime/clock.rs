//! Frame clock
//!
//! The clock starts counting when it is constructed and hands out the time
//! elapsed since the previous query. Time comes from a [`TimeSource`] so tests
//! can drive the frame loop deterministically with [`ManualTimeSource`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time since an arbitrary origin
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time source; clones share the same timeline
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs.max(0.0)));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Elapsed-time counter queried once per frame
pub struct Clock<T: TimeSource = SystemTimeSource> {
    source: T,
    last: Duration,
}

impl Clock<SystemTimeSource> {
    /// Starts a wall-clock timer immediately
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource::new())
    }
}

impl Default for Clock<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> Clock<T> {
    /// Starts a timer on the given source immediately
    pub fn with_source(source: T) -> Self {
        let last = source.now();
        Self { source, last }
    }

    /// Seconds since the previous call, or since construction on the first call
    ///
    /// Never negative, even if the source steps backwards.
    pub fn get_delta(&mut self) -> f32 {
        let now = self.source.now();
        let delta = now.saturating_sub(self.last);
        self.last = self.last.max(now);
        delta.as_secs_f32()
    }
}
