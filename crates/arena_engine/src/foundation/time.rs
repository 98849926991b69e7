//! Time management utilities
//!
//! Gameplay timers never read the wall clock directly. Callers inject a
//! [`Clock`] and every cooldown is measured against the timestamp it returns,
//! so tests can step time explicitly with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of timestamps in seconds
pub trait Clock {
    /// Seconds elapsed since an arbitrary, fixed origin
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the moment of construction
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a manual clock starting at `start` seconds
    pub fn starting_at(start: f64) -> Self {
        Self { seconds: Rc::new(Cell::new(start)) }
    }

    /// Move time forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }

    /// Jump to an absolute time
    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}

/// Per-frame delta tracker
///
/// Fed with clock timestamps instead of sampling `Instant` itself.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_frame: Option<f64>,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer; deltas are clamped to a quarter second
    pub fn new() -> Self {
        Self::with_max_delta(0.25)
    }

    /// Create a timer that clamps long stalls to `max_delta` seconds
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta,
        }
    }

    /// Record a new frame at `now` and return the clamped delta in seconds
    ///
    /// The first frame always has a delta of zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        let elapsed = self.last_frame.map_or(0.0, |last| (now - last).max(0.0));
        #[allow(clippy::cast_possible_truncation)]
        let delta = (elapsed as f32).min(self.max_delta);
        self.delta_time = delta;
        self.total_time += f64::from(delta);
        self.last_frame = Some(now);
        self.frame_count += 1;
        delta
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Wall-clock cooldown started by an event (a hit, an attack, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f64,
    started_at: Option<f64>,
}

impl Cooldown {
    /// Create an idle cooldown of `duration` seconds
    pub fn new(duration: f64) -> Self {
        Self { duration, started_at: None }
    }

    /// Start (or restart) the cooldown at `now`
    pub fn start(&mut self, now: f64) {
        self.started_at = Some(now);
    }

    /// Forget any running cooldown
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Seconds since the cooldown was last started
    pub fn elapsed(&self, now: f64) -> Option<f64> {
        self.started_at.map(|start| now - start)
    }

    /// True while less than `duration` has passed since the last start
    pub fn is_running(&self, now: f64) -> bool {
        self.elapsed(now).is_some_and(|elapsed| elapsed < self.duration)
    }

    /// True when never started or when the duration has fully elapsed
    pub fn is_ready(&self, now: f64) -> bool {
        !self.is_running(now)
    }

    /// Configured duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }
}
