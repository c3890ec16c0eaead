//! Frame clock for effect timing.
//!
//! One source of truth for elapsed and delta time across the stage.
//! Uses `std::time` for high-precision timing; a fixed delta can be
//! installed for deterministic updates in tests.
//!
//! # Example
//!
//! ```ignore
//! use sitefx::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = clock.update();
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
///
/// Tracks total elapsed time, time since last frame, and a frame counter.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        match self.fixed_delta {
            Some(fixed) => {
                // Deterministic mode: elapsed advances by the fixed step.
                self.delta_secs = fixed;
                self.elapsed_secs += fixed;
            }
            None => {
                self.delta_secs = raw_delta;
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }

        self.frame_count += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// While set, `update()` advances elapsed time by exactly this step
    /// regardless of wall-clock time. Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Reset the clock to its initial state.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
    }

    /// Get elapsed time as a Duration.
    #[inline]
    pub fn elapsed_duration(&self) -> Duration {
        Duration::from_secs_f32(self.elapsed_secs)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
