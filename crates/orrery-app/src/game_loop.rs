//! Fixed-timestep game loop implementing the "Fix Your Timestep" pattern.
//!
//! Decouples simulation (fixed 60 Hz) from rendering (variable rate) using
//! an accumulator. The per-tick angle increments in the scene assume this
//! fixed rate.

use std::time::Instant;
use tracing::warn;

/// Fixed simulation timestep: 60 Hz (16.666… ms per tick).
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Maximum frame time clamp to prevent spiral of death.
/// If a frame takes longer than this, we clamp and accept slowdown
/// rather than trying to catch up with dozens of simulation steps.
pub const MAX_FRAME_TIME: f64 = 0.25; // 250ms = 4 FPS minimum

/// Fixed-timestep game loop state.
///
/// Call [`tick`](Self::tick) once per frame to run simulation steps at a
/// fixed rate; the frame then renders once regardless of how many steps ran.
pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    /// Creates a new `GameLoop` starting from the current instant.
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame: measures elapsed time and runs zero or more
    /// fixed-rate simulation steps. Returns the number of steps run.
    pub fn tick(&mut self, mut update_fn: impl FnMut(f64)) -> u32 {
        let current_time = Instant::now();
        let mut frame_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = current_time;

        // Clamp frame time to prevent spiral of death
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0u32;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }

    /// Returns the total number of frames rendered.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the total number of simulation update steps executed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// A testable version of the game loop that accepts explicit frame times
/// instead of measuring wall-clock time.
#[cfg(test)]
struct TestableGameLoop {
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

#[cfg(test)]
impl TestableGameLoop {
    fn new() -> Self {
        Self {
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Tick with an explicit frame time (in seconds).
    fn tick(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64)) -> u32 {
        let clamped = frame_time.min(MAX_FRAME_TIME);
        self.accumulator += clamped;

        let mut steps = 0u32;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }
}
