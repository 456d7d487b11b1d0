//! Fixed timestep accumulator
//!
//! Converts irregular display-refresh deltas into a whole number of
//! fixed-size simulation steps. The remainder carries over to the next frame.

use crate::consts::{ACCUMULATOR_EPSILON_MS, MAX_FRAME_DELTA_MS, TIMESTEP_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Uninitialized,
    Running,
}

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f64,
    max_delta_ms: f64,
    accumulator: f64,
    last_time: f64,
    state: ClockState,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TIMESTEP_MS, MAX_FRAME_DELTA_MS)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            step_ms,
            max_delta_ms,
            accumulator: 0.0,
            last_time: 0.0,
            state: ClockState::Uninitialized,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Time carried over to the next frame
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    /// Record the starting timestamp and begin running
    pub fn start(&mut self, now_ms: f64) {
        self.last_time = now_ms;
        self.accumulator = 0.0;
        self.state = ClockState::Running;
    }

    /// Steps owed for the frame at `now_ms`
    ///
    /// The first call on an unstarted clock only starts it.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if self.state == ClockState::Uninitialized {
            self.start(now_ms);
            return 0;
        }
        let steps = self.accumulate(now_ms - self.last_time);
        self.last_time = now_ms;
        steps
    }

    /// Feed a raw frame delta and drain whole steps from the accumulator
    pub fn accumulate(&mut self, raw_delta_ms: f64) -> u32 {
        // Clamp stalls (tab backgrounding) and clock skew
        let delta = raw_delta_ms.clamp(0.0, self.max_delta_ms);
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.step_ms - ACCUMULATOR_EPSILON_MS {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }
}
