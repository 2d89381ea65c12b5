//! `Clock`: maps wall-clock time onto simulation time, with a
//! configurable speed and a clamp on how far a single tick gap (a
//! debugger stall, the process being suspended, a slow frame) is
//! allowed to push the simulation forward.

use crate::time::{Time, TIME_ZERO};
use std::cell::Cell;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Init,
    Stopped,
    Paused,
    Running,
}

/// Pure accumulation step, split out from [`Clock::update_time`] so it
/// can be tested without depending on wall-clock timing: given how
/// much real time passed and the configured clamp and speed, compute
/// how much simulation time and simulation-real-time to add.
fn advance(elapsed_ms: i64, max_tick_time_ms: i64, speed: f64) -> (Time, Time) {
    let clamped_ms = elapsed_ms.min(max_tick_time_ms);
    (Time::from_millis(clamped_ms) * speed, Time::from_millis(clamped_ms))
}

pub struct Clock {
    state: Cell<ClockState>,
    speed: Cell<f64>,
    max_tick_time_ms: i64,
    sim_time: Cell<Time>,
    sim_real_time: Cell<Time>,
    last_check: Cell<Option<Instant>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// `max_tick_time` defaults to 50ms, matching the stall-absorption
    /// clamp used throughout the original clock.
    pub fn new() -> Self {
        Self::with_max_tick_time(50)
    }

    pub fn with_max_tick_time(max_tick_time_ms: i64) -> Self {
        Self {
            state: Cell::new(ClockState::Init),
            speed: Cell::new(1.0),
            max_tick_time_ms,
            sim_time: Cell::new(TIME_ZERO),
            sim_real_time: Cell::new(TIME_ZERO),
            last_check: Cell::new(None),
        }
    }

    pub fn get_time(&self) -> Time {
        self.sim_time.get()
    }

    pub fn get_real_time(&self) -> Time {
        self.sim_real_time.get()
    }

    pub fn speed(&self) -> f64 {
        self.speed.get()
    }

    pub fn state(&self) -> ClockState {
        self.state.get()
    }

    /// Set the speed multiplier. Calls `update_time` first so the
    /// elapsed real time under the *old* speed is not silently
    /// attributed to the new one.
    pub fn set_speed(&self, speed: f64) {
        self.update_time();
        self.speed.set(speed);
    }

    pub fn start(&self) {
        self.update_time();
        self.state.set(ClockState::Running);
        self.last_check.set(Some(Instant::now()));
    }

    pub fn stop(&self) {
        self.update_time();
        self.state.set(ClockState::Stopped);
    }

    pub fn pause(&self) {
        self.update_time();
        self.state.set(ClockState::Paused);
    }

    pub fn resume(&self) {
        self.update_time();
        self.state.set(ClockState::Running);
        self.last_check.set(Some(Instant::now()));
    }

    /// Pull the simulation clock forward by however much wall-clock
    /// time has passed since the last call, scaled by `speed` and
    /// clamped by `max_tick_time`.
    ///
    /// A host render/input loop is expected to call this once per
    /// frame. If the elapsed wall-clock delta rounds to zero
    /// milliseconds (calls faster than millisecond resolution), this
    /// returns without advancing anything rather than blocking the
    /// caller to force a non-zero delta.
    pub fn update_time(&self) {
        if self.state.get() != ClockState::Running {
            return;
        }
        let now = Instant::now();
        let last = match self.last_check.get() {
            Some(last) => last,
            None => {
                self.last_check.set(Some(now));
                return;
            }
        };
        let elapsed_ms = now.duration_since(last).as_millis() as i64;
        if elapsed_ms == 0 {
            return;
        }
        self.last_check.set(Some(now));
        if elapsed_ms > self.max_tick_time_ms {
            log::warn!(
                "clock tick gap of {elapsed_ms}ms exceeded max_tick_time of {}ms, clamping",
                self.max_tick_time_ms
            );
        }
        let (sim_delta, real_delta) = advance(elapsed_ms, self.max_tick_time_ms, self.speed.get());
        self.sim_time.set(self.sim_time.get() + sim_delta);
        self.sim_real_time.set(self.sim_real_time.get() + real_delta);
    }
}
