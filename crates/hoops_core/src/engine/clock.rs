//! Match clock: authoritative countdown for the final minutes.
//!
//! Counts down once per elapsed second while running. Crossing the critical
//! threshold is reported once per match; reaching zero halts the clock. The
//! clock is never paused by a skill check.

use super::config::ClockConfig;
use super::scheduler::PeriodicTask;

const MS_PER_SECOND: u64 = 1000;

/// What happened during one clock advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTick {
    pub seconds_elapsed: u32,
    pub entered_critical: bool,
    pub expired: bool,
}

impl ClockTick {
    pub fn is_quiet(&self) -> bool {
        self.seconds_elapsed == 0
    }
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    remaining_seconds: u32,
    critical_threshold: u32,
    critical_fired: bool,
    ticker: PeriodicTask,
}

impl MatchClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            remaining_seconds: config.start_seconds,
            critical_threshold: config.critical_threshold_seconds,
            critical_fired: false,
            ticker: PeriodicTask::paused(MS_PER_SECOND),
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        !self.ticker.is_paused()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    pub fn critical_fired(&self) -> bool {
        self.critical_fired
    }

    pub fn start(&mut self) {
        if !self.is_expired() {
            self.ticker.resume();
        }
    }

    pub fn halt(&mut self) {
        self.ticker.pause();
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.ticker.remaining_ms()
    }

    /// Feeds wall time into the clock; whole seconds are applied as ticks.
    pub fn advance(&mut self, dt_ms: u64) -> ClockTick {
        let seconds = self.ticker.advance(dt_ms);
        self.tick_seconds(seconds)
    }

    /// Applies `seconds` of countdown at once. Safe for irregular delivery:
    /// the threshold is detected by crossing, not by exact equality.
    pub fn tick_seconds(&mut self, seconds: u32) -> ClockTick {
        if seconds == 0 || !self.is_running() {
            return ClockTick::default();
        }

        let before = self.remaining_seconds;
        self.remaining_seconds = before.saturating_sub(seconds);
        let mut tick =
            ClockTick { seconds_elapsed: before - self.remaining_seconds, ..ClockTick::default() };

        if !self.critical_fired && self.remaining_seconds <= self.critical_threshold {
            self.critical_fired = true;
            tick.entered_critical = true;
        }

        if self.remaining_seconds == 0 {
            self.ticker.pause();
            tick.expired = true;
        }

        tick
    }
}
