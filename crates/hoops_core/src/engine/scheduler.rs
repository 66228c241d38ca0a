//! Scheduled tasks owned by the match controller.
//!
//! Every timer in the engine is one of these: explicit, cancelable and
//! resettable, and advanced only when the controller hands it elapsed time.
//! Both kinds report the time to their next firing so the controller can
//! slice a large time step at every deadline.

/// Repeating task. Pausing discards accumulated time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTask {
    period_ms: u64,
    elapsed_ms: u64,
    paused: bool,
}

impl PeriodicTask {
    pub fn new(period_ms: u64) -> Self {
        Self { period_ms: period_ms.max(1), elapsed_ms: 0, paused: false }
    }

    pub fn paused(period_ms: u64) -> Self {
        Self { paused: true, ..Self::new(period_ms) }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Changes the period and restarts the current cycle.
    pub fn set_period(&mut self, period_ms: u64) {
        self.period_ms = period_ms.max(1);
        self.elapsed_ms = 0;
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.elapsed_ms = 0;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.elapsed_ms = 0;
    }

    /// Time until the next firing, `None` while paused.
    pub fn remaining_ms(&self) -> Option<u64> {
        if self.paused {
            None
        } else {
            Some(self.period_ms - self.elapsed_ms)
        }
    }

    /// Returns how many times the task fired during `dt_ms`.
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        if self.paused {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let fires = self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        fires as u32
    }
}

/// Fires once after a delay, then stays quiet until re-armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShotTask {
    delay_ms: u64,
    elapsed_ms: u64,
    armed: bool,
}

impl OneShotTask {
    pub fn armed(delay_ms: u64) -> Self {
        Self { delay_ms, elapsed_ms: 0, armed: true }
    }

    pub fn disarmed(delay_ms: u64) -> Self {
        Self { delay_ms, elapsed_ms: 0, armed: false }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.elapsed_ms = 0;
    }

    pub fn arm_with(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
        self.arm();
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.elapsed_ms = 0;
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        if self.armed {
            Some(self.delay_ms.saturating_sub(self.elapsed_ms).max(1))
        } else {
            None
        }
    }

    /// True exactly once, on the step that reaches the delay.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.delay_ms {
            self.armed = false;
            self.elapsed_ms = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_fires_per_period() {
        let mut task = PeriodicTask::new(1000);
        assert_eq!(task.advance(999), 0);
        assert_eq!(task.remaining_ms(), Some(1));
        assert_eq!(task.advance(1), 1);
        assert_eq!(task.advance(2500), 2);
        assert_eq!(task.remaining_ms(), Some(500));
    }

    #[test]
    fn test_periodic_pause_discards_progress() {
        let mut task = PeriodicTask::new(8000);
        task.advance(7000);
        task.pause();
        assert_eq!(task.advance(5000), 0);
        assert_eq!(task.remaining_ms(), None);
        task.resume();
        assert_eq!(task.remaining_ms(), Some(8000));
    }

    #[test]
    fn test_periodic_set_period_restarts_cycle() {
        let mut task = PeriodicTask::new(8000);
        task.advance(3000);
        task.set_period(4000);
        assert_eq!(task.remaining_ms(), Some(4000));
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut task = OneShotTask::armed(15_000);
        assert!(!task.advance(14_999));
        assert!(task.advance(1));
        assert!(!task.advance(20_000));
        assert_eq!(task.remaining_ms(), None);
    }

    #[test]
    fn test_one_shot_rearm() {
        let mut task = OneShotTask::disarmed(2000);
        assert!(!task.advance(5000));
        task.arm();
        assert_eq!(task.remaining_ms(), Some(2000));
        task.advance(1500);
        task.arm_with(1000);
        assert_eq!(task.remaining_ms(), Some(1000));
    }
}
