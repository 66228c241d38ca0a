//! Timing-window skill check.
//!
//! A bounded-time mini-game resolved to a boolean. Two motions exist:
//!
//! - **Linear**: progress runs 0 → 100 over the duration, one success zone.
//! - **Oscillating**: position bounces between 0 and 100 at a fixed speed
//!   for the whole duration, with success zones near both extremes.
//!
//! At most one stop input is accepted. A window that times out resolves as a
//! failure. Either way the result is reported exactly once, followed by a
//! short acknowledgment with no resolution semantics. A cancelled window
//! never reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{DefenseCheckKind, TimingConfig};
use super::scheduler::OneShotTask;
use super::state::PossessionAction;

const SCALE_MAX: f64 = 100.0;

// ============================================
// Zones
// ============================================

/// Inclusive success range on the 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Zone {
    pub start: f64,
    pub end: f64,
}

impl Zone {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start >= 0.0 && self.end <= SCALE_MAX && self.start <= self.end
    }
}

// ============================================
// Check types
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Linear sweep before a shot
    Shooting,
    /// Linear sweep on defense
    Defense,
    /// Oscillating shot-block sweep
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SweepMotion {
    Linear,
    Oscillating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Active,
    Acknowledging,
    Done,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub success: bool,
    /// Sweep value at resolution.
    pub value: f64,
    pub timed_out: bool,
}

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckView {
    pub kind: CheckKind,
    pub motion: SweepMotion,
    pub status: CheckStatus,
    pub value: f64,
    pub elapsed_ms: u64,
    pub duration_ms: u64,
    pub zones: Vec<Zone>,
    pub result: Option<CheckResult>,
}

// ============================================
// TimingWindow
// ============================================

#[derive(Debug, Clone)]
pub struct TimingWindow {
    kind: CheckKind,
    motion: SweepMotion,
    zones: Vec<Zone>,
    duration_ms: u64,
    elapsed_ms: u64,
    value: f64,
    /// +1.0 or -1.0, oscillating motion only.
    direction: f64,
    speed_per_ms: f64,
    status: CheckStatus,
    acknowledgment: OneShotTask,
    result: Option<CheckResult>,
}

impl TimingWindow {
    pub fn linear(kind: CheckKind, zone: Zone, duration_ms: u64, acknowledge_ms: u64) -> Self {
        Self {
            kind,
            motion: SweepMotion::Linear,
            zones: vec![zone],
            duration_ms: duration_ms.max(1),
            elapsed_ms: 0,
            value: 0.0,
            direction: 1.0,
            speed_per_ms: 0.0,
            status: CheckStatus::Active,
            acknowledgment: OneShotTask::disarmed(acknowledge_ms),
            result: None,
        }
    }

    pub fn oscillating(
        kind: CheckKind,
        zones: Vec<Zone>,
        start: f64,
        speed_per_ms: f64,
        duration_ms: u64,
        acknowledge_ms: u64,
    ) -> Self {
        Self {
            motion: SweepMotion::Oscillating,
            zones,
            value: start.clamp(0.0, SCALE_MAX),
            speed_per_ms,
            ..Self::linear(kind, Zone::new(0.0, 0.0), duration_ms, acknowledge_ms)
        }
    }

    /// Builds the check for `action`. Critical moments get the short duration.
    pub fn from_config(action: PossessionAction, critical: bool, config: &TimingConfig) -> Self {
        let duration = if critical {
            config.critical_duration_ms
        } else {
            config.playing_duration_ms
        };
        match (action, config.defense_check) {
            (PossessionAction::Offense, _) => Self::linear(
                CheckKind::Shooting,
                config.shooting_zone,
                duration,
                config.acknowledge_ms,
            ),
            (PossessionAction::Defense, DefenseCheckKind::Sweep) => Self::linear(
                CheckKind::Defense,
                config.defense_zone,
                duration,
                config.acknowledge_ms,
            ),
            (PossessionAction::Defense, DefenseCheckKind::Block) => Self::oscillating(
                CheckKind::Block,
                config.block_zones.clone(),
                config.oscillation_start,
                config.oscillation_speed,
                duration,
                config.acknowledge_ms,
            ),
        }
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn result(&self) -> Option<CheckResult> {
        self.result
    }

    /// Accepting input.
    pub fn is_active(&self) -> bool {
        self.status == CheckStatus::Active
    }

    /// Active or still acknowledging; a new check may not start yet.
    pub fn is_busy(&self) -> bool {
        matches!(self.status, CheckStatus::Active | CheckStatus::Acknowledging)
    }

    /// Time to the next state change, `None` once finished.
    pub fn remaining_ms(&self) -> Option<u64> {
        match self.status {
            CheckStatus::Active => Some(self.duration_ms - self.elapsed_ms),
            CheckStatus::Acknowledging => self.acknowledgment.remaining_ms(),
            CheckStatus::Done | CheckStatus::Cancelled => None,
        }
    }

    /// The stop input. Returns the result only for the first input on an active window.
    pub fn stop(&mut self) -> Option<CheckResult> {
        if !self.is_active() {
            return None;
        }
        let success = self.zones.iter().any(|zone| zone.contains(self.value));
        Some(self.resolve(success, false))
    }

    /// Moves the sweep forward. Reports the timeout failure when the duration runs out.
    pub fn advance(&mut self, dt_ms: u64) -> Option<CheckResult> {
        match self.status {
            CheckStatus::Active => {
                let step = dt_ms.min(self.duration_ms - self.elapsed_ms);
                self.elapsed_ms += step;
                self.move_sweep(step);
                if self.elapsed_ms >= self.duration_ms {
                    return Some(self.resolve(false, true));
                }
                None
            }
            CheckStatus::Acknowledging => {
                if self.acknowledgment.advance(dt_ms) {
                    self.status = CheckStatus::Done;
                }
                None
            }
            CheckStatus::Done | CheckStatus::Cancelled => None,
        }
    }

    /// Tears the window down. No result is reported afterwards.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!(kind = ?self.kind, "skill check cancelled before resolution");
        }
        self.status = CheckStatus::Cancelled;
        self.acknowledgment.disarm();
    }

    pub fn view(&self) -> CheckView {
        CheckView {
            kind: self.kind,
            motion: self.motion,
            status: self.status,
            value: self.value,
            elapsed_ms: self.elapsed_ms,
            duration_ms: self.duration_ms,
            zones: self.zones.clone(),
            result: self.result,
        }
    }

    fn resolve(&mut self, success: bool, timed_out: bool) -> CheckResult {
        let result = CheckResult { kind: self.kind, success, value: self.value, timed_out };
        self.result = Some(result);
        self.status = CheckStatus::Acknowledging;
        self.acknowledgment.arm();
        debug!(kind = ?self.kind, success, timed_out, value = self.value, "skill check resolved");
        result
    }

    fn move_sweep(&mut self, step_ms: u64) {
        match self.motion {
            SweepMotion::Linear => {
                self.value = self.elapsed_ms as f64 / self.duration_ms as f64 * SCALE_MAX;
            }
            SweepMotion::Oscillating => {
                let mut travel = self.speed_per_ms * step_ms as f64;
                while travel > 0.0 {
                    let room = if self.direction > 0.0 {
                        SCALE_MAX - self.value
                    } else {
                        self.value
                    };
                    if travel < room {
                        self.value += self.direction * travel;
                        break;
                    }
                    travel -= room;
                    self.value = if self.direction > 0.0 { SCALE_MAX } else { 0.0 };
                    self.direction = -self.direction;
                }
            }
        }
    }
}
