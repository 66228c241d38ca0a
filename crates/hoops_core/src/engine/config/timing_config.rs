//! Skill check (timing window) configuration

use serde::{Deserialize, Serialize};

use crate::engine::timing_window::Zone;

/// Which sweep the defense check uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseCheckKind {
    /// Oscillating shot-block sweep
    Block,
    /// Linear sweep with the wider defense zone
    Sweep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Check duration while playing, ms (default: 5000)
    pub playing_duration_ms: u64,
    /// Check duration in the critical phase, ms (default: 3000)
    pub critical_duration_ms: u64,
    /// Acknowledgment shown after a check resolves, ms (default: 1000)
    pub acknowledge_ms: u64,
    /// Outcome display before play resumes, ms (default: 2000)
    pub result_display_ms: u64,
    /// Oscillating sweep speed, percent per ms (default: 0.05)
    pub oscillation_speed: f64,
    /// Oscillating sweep starting position (default: 50)
    pub oscillation_start: f64,
    /// Linear shooting zone (default: 30..=70)
    pub shooting_zone: Zone,
    /// Linear defense zone (default: 25..=75)
    pub defense_zone: Zone,
    /// Oscillating block zones (default: 0..=20, 80..=100)
    pub block_zones: Vec<Zone>,
    pub defense_check: DefenseCheckKind,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            playing_duration_ms: 5000,
            critical_duration_ms: 3000,
            acknowledge_ms: 1000,
            result_display_ms: 2000,
            oscillation_speed: 0.05,
            oscillation_start: 50.0,
            shooting_zone: Zone::new(30.0, 70.0),
            defense_zone: Zone::new(25.0, 75.0),
            block_zones: vec![Zone::new(0.0, 20.0), Zone::new(80.0, 100.0)],
            defense_check: DefenseCheckKind::Block,
        }
    }
}
