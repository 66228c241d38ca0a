//! Player rotation configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    // === Display countdown ===
    /// Value the urgency countdown resets to (default: 8)
    pub countdown_seconds: u32,

    // === Rotation tick ===
    /// Rotation period while playing, ms (default: 8000)
    pub playing_period_ms: u64,
    /// Rotation period in the critical phase, ms (default: 4000)
    pub critical_period_ms: u64,
    /// Possession switch probability per tick while playing (default: 0.3)
    pub playing_switch_chance: f64,
    /// Possession switch probability per tick in the critical phase (default: 0.4)
    pub critical_switch_chance: f64,

    // === Waiting ===
    /// Turnover risk of an explicit wait while playing (default: 0.2)
    pub playing_wait_risk: f64,
    /// Turnover risk of an explicit wait in the critical phase (default: 0.4)
    pub critical_wait_risk: f64,
    /// Chance that a safe wait raises the wait-too-long flag (default: 0.3)
    pub wait_too_long_chance: f64,
    /// Idle time before the wait-too-long warning, ms (default: 15000)
    pub wait_too_long_after_ms: u64,

    // === Player selection ===
    /// Minimum attack (offense) or defense (defense) value to count as suitable (default: 75)
    pub suitability_threshold: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 8,
            playing_period_ms: 8000,
            critical_period_ms: 4000,
            playing_switch_chance: 0.3,
            critical_switch_chance: 0.4,
            playing_wait_risk: 0.2,
            critical_wait_risk: 0.4,
            wait_too_long_chance: 0.3,
            wait_too_long_after_ms: 15_000,
            suitability_threshold: 75,
        }
    }
}
