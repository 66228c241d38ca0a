//! Match clock configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Countdown start, in seconds (default: 120)
    pub start_seconds: u32,
    /// Remaining time at which the match turns critical (default: 30)
    pub critical_threshold_seconds: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { start_seconds: 120, critical_threshold_seconds: 30 }
    }
}
