//! # Engine Configuration
//!
//! All tuning constants of the match engine in one place. The defaults are
//! the shipped rules; loaders exist so hosts can keep them in a data file.
//!
//! ```rust
//! use hoops_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.clock.start_seconds, 120);
//! ```

mod clock_config;
mod resolution_config;
mod rotation_config;
mod timing_config;

pub use clock_config::ClockConfig;
pub use resolution_config::ResolutionConfig;
pub use rotation_config::RotationConfig;
pub use timing_config::{DefenseCheckKind, TimingConfig};

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(MatchError::InvalidConfig(format!("{name} must be within [0, 1], got {p}")))
    }
}

fn check_positive(name: &str, value: u64) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(MatchError::InvalidConfig(format!("{name} must be positive")))
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let clock = &self.clock;
        check_positive("clock.start_seconds", clock.start_seconds as u64)?;
        if clock.critical_threshold_seconds >= clock.start_seconds {
            return Err(MatchError::InvalidConfig(
                "clock.critical_threshold_seconds must be below clock.start_seconds".into(),
            ));
        }

        let rotation = &self.rotation;
        check_positive("rotation.countdown_seconds", rotation.countdown_seconds as u64)?;
        check_positive("rotation.playing_period_ms", rotation.playing_period_ms)?;
        check_positive("rotation.critical_period_ms", rotation.critical_period_ms)?;
        check_positive("rotation.wait_too_long_after_ms", rotation.wait_too_long_after_ms)?;
        check_probability("rotation.playing_switch_chance", rotation.playing_switch_chance)?;
        check_probability("rotation.critical_switch_chance", rotation.critical_switch_chance)?;
        check_probability("rotation.playing_wait_risk", rotation.playing_wait_risk)?;
        check_probability("rotation.critical_wait_risk", rotation.critical_wait_risk)?;
        check_probability("rotation.wait_too_long_chance", rotation.wait_too_long_chance)?;

        let timing = &self.timing;
        check_positive("timing.playing_duration_ms", timing.playing_duration_ms)?;
        check_positive("timing.critical_duration_ms", timing.critical_duration_ms)?;
        if timing.oscillation_speed <= 0.0 {
            return Err(MatchError::InvalidConfig("timing.oscillation_speed must be positive".into()));
        }
        if timing.block_zones.is_empty() {
            return Err(MatchError::InvalidConfig("timing.block_zones must not be empty".into()));
        }
        let zones = [&timing.shooting_zone, &timing.defense_zone]
            .into_iter()
            .chain(timing.block_zones.iter());
        for zone in zones {
            if !zone.is_valid() {
                return Err(MatchError::InvalidConfig(format!(
                    "zone {}..={} must lie within 0..=100 with start <= end",
                    zone.start, zone.end
                )));
            }
        }

        let resolution = &self.resolution;
        let (lo, hi) = resolution.critical_jitter;
        if lo <= 0.0 || hi < lo {
            return Err(MatchError::InvalidConfig(
                "resolution.critical_jitter must be a positive, ordered range".into(),
            ));
        }
        check_probability("resolution.three_point_chance", resolution.three_point_chance)?;
        check_probability("resolution.steal_chance", resolution.steal_chance)?;
        check_probability("resolution.skill_activation_chance", resolution.skill_activation_chance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.clock.critical_threshold_seconds, 30);
        assert_eq!(cfg.rotation.playing_period_ms, 8000);
        assert_eq!(cfg.rotation.critical_period_ms, 4000);
        assert_eq!(cfg.timing.critical_duration_ms, 3000);
        assert!((cfg.resolution.steal_chance - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"clock":{"start_seconds":60,"critical_threshold_seconds":10}}"#)
            .unwrap();
        assert_eq!(cfg.clock.start_seconds, 60);
        assert_eq!(cfg.rotation.countdown_seconds, 8);
    }

    #[test]
    fn test_partial_section_fills_missing_fields() {
        let cfg = EngineConfig::from_json_str(
            r#"{"rotation":{"playing_period_ms":6000},"timing":{"critical_duration_ms":2500}}"#,
        )
        .unwrap();
        assert_eq!(cfg.rotation.playing_period_ms, 6000);
        assert_eq!(cfg.rotation.critical_period_ms, 4000);
        assert_eq!(cfg.rotation.suitability_threshold, 75);
        assert_eq!(cfg.timing.critical_duration_ms, 2500);
        assert_eq!(cfg.timing.playing_duration_ms, 5000);
        assert!(cfg.validate().is_ok());

        let cfg = EngineConfig::from_yaml_str("clock:\n  start_seconds: 90\n").unwrap();
        assert_eq!(cfg.clock.start_seconds, 90);
        assert_eq!(cfg.clock.critical_threshold_seconds, 30);
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "timing:\n  playing_duration_ms: 4000\n  critical_duration_ms: 2000\n  acknowledge_ms: 1000\n  result_display_ms: 2000\n  oscillation_speed: 0.05\n  oscillation_start: 50.0\n  shooting_zone: { start: 30.0, end: 70.0 }\n  defense_zone: { start: 25.0, end: 75.0 }\n  block_zones:\n    - { start: 0.0, end: 20.0 }\n    - { start: 80.0, end: 100.0 }\n  defense_check: sweep\n";
        let cfg = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.timing.playing_duration_ms, 4000);
        assert_eq!(cfg.timing.defense_check, DefenseCheckKind::Sweep);
    }

    #[test]
    fn test_rejects_threshold_above_start() {
        let mut cfg = EngineConfig::default();
        cfg.clock.critical_threshold_seconds = 120;
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut cfg = EngineConfig::default();
        cfg.rotation.critical_switch_chance = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_period() {
        let mut cfg = EngineConfig::default();
        cfg.rotation.critical_period_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.timing.block_zones.len(), 2);
    }
}
