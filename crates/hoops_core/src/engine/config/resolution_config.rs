//! Offense/defense resolution constants

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    // === Offense ===
    /// Hit rate at the pivot attribute (default: 40)
    pub offense_base: f64,
    /// Hit rate gained per attack point above the pivot (default: 0.5)
    pub offense_slope: f64,
    /// Bonus for a successful shooting check (default: 30)
    pub timer_bonus: f64,

    // === Defense ===
    /// Defense rate at the pivot attribute (default: 30)
    pub defense_base: f64,
    /// Defense rate gained per defense point above the pivot (default: 0.5)
    pub defense_slope: f64,
    /// Bonus for a successful block check (default: 40)
    pub block_bonus: f64,

    // === Opponent ===
    /// Opponent raw hit chance at the pivot attribute (default: 40)
    pub opponent_base: f64,
    /// Opponent hit chance gained per attack point above the pivot (default: 0.3)
    pub opponent_slope: f64,
    /// Share of our defense rate subtracted from the opponent chance (default: 0.6)
    pub defense_mitigation: f64,
    /// Lowest opponent hit rate defense can force (default: 10)
    pub opponent_floor: f64,

    // === Shared ===
    /// Attribute value at which the base rates apply (default: 60)
    pub attribute_pivot: f64,
    /// Upper clamp for final rates (default: 100)
    pub rate_cap: f64,
    /// Critical-phase jitter applied to base rates (default: 0.9..1.1)
    pub critical_jitter: (f64, f64),
    /// Chance a make is a three-pointer (default: 0.3)
    pub three_point_chance: f64,
    /// Extra point from an AddScore skill (default: 1)
    pub add_score_bonus: u32,
    /// Chance a StealBall skill cancels an opponent score (default: 0.7)
    pub steal_chance: f64,
    /// Chance an unused skill is offered to a resolution (default: 0.5)
    pub skill_activation_chance: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            offense_base: 40.0,
            offense_slope: 0.5,
            timer_bonus: 30.0,
            defense_base: 30.0,
            defense_slope: 0.5,
            block_bonus: 40.0,
            opponent_base: 40.0,
            opponent_slope: 0.3,
            defense_mitigation: 0.6,
            opponent_floor: 10.0,
            attribute_pivot: 60.0,
            rate_cap: 100.0,
            critical_jitter: (0.9, 1.1),
            three_point_chance: 0.3,
            add_score_bonus: 1,
            steal_chance: 0.7,
            skill_activation_chance: 0.5,
        }
    }
}
