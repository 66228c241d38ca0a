//! Score carried into the final minutes.
//!
//! The first three quarters are not played; their score is estimated from
//! team averages and the opponent's attributes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::rng::RandomSource;

/// Factor range applied to each side's estimate.
const FORM_RANGE: (f64, f64) = (0.8, 1.2);
const DEFENSE_WEIGHT: f64 = 0.7;
const QUARTERS: f64 = 3.0;
/// Lowest seed score either side can carry in.
pub const MIN_SEED_SCORE: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedScore {
    pub team_score: u32,
    pub opponent_score: u32,
    /// Difference of the raw estimates, before the minimum is applied.
    pub score_difference: i64,
}

impl SeedScore {
    pub fn as_pair(&self) -> (u32, u32) {
        (self.team_score, self.opponent_score)
    }
}

fn estimate(attack: u32, opposing_defense: u32, form: f64) -> i64 {
    ((attack as f64 - opposing_defense as f64 * DEFENSE_WEIGHT) * form * QUARTERS).floor() as i64
}

pub fn simulate_first_three_quarters(
    team_attack: u32,
    team_defense: u32,
    opponent_attack: u32,
    opponent_defense: u32,
    rng: &mut dyn RandomSource,
) -> SeedScore {
    let team_form = rng.range(FORM_RANGE.0, FORM_RANGE.1);
    let opponent_form = rng.range(FORM_RANGE.0, FORM_RANGE.1);

    let team = estimate(team_attack, opponent_defense, team_form);
    let opponent = estimate(opponent_attack, team_defense, opponent_form);

    SeedScore {
        team_score: team.max(MIN_SEED_SCORE) as u32,
        opponent_score: opponent.max(MIN_SEED_SCORE) as u32,
        score_difference: team - opponent,
    }
}
