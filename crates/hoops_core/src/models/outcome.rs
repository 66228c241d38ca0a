use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::state::PossessionAction;

/// Rate breakdown shown next to a resolved action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum OutcomeStats {
    Offense {
        player: String,
        base_hit_rate: f64,
        skill_bonus: f64,
        timer_bonus: f64,
        final_hit_rate: f64,
        shot: String,
    },
    Defense {
        player: String,
        base_defense_rate: f64,
        skill_bonus: f64,
        block_bonus: f64,
        final_defense_rate: f64,
        opponent_hit_rate: f64,
        result: String,
    },
}

/// Result of one resolved possession, applied to the match atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionOutcome {
    pub action: PossessionAction,
    /// Team score delta.
    pub points: u32,
    /// Opponent score delta.
    pub opponent_points: u32,
    pub description: String,
    pub stats: Option<OutcomeStats>,
    pub used_skill_id: Option<u32>,
}

impl ActionOutcome {
    /// Degraded outcome for a resolution that had nothing to act with.
    pub fn empty(action: PossessionAction, description: impl Into<String>) -> Self {
        Self {
            action,
            points: 0,
            opponent_points: 0,
            description: description.into(),
            stats: None,
            used_skill_id: None,
        }
    }

    pub fn is_scoring(&self) -> bool {
        self.points > 0 || self.opponent_points > 0
    }
}
