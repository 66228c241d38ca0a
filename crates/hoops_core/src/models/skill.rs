use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a skill does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum SkillEffect {
    IncreaseHitRate,
    IncreaseDefenseRate,
    AddScore,
    StealBall,
}

impl SkillEffect {
    /// Effects that only make sense while our team has the ball.
    pub fn is_offensive(self) -> bool {
        matches!(self, Self::IncreaseHitRate | Self::AddScore)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::IncreaseHitRate => "hit rate",
            Self::IncreaseDefenseRate => "defense rate",
            Self::AddScore => "bonus point",
            Self::StealBall => "steal",
        }
    }
}

/// Catalog skill entry. Consumption is tracked by the match, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: u32,
    pub name: String,
    pub effect_type: SkillEffect,
    pub effect_value: f64,
    /// Every made shot with this skill counts as a three-pointer.
    #[serde(default)]
    pub forces_three_pointer: bool,
}

impl Skill {
    pub fn new(id: u32, name: impl Into<String>, effect_type: SkillEffect, effect_value: f64) -> Self {
        Self { id, name: name.into(), effect_type, effect_value, forces_three_pointer: false }
    }

    pub fn three_point_specialist(mut self) -> Self {
        self.forces_three_pointer = true;
        self
    }
}
