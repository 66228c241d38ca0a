use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Roster entry. Immutable for the duration of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub attack_value: u32,
    pub defense_value: u32,
    /// At most one owned skill.
    #[serde(default)]
    pub skill_id: Option<u32>,
}

/// Stand-in used when the roster is empty so a match never stalls.
static FALLBACK_PLAYER: Lazy<Player> = Lazy::new(|| Player {
    id: 0,
    name: "Bench Player".to_string(),
    attack_value: 60,
    defense_value: 60,
    skill_id: None,
});

impl Player {
    pub fn new(id: u32, name: impl Into<String>, attack_value: u32, defense_value: u32) -> Self {
        Self { id, name: name.into(), attack_value, defense_value, skill_id: None }
    }

    pub fn with_skill(mut self, skill_id: u32) -> Self {
        self.skill_id = Some(skill_id);
        self
    }

    pub fn fallback() -> &'static Player {
        &FALLBACK_PLAYER
    }

    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_PLAYER.id && self.name == FALLBACK_PLAYER.name
    }
}
