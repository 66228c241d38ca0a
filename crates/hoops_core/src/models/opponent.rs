use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opposing team, chosen once per match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Opponent {
    pub id: u32,
    pub name: String,
    pub attack_value: u32,
    pub defense_value: u32,
}

static FALLBACK_OPPONENT: Lazy<Opponent> = Lazy::new(|| Opponent {
    id: 0,
    name: "Exhibition Squad".to_string(),
    attack_value: 70,
    defense_value: 70,
});

impl Opponent {
    pub fn new(id: u32, name: impl Into<String>, attack_value: u32, defense_value: u32) -> Self {
        Self { id, name: name.into(), attack_value, defense_value }
    }

    pub fn fallback() -> &'static Opponent {
        &FALLBACK_OPPONENT
    }
}
