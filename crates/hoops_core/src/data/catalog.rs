//! Static match data: roster, skill catalog and opponent pool.
//!
//! Loaded once before a match and never mutated by the engine. Lookups that
//! miss (unknown skill id, empty roster, empty opponent pool) degrade to
//! `None` or a fixed fallback instead of failing.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::rng::RandomSource;
use crate::error::Result;
use crate::models::{Opponent, Player, Skill};

/// Built-in catalog used when a host supplies none (~2KB)
pub const DEMO_CATALOG_JSON: &str = include_str!("../../data/demo_catalog.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub opponents: Vec<Opponent>,
}

impl Catalog {
    pub fn new(players: Vec<Player>, skills: Vec<Skill>, opponents: Vec<Opponent>) -> Self {
        Self { players, skills, opponents }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn demo() -> Result<Self> {
        Self::from_json_str(DEMO_CATALOG_JSON)
    }

    pub fn skill(&self, skill_id: u32) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    /// The player's owned skill. A dangling id resolves to `None`.
    pub fn skill_for(&self, player: &Player) -> Option<&Skill> {
        let skill_id = player.skill_id?;
        let skill = self.skill(skill_id);
        if skill.is_none() {
            warn!(player = %player.name, skill_id, "player references an unknown skill");
        }
        skill
    }

    /// Floored roster mean of attack values, 0 for an empty roster.
    pub fn team_attack(&self) -> u32 {
        floored_mean(self.players.iter().map(|p| p.attack_value))
    }

    /// Floored roster mean of defense values, 0 for an empty roster.
    pub fn team_defense(&self) -> u32 {
        floored_mean(self.players.iter().map(|p| p.defense_value))
    }

    /// Uniform pick from the opponent pool.
    pub fn pick_opponent(&self, rng: &mut dyn RandomSource) -> Opponent {
        match rng.index(self.opponents.len()) {
            Some(idx) => self.opponents[idx].clone(),
            None => {
                warn!("opponent pool is empty, using the fallback opponent");
                Opponent::fallback().clone()
            }
        }
    }
}

fn floored_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v as u64, count + 1));
    if count == 0 {
        0
    } else {
        (sum / count) as u32
    }
}
