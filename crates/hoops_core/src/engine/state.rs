//! Match state: the single object every engine component mutates through
//! the controller.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ActionOutcome, Opponent, Player};

// ============================================
// Phase / possession
// ============================================

/// Match phase. Ordering follows the match flow and never decreases
/// except through an explicit restart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Ready,
    Playing,
    Critical,
    Ended,
}

impl MatchPhase {
    /// Whether the clock and rotation run in this phase.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Playing | Self::Critical)
    }

    pub fn can_advance_to(self, next: MatchPhase) -> bool {
        next > self
    }
}

/// Which side currently acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PossessionAction {
    Offense,
    Defense,
}

impl PossessionAction {
    pub fn toggled(self) -> Self {
        match self {
            Self::Offense => Self::Defense,
            Self::Defense => Self::Offense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
        }
    }
}

// ============================================
// Log / used skills
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogEntry {
    /// Match clock reading when the entry was written.
    pub clock_seconds: u32,
    pub message: String,
}

/// Skills consumed this match. Insert-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UsedSkills(BTreeSet<u32>);

impl UsedSkills {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the id was already consumed.
    pub fn insert(&mut self, skill_id: u32) -> bool {
        self.0.insert(skill_id)
    }

    pub fn contains(&self, skill_id: u32) -> bool {
        self.0.contains(&skill_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

// ============================================
// MatchState
// ============================================

#[derive(Debug, Clone)]
pub struct MatchState {
    pub match_id: Uuid,
    pub phase: MatchPhase,
    pub clock_seconds: u32,
    pub team_score: u32,
    pub opponent_score: u32,
    pub current_action: PossessionAction,
    pub current_player: Player,
    pub opponent: Opponent,
    pub rotation_seconds_remaining: u32,
    pub wait_too_long: bool,
    pub used_skills: UsedSkills,
    log: Vec<LogEntry>,
}

impl MatchState {
    pub fn new(
        clock_seconds: u32,
        rotation_seconds: u32,
        opponent: Opponent,
        current_action: PossessionAction,
        current_player: Player,
        seed_score: (u32, u32),
    ) -> Self {
        Self {
            match_id: Uuid::new_v4(),
            phase: MatchPhase::Ready,
            clock_seconds,
            team_score: seed_score.0,
            opponent_score: seed_score.1,
            current_action,
            current_player,
            opponent,
            rotation_seconds_remaining: rotation_seconds,
            wait_too_long: false,
            used_skills: UsedSkills::new(),
            log: Vec::new(),
        }
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry { clock_seconds: self.clock_seconds, message: message.into() });
    }

    /// Moves the phase forward. Backward or same-phase moves are ignored.
    pub fn advance_phase(&mut self, next: MatchPhase) -> bool {
        if !self.phase.can_advance_to(next) {
            return false;
        }
        self.phase = next;
        true
    }

    /// Applies a resolved outcome: score, one log line and skill consumption together.
    pub fn apply_outcome(&mut self, outcome: &ActionOutcome) {
        self.team_score += outcome.points;
        self.opponent_score += outcome.opponent_points;
        if let Some(skill_id) = outcome.used_skill_id {
            self.used_skills.insert(skill_id);
        }
        self.push_log(outcome.description.clone());
    }
}
