//! Read-only view of a match for rendering and the JSON bridge.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::state::{LogEntry, MatchPhase, PossessionAction};
use super::timing_window::CheckView;
use crate::models::{ActionOutcome, Opponent, Player, Skill};

/// Nested state while the match is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Waiting for the user; rotation runs.
    Idle,
    /// Timing window open or acknowledging.
    SkillCheck,
    /// Outcome on screen before possession flips.
    ResultDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchResultKind {
    Win,
    Draw,
    Loss,
}

impl MatchResultKind {
    pub fn from_scores(team: u32, opponent: u32) -> Self {
        match team.cmp(&opponent) {
            std::cmp::Ordering::Greater => Self::Win,
            std::cmp::Ordering::Equal => Self::Draw,
            std::cmp::Ordering::Less => Self::Loss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Win => "Victory",
            Self::Draw => "Draw",
            Self::Loss => "Defeat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSnapshot {
    pub match_id: String,
    /// Bumped on every state change.
    pub revision: u64,
    pub phase: MatchPhase,
    pub clock_seconds: u32,
    pub team_score: u32,
    pub opponent_score: u32,
    pub current_action: PossessionAction,
    pub current_player: Player,
    /// The current player's skill, only while still unused.
    pub current_skill: Option<Skill>,
    pub opponent: Opponent,
    pub rotation_seconds_remaining: u32,
    pub wait_too_long: bool,
    pub interaction: Interaction,
    pub check: Option<CheckView>,
    pub pending_outcome: Option<ActionOutcome>,
    pub used_skills: Vec<u32>,
    pub log: Vec<LogEntry>,
    /// Set once the match has ended.
    pub result: Option<MatchResultKind>,
}

impl MatchSnapshot {
    pub fn score_difference(&self) -> i64 {
        self.team_score as i64 - self.opponent_score as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_scores() {
        assert_eq!(MatchResultKind::from_scores(80, 79), MatchResultKind::Win);
        assert_eq!(MatchResultKind::from_scores(80, 80), MatchResultKind::Draw);
        assert_eq!(MatchResultKind::from_scores(70, 80), MatchResultKind::Loss);
    }

    #[test]
    fn test_interaction_wire_names() {
        assert_eq!(serde_json::to_string(&Interaction::ResultDisplay).unwrap(), "\"result_display\"");
    }
}
