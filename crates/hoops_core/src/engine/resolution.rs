//! Offense / defense resolution.
//!
//! Pure functions: attributes, an optional offered skill and the skill-check
//! result go in, an [`ActionOutcome`] comes out. Every random draw goes
//! through the supplied [`RandomSource`], in a fixed order:
//!
//! - offense: critical jitter (critical only), roll, three-pointer draw (on a make)
//! - defense: critical jitter (critical only), roll, three-pointer draw and
//!   steal draw (on an opponent score, steal only with a steal skill)
//!
//! A skill passed in is assumed unused; the caller filters consumed skills.
//! Skills whose effect does not fit the side are ignored, never consumed.

use tracing::warn;

use super::config::ResolutionConfig;
use super::rng::RandomSource;
use super::state::PossessionAction;
use crate::models::{ActionOutcome, Opponent, OutcomeStats, Player, Skill, SkillEffect};

const TWO_POINTS: u32 = 2;
const THREE_POINTS: u32 = 3;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn attribute_rate(base: f64, slope: f64, value: u32, pivot: f64) -> f64 {
    base + (value as f64 - pivot) * slope
}

fn jittered(rate: f64, critical: bool, config: &ResolutionConfig, rng: &mut dyn RandomSource) -> f64 {
    if critical {
        let (lo, hi) = config.critical_jitter;
        rate * rng.range(lo, hi)
    } else {
        rate
    }
}

fn shot_points(config: &ResolutionConfig, forced_three: bool, rng: &mut dyn RandomSource) -> u32 {
    // Always draw so the sequence does not depend on the skill.
    let drawn_three = rng.chance(config.three_point_chance);
    if drawn_three || forced_three {
        THREE_POINTS
    } else {
        TWO_POINTS
    }
}

fn shot_label(points: u32) -> &'static str {
    if points >= THREE_POINTS {
        "three-pointer"
    } else {
        "two-pointer"
    }
}

// ============================================
// Offense
// ============================================

pub fn resolve_offense(
    player: Option<&Player>,
    skill: Option<&Skill>,
    timer_success: bool,
    critical: bool,
    config: &ResolutionConfig,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let Some(player) = player else {
        warn!("offense resolved without an acting player");
        return ActionOutcome::empty(PossessionAction::Offense, "Invalid player: no shot taken");
    };

    let skill = skill.filter(|s| s.effect_type.is_offensive());
    let mut used_skill_id = None;

    let base_hit_rate = jittered(
        attribute_rate(config.offense_base, config.offense_slope, player.attack_value, config.attribute_pivot),
        critical,
        config,
        rng,
    );

    let skill_bonus = match skill {
        Some(s) if s.effect_type == SkillEffect::IncreaseHitRate => {
            used_skill_id = Some(s.id);
            s.effect_value
        }
        _ => 0.0,
    };
    let timer_bonus = if timer_success { config.timer_bonus } else { 0.0 };
    let final_hit_rate = (base_hit_rate + skill_bonus + timer_bonus).min(config.rate_cap);

    let roll = rng.unit() * 100.0;
    let hit = roll <= final_hit_rate;

    let (points, shot, description) = if hit {
        let forced = skill.is_some_and(|s| s.forces_three_pointer);
        let mut points = shot_points(config, forced, rng);
        let shot = shot_label(points);
        let mut description = format!("{} makes a {} for {} points", player.name, shot, points);
        if let Some(s) = skill.filter(|s| s.effect_type == SkillEffect::AddScore) {
            points += config.add_score_bonus;
            used_skill_id = Some(s.id);
            description.push_str(&format!(" (+{} from {})", config.add_score_bonus, s.name));
        }
        (points, shot, description)
    } else {
        (0, "miss", format!("{} misses the shot", player.name))
    };

    ActionOutcome {
        action: PossessionAction::Offense,
        points,
        opponent_points: 0,
        description,
        stats: Some(OutcomeStats::Offense {
            player: player.name.clone(),
            base_hit_rate: round1(base_hit_rate),
            skill_bonus: round1(skill_bonus),
            timer_bonus: round1(timer_bonus),
            final_hit_rate: round1(final_hit_rate),
            shot: shot.to_string(),
        }),
        used_skill_id,
    }
}

// ============================================
// Defense
// ============================================

pub fn resolve_defense(
    player: Option<&Player>,
    skill: Option<&Skill>,
    block_success: bool,
    opponent: Option<&Opponent>,
    critical: bool,
    config: &ResolutionConfig,
    rng: &mut dyn RandomSource,
) -> ActionOutcome {
    let (Some(player), Some(opponent)) = (player, opponent) else {
        warn!(
            has_player = player.is_some(),
            has_opponent = opponent.is_some(),
            "defense resolved without both sides"
        );
        return ActionOutcome::empty(PossessionAction::Defense, "Invalid matchup: possession skipped");
    };

    let skill = skill.filter(|s| !s.effect_type.is_offensive());
    let mut used_skill_id = None;

    let base_defense_rate = jittered(
        attribute_rate(config.defense_base, config.defense_slope, player.defense_value, config.attribute_pivot),
        critical,
        config,
        rng,
    );

    let skill_bonus = match skill {
        Some(s) if s.effect_type == SkillEffect::IncreaseDefenseRate => {
            used_skill_id = Some(s.id);
            s.effect_value
        }
        _ => 0.0,
    };
    let block_bonus = if block_success { config.block_bonus } else { 0.0 };
    let final_defense_rate = (base_defense_rate + skill_bonus + block_bonus).min(config.rate_cap);

    let opponent_raw = attribute_rate(
        config.opponent_base,
        config.opponent_slope,
        opponent.attack_value,
        config.attribute_pivot,
    );
    let opponent_hit_rate =
        (opponent_raw - final_defense_rate * config.defense_mitigation).max(config.opponent_floor);

    let roll = rng.unit() * 100.0;
    let scored = roll <= opponent_hit_rate;

    let (opponent_points, result, description) = if scored {
        let points = shot_points(config, false, rng);
        let stolen = match skill.filter(|s| s.effect_type == SkillEffect::StealBall) {
            Some(s) if rng.chance(config.steal_chance) => {
                used_skill_id = Some(s.id);
                true
            }
            _ => false,
        };
        if stolen {
            (0, "steal", format!("{} steals the ball and wipes out {}'s basket", player.name, opponent.name))
        } else if block_success {
            (
                points,
                "scored",
                format!("{} gets a hand on it, but {} still scores {}", player.name, opponent.name, points),
            )
        } else {
            (points, "scored", format!("{} scores a {} for {} points", opponent.name, shot_label(points), points))
        }
    } else if block_success {
        (0, "blocked", format!("Perfect block by {}!", player.name))
    } else {
        (0, "stopped", format!("{} forces a miss from {}", player.name, opponent.name))
    };

    ActionOutcome {
        action: PossessionAction::Defense,
        points: 0,
        opponent_points,
        description,
        stats: Some(OutcomeStats::Defense {
            player: player.name.clone(),
            base_defense_rate: round1(base_defense_rate),
            skill_bonus: round1(skill_bonus),
            block_bonus: round1(block_bonus),
            final_defense_rate: round1(final_defense_rate),
            opponent_hit_rate: round1(opponent_hit_rate),
            result: result.to_string(),
        }),
        used_skill_id,
    }
}
