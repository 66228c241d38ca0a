//! Rotation scheduler and the rules behind it.
//!
//! While the match is live and no skill check is open, two effects run:
//! a 1 s urgency countdown (with a one-time wait-too-long warning) and a
//! rotation tick that either flips possession or passes to another player.
//! Suspending the scheduler resets every timer; resuming starts fresh.

use tracing::debug;

use super::config::RotationConfig;
use super::rng::RandomSource;
use super::scheduler::{OneShotTask, PeriodicTask};
use super::state::{MatchPhase, PossessionAction};
use crate::models::Player;

const COUNTDOWN_PERIOD_MS: u64 = 1000;

// ============================================
// Scheduler
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationEvent {
    /// Urgency countdown moved; carries the new display value.
    Countdown(u32),
    /// The user has let the possession sit too long.
    WaitTooLong,
    /// Time to draw a possession switch or a pass.
    RotationTick,
}

#[derive(Debug, Clone)]
pub struct RotationScheduler {
    countdown: PeriodicTask,
    rotation: PeriodicTask,
    wait_warning: OneShotTask,
    seconds_remaining: u32,
    countdown_reset: u32,
    playing_period_ms: u64,
    critical_period_ms: u64,
    suspended: bool,
}

impl RotationScheduler {
    /// Built suspended; the controller resumes it when play starts.
    pub fn new(config: &RotationConfig) -> Self {
        Self {
            countdown: PeriodicTask::paused(COUNTDOWN_PERIOD_MS),
            rotation: PeriodicTask::paused(config.playing_period_ms),
            wait_warning: OneShotTask::disarmed(config.wait_too_long_after_ms),
            seconds_remaining: config.countdown_seconds,
            countdown_reset: config.countdown_seconds,
            playing_period_ms: config.playing_period_ms,
            critical_period_ms: config.critical_period_ms,
            suspended: true,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn rotation_period_ms(&self) -> u64 {
        self.rotation.period_ms()
    }

    fn period_for(&self, phase: MatchPhase) -> u64 {
        if phase == MatchPhase::Critical {
            self.critical_period_ms
        } else {
            self.playing_period_ms
        }
    }

    /// Stops every timer and discards their progress.
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.countdown.pause();
        self.rotation.pause();
        self.wait_warning.disarm();
    }

    /// Starts fresh timers for `phase`. Also used after any possession change.
    pub fn resume(&mut self, phase: MatchPhase) {
        self.suspended = false;
        self.seconds_remaining = self.countdown_reset;
        self.countdown.resume();
        self.rotation.set_period(self.period_for(phase));
        self.rotation.resume();
        // The warning only runs in regular play.
        if phase == MatchPhase::Playing {
            self.wait_warning.arm();
        } else {
            self.wait_warning.disarm();
        }
    }

    /// Restarts the timers if running; a suspended scheduler stays suspended.
    pub fn reset(&mut self, phase: MatchPhase) {
        if !self.suspended {
            self.resume(phase);
        }
    }

    /// A rotation event happened: the display countdown goes back to nominal.
    pub fn note_rotation(&mut self) {
        self.seconds_remaining = self.countdown_reset;
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        [self.countdown.remaining_ms(), self.rotation.remaining_ms(), self.wait_warning.remaining_ms()]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn advance(&mut self, dt_ms: u64) -> Vec<RotationEvent> {
        let mut events = Vec::new();
        if self.suspended {
            return events;
        }

        for _ in 0..self.countdown.advance(dt_ms) {
            self.seconds_remaining = if self.seconds_remaining <= 1 {
                self.countdown_reset
            } else {
                self.seconds_remaining - 1
            };
            events.push(RotationEvent::Countdown(self.seconds_remaining));
        }

        if self.wait_warning.advance(dt_ms) {
            events.push(RotationEvent::WaitTooLong);
        }

        for _ in 0..self.rotation.advance(dt_ms) {
            events.push(RotationEvent::RotationTick);
        }

        events
    }
}

// ============================================
// Rules
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDecision {
    SwitchPossession,
    Pass,
}

/// Bernoulli draw for a rotation tick.
pub fn decide_rotation(
    phase: MatchPhase,
    config: &RotationConfig,
    rng: &mut dyn RandomSource,
) -> RotationDecision {
    let p = if phase == MatchPhase::Critical {
        config.critical_switch_chance
    } else {
        config.playing_switch_chance
    };
    if rng.chance(p) {
        RotationDecision::SwitchPossession
    } else {
        RotationDecision::Pass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitDecision {
    Turnover,
    Waiting { raise_warning: bool },
}

/// Risk rule for an explicit "wait for a better player".
pub fn decide_wait(
    phase: MatchPhase,
    config: &RotationConfig,
    rng: &mut dyn RandomSource,
) -> WaitDecision {
    let risk = if phase == MatchPhase::Critical {
        config.critical_wait_risk
    } else {
        config.playing_wait_risk
    };
    if rng.chance(risk) {
        return WaitDecision::Turnover;
    }
    WaitDecision::Waiting { raise_warning: rng.chance(config.wait_too_long_chance) }
}

pub fn is_suitable(player: &Player, action: PossessionAction, threshold: u32) -> bool {
    match action {
        PossessionAction::Offense => player.attack_value >= threshold,
        PossessionAction::Defense => player.defense_value >= threshold,
    }
}

/// Picks the acting player: uniform over suitable players, else uniform over
/// the roster, else the fallback player.
pub fn select_player(
    roster: &[Player],
    action: PossessionAction,
    threshold: u32,
    rng: &mut dyn RandomSource,
) -> Player {
    let suitable: Vec<&Player> =
        roster.iter().filter(|p| is_suitable(p, action, threshold)).collect();

    if let Some(idx) = rng.index(suitable.len()) {
        let player = suitable[idx];
        debug!(player = %player.name, action = action.label(), "selected suitable player");
        return player.clone();
    }

    match rng.index(roster.len()) {
        Some(idx) => {
            debug!(player = %roster[idx].name, action = action.label(), "no suitable player, random pick");
            roster[idx].clone()
        }
        None => Player::fallback().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRandom;

    fn roster() -> Vec<Player> {
        vec![
            Player::new(1, "Lin", 90, 50),
            Player::new(2, "Chen", 60, 85),
            Player::new(3, "Wu", 70, 70),
            Player::new(4, "Huang", 78, 77),
        ]
    }

    fn running(phase: MatchPhase) -> RotationScheduler {
        let mut s = RotationScheduler::new(&RotationConfig::default());
        s.resume(phase);
        s
    }

    #[test]
    fn test_rotation_period_by_phase() {
        assert_eq!(running(MatchPhase::Playing).rotation_period_ms(), 8000);
        assert_eq!(running(MatchPhase::Critical).rotation_period_ms(), 4000);
    }

    #[test]
    fn test_countdown_wraps_to_nominal() {
        let mut s = running(MatchPhase::Playing);
        let events = s.advance(7000);
        assert_eq!(s.seconds_remaining(), 1);
        assert_eq!(events.iter().filter(|e| matches!(e, RotationEvent::Countdown(_))).count(), 7);
        let events = s.advance(1000);
        assert!(events.contains(&RotationEvent::Countdown(8)));
        assert!(events.contains(&RotationEvent::RotationTick));
    }

    #[test]
    fn test_wait_warning_only_in_playing() {
        let mut s = running(MatchPhase::Playing);
        let events = s.advance(15_000);
        assert_eq!(events.iter().filter(|e| **e == RotationEvent::WaitTooLong).count(), 1);
        assert!(!s.advance(15_000).contains(&RotationEvent::WaitTooLong));

        let mut s = running(MatchPhase::Critical);
        assert!(!s.advance(30_000).contains(&RotationEvent::WaitTooLong));
    }

    #[test]
    fn test_suspend_resets_timers() {
        let mut s = running(MatchPhase::Playing);
        s.advance(7500);
        s.suspend();
        assert!(s.advance(60_000).is_empty());
        assert_eq!(s.remaining_ms(), None);
        s.resume(MatchPhase::Playing);
        assert_eq!(s.seconds_remaining(), 8);
        assert!(!s.advance(7999).contains(&RotationEvent::RotationTick));
        assert!(s.advance(1).contains(&RotationEvent::RotationTick));
    }

    #[test]
    fn test_reset_keeps_suspension() {
        let mut s = RotationScheduler::new(&RotationConfig::default());
        s.reset(MatchPhase::Playing);
        assert!(s.is_suspended());
    }

    #[test]
    fn test_decide_rotation_probabilities() {
        let cfg = RotationConfig::default();
        let mut rng = ScriptedRandom::new([0.35, 0.35]);
        assert_eq!(decide_rotation(MatchPhase::Playing, &cfg, &mut rng), RotationDecision::Pass);
        assert_eq!(
            decide_rotation(MatchPhase::Critical, &cfg, &mut rng),
            RotationDecision::SwitchPossession
        );
    }

    #[test]
    fn test_decide_wait() {
        let cfg = RotationConfig::default();
        let mut rng = ScriptedRandom::new([0.1, 0.3, 0.1, 0.9, 0.5, 0.25]);
        assert_eq!(decide_wait(MatchPhase::Playing, &cfg, &mut rng), WaitDecision::Turnover);
        assert_eq!(
            decide_wait(MatchPhase::Playing, &cfg, &mut rng),
            WaitDecision::Waiting { raise_warning: true }
        );
        assert_eq!(
            decide_wait(MatchPhase::Playing, &cfg, &mut rng),
            WaitDecision::Waiting { raise_warning: false }
        );
        // 0.25 is safe while playing but a turnover in the critical phase
        assert_eq!(decide_wait(MatchPhase::Critical, &cfg, &mut rng), WaitDecision::Turnover);
    }

    #[test]
    fn test_select_player_prefers_suitable() {
        let roster = roster();
        let mut rng = ScriptedRandom::new([0.0, 0.99]);
        assert_eq!(select_player(&roster, PossessionAction::Offense, 75, &mut rng).id, 1);
        assert_eq!(select_player(&roster, PossessionAction::Offense, 75, &mut rng).id, 4);
        let mut rng = ScriptedRandom::new([0.0]);
        assert_eq!(select_player(&roster, PossessionAction::Defense, 75, &mut rng).id, 2);
    }

    #[test]
    fn test_select_player_falls_back_to_whole_roster() {
        let roster = vec![Player::new(5, "Zhao", 60, 60), Player::new(6, "Sun", 65, 65)];
        let mut rng = ScriptedRandom::new([0.7]);
        assert_eq!(select_player(&roster, PossessionAction::Offense, 75, &mut rng).id, 6);
    }

    #[test]
    fn test_select_player_empty_roster_degrades() {
        let mut rng = ScriptedRandom::new([]);
        let player = select_player(&[], PossessionAction::Defense, 75, &mut rng);
        assert!(player.is_fallback());
        assert_eq!(rng.draws(), 0);
    }
}
