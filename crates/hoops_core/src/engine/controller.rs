//! Match controller: the only writer of [`MatchState`].
//!
//! Accepts the user commands (`start`, `trigger_action`, `stop_check`,
//! `wait`, `restart`) and is driven by [`MatchController::advance`], which
//! hands elapsed time to the clock, the open skill check and the rotation
//! scheduler.
//!
//! ## Ordering
//!
//! A large time step is cut at every scheduled deadline, so events fire in
//! time order. Events due at the same instant apply in this priority:
//!
//! 1. match clock (critical transition, end of match)
//! 2. skill check / result display
//! 3. rotation (only while idle for the whole slice)

use std::time::Duration;

use tracing::{debug, info};

use super::clock::MatchClock;
use super::config::EngineConfig;
use super::resolution::{resolve_defense, resolve_offense};
use super::rng::{RandomSource, SeededRandom};
use super::rotation::{
    decide_rotation, decide_wait, select_player, RotationDecision, RotationEvent, RotationScheduler,
    WaitDecision,
};
use super::scheduler::OneShotTask;
use super::snapshot::{Interaction, MatchResultKind, MatchSnapshot};
use super::state::{LogEntry, MatchPhase, MatchState, PossessionAction};
use super::timing_window::{CheckResult, TimingWindow};
use crate::data::{simulate_first_three_quarters, Catalog};
use crate::error::{MatchError, Result};
use crate::models::{ActionOutcome, Player, Skill};

/// Chance the opening possession is ours.
const OPENING_OFFENSE_CHANCE: f64 = 0.5;

pub struct MatchController {
    config: EngineConfig,
    catalog: Catalog,
    rng: Box<dyn RandomSource + Send>,
    state: MatchState,
    clock: MatchClock,
    rotation: RotationScheduler,
    check: Option<TimingWindow>,
    interaction: Interaction,
    result_display: OneShotTask,
    pending_outcome: Option<ActionOutcome>,
    revision: u64,
}

impl std::fmt::Debug for MatchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchController")
            .field("match_id", &self.state.match_id)
            .field("phase", &self.state.phase)
            .field("clock_seconds", &self.state.clock_seconds)
            .field("interaction", &self.interaction)
            .field("revision", &self.revision)
            .finish()
    }
}

impl MatchController {
    /// Builds a match in the Ready phase: opponent, seed score, opening
    /// possession and acting player are drawn from `rng` in that order.
    pub fn new<R>(catalog: Catalog, config: EngineConfig, rng: R) -> Result<Self>
    where
        R: RandomSource + Send + 'static,
    {
        config.validate()?;
        let mut rng: Box<dyn RandomSource + Send> = Box::new(rng);
        let state = fresh_state(&catalog, &config, rng.as_mut());
        info!(
            match_id = %state.match_id,
            opponent = %state.opponent.name,
            team_score = state.team_score,
            opponent_score = state.opponent_score,
            "match created"
        );
        Ok(Self {
            clock: MatchClock::new(&config.clock),
            rotation: RotationScheduler::new(&config.rotation),
            result_display: OneShotTask::disarmed(config.timing.result_display_ms),
            config,
            catalog,
            rng,
            state,
            check: None,
            interaction: Interaction::Idle,
            pending_outcome: None,
            revision: 0,
        })
    }

    /// Reproducible match from a seed.
    pub fn with_seed(catalog: Catalog, config: EngineConfig, seed: u64) -> Result<Self> {
        Self::new(catalog, config, SeededRandom::new(seed))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_outcome(&self) -> Option<&ActionOutcome> {
        self.pending_outcome.as_ref()
    }

    pub fn result(&self) -> Option<MatchResultKind> {
        (self.state.phase == MatchPhase::Ended)
            .then(|| MatchResultKind::from_scores(self.state.team_score, self.state.opponent_score))
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn require_phase(&self, command: &'static str, allowed: impl Fn(MatchPhase) -> bool) -> Result<()> {
        if allowed(self.state.phase) {
            Ok(())
        } else {
            Err(MatchError::InvalidCommand { command, phase: self.state.phase })
        }
    }

    fn require_idle(&self, command: &'static str) -> Result<()> {
        self.require_phase(command, MatchPhase::is_live)?;
        if self.interaction != Interaction::Idle {
            return Err(MatchError::CheckInProgress);
        }
        Ok(())
    }

    // ============================================
    // Commands
    // ============================================

    /// Ready → Playing. Starts the clock and rotation.
    pub fn start(&mut self) -> Result<()> {
        self.require_phase("start", |phase| phase == MatchPhase::Ready)?;
        self.state.advance_phase(MatchPhase::Playing);
        self.clock.start();
        self.rotation.resume(MatchPhase::Playing);
        self.sync_rotation_display();
        let message = format!(
            "Final minutes against {}: {} seconds left, {} - {}",
            self.state.opponent.name,
            self.state.clock_seconds,
            self.state.team_score,
            self.state.opponent_score
        );
        self.state.push_log(message);
        info!(match_id = %self.state.match_id, "match started");
        self.touch();
        Ok(())
    }

    /// Opens the skill check for the current possession and suspends rotation.
    pub fn trigger_action(&mut self) -> Result<()> {
        self.require_idle("trigger_action")?;
        let critical = self.state.phase == MatchPhase::Critical;
        let window = TimingWindow::from_config(self.state.current_action, critical, &self.config.timing);
        debug!(
            kind = ?window.kind(),
            duration_ms = window.duration_ms(),
            player = %self.state.current_player.name,
            "skill check opened"
        );
        self.check = Some(window);
        self.interaction = Interaction::SkillCheck;
        self.rotation.suspend();
        self.touch();
        Ok(())
    }

    /// The user's stop input on the open skill check.
    pub fn stop_check(&mut self) -> Result<()> {
        let result = match self.check.as_mut() {
            Some(window) if window.is_active() => window.stop(),
            _ => None,
        };
        let result = result.ok_or(MatchError::NoCheckActive)?;
        self.resolve_check(result);
        self.touch();
        Ok(())
    }

    /// Wait for a better player, at the risk of a turnover.
    pub fn wait(&mut self) -> Result<()> {
        self.require_idle("wait")?;
        let phase = self.state.phase;
        match decide_wait(phase, &self.config.rotation, self.rng.as_mut()) {
            WaitDecision::Turnover => {
                self.flip_possession();
                let message = format!(
                    "Held on too long and lost the ball! Now on {}",
                    self.state.current_action.label()
                );
                self.state.push_log(message);
                debug!(action = self.state.current_action.label(), "wait ended in a turnover");
            }
            WaitDecision::Waiting { raise_warning } => {
                self.state.push_log("Waiting for a better opportunity...");
                if raise_warning {
                    self.state.wait_too_long = true;
                }
            }
        }
        self.touch();
        Ok(())
    }

    /// Ended → Ready with a fresh opponent, seed score and log.
    pub fn restart(&mut self) -> Result<()> {
        self.require_phase("restart", |phase| phase == MatchPhase::Ended)?;
        self.state = fresh_state(&self.catalog, &self.config, self.rng.as_mut());
        self.clock = MatchClock::new(&self.config.clock);
        self.rotation = RotationScheduler::new(&self.config.rotation);
        self.result_display.disarm();
        self.check = None;
        self.interaction = Interaction::Idle;
        self.pending_outcome = None;
        info!(match_id = %self.state.match_id, opponent = %self.state.opponent.name, "match restarted");
        self.touch();
        Ok(())
    }

    // ============================================
    // Time
    // ============================================

    /// Feeds wall time into the match. Returns the log entries written meanwhile.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<LogEntry> {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.advance_ms(elapsed_ms)
    }

    pub fn advance_ms(&mut self, elapsed_ms: u64) -> Vec<LogEntry> {
        let log_start = self.state.log().len();
        let mut remaining = elapsed_ms;
        while remaining > 0 && self.state.phase.is_live() {
            let step = self.next_deadline_ms().map_or(remaining, |deadline| deadline.min(remaining));
            self.step(step);
            remaining -= step;
        }
        self.state.log()[log_start..].to_vec()
    }

    fn next_deadline_ms(&self) -> Option<u64> {
        [
            self.clock.remaining_ms(),
            self.check.as_ref().and_then(TimingWindow::remaining_ms),
            self.result_display.remaining_ms(),
            self.rotation.remaining_ms(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn step(&mut self, dt_ms: u64) {
        let tick = self.clock.advance(dt_ms);
        let mut rotation_reset = false;
        if !tick.is_quiet() {
            self.state.clock_seconds = self.clock.remaining_seconds();
        }
        if tick.entered_critical {
            self.enter_critical();
            rotation_reset = true;
        }
        if tick.expired {
            self.end_match();
            self.touch();
            return;
        }

        let was_idle = self.interaction == Interaction::Idle;
        self.advance_interaction(dt_ms);

        let mut rotated = false;
        if was_idle && self.interaction == Interaction::Idle && !rotation_reset {
            for event in self.rotation.advance(dt_ms) {
                self.handle_rotation_event(event);
                rotated = true;
            }
        }

        if !tick.is_quiet() || !was_idle || rotated {
            self.touch();
        }
    }

    fn advance_interaction(&mut self, dt_ms: u64) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::SkillCheck => {
                let timed_out = self.check.as_mut().and_then(|window| window.advance(dt_ms));
                if let Some(result) = timed_out {
                    self.resolve_check(result);
                }
                let finished = self.check.as_ref().map_or(true, |window| !window.is_busy());
                if finished {
                    self.interaction = Interaction::ResultDisplay;
                    self.result_display.arm_with(self.config.timing.result_display_ms);
                }
            }
            Interaction::ResultDisplay => {
                if self.result_display.advance(dt_ms) {
                    self.finish_action();
                }
            }
        }
    }

    // ============================================
    // Transitions
    // ============================================

    fn enter_critical(&mut self) {
        if !self.state.advance_phase(MatchPhase::Critical) {
            return;
        }
        let message = format!(
            "Critical moment! {} seconds left, {} - {}",
            self.state.clock_seconds, self.state.team_score, self.state.opponent_score
        );
        self.state.push_log(message);
        self.rotation.reset(MatchPhase::Critical);
        self.sync_rotation_display();
        info!(match_id = %self.state.match_id, clock = self.state.clock_seconds, "entered critical phase");
    }

    fn end_match(&mut self) {
        if let Some(window) = self.check.as_mut() {
            window.cancel();
        }
        self.check = None;
        self.pending_outcome = None;
        self.interaction = Interaction::Idle;
        self.result_display.disarm();
        self.rotation.suspend();
        self.clock.halt();

        if !self.state.advance_phase(MatchPhase::Ended) {
            return;
        }
        let result = MatchResultKind::from_scores(self.state.team_score, self.state.opponent_score);
        let message = format!(
            "Final buzzer! {} {} - {} ({})",
            result.label(),
            self.state.team_score,
            self.state.opponent_score,
            self.state.opponent.name
        );
        self.state.push_log(message);
        info!(
            match_id = %self.state.match_id,
            team_score = self.state.team_score,
            opponent_score = self.state.opponent_score,
            result = ?result,
            "match ended"
        );
    }

    fn resolve_check(&mut self, result: CheckResult) {
        let critical = self.state.phase == MatchPhase::Critical;
        let player = self.state.current_player.clone();
        let skill = self.offer_skill(&player);
        let resolution = &self.config.resolution;
        let outcome = match self.state.current_action {
            PossessionAction::Offense => resolve_offense(
                Some(&player),
                skill.as_ref(),
                result.success,
                critical,
                resolution,
                self.rng.as_mut(),
            ),
            PossessionAction::Defense => resolve_defense(
                Some(&player),
                skill.as_ref(),
                result.success,
                Some(&self.state.opponent),
                critical,
                resolution,
                self.rng.as_mut(),
            ),
        };
        debug!(
            success = result.success,
            timed_out = result.timed_out,
            points = outcome.points,
            opponent_points = outcome.opponent_points,
            used_skill = ?outcome.used_skill_id,
            "action resolved"
        );
        self.state.apply_outcome(&outcome);
        self.pending_outcome = Some(outcome);
    }

    /// An unused skill is offered to resolution on a coin flip.
    fn offer_skill(&mut self, player: &Player) -> Option<Skill> {
        let skill = self.catalog.skill_for(player)?;
        if self.state.used_skills.contains(skill.id) {
            return None;
        }
        if !self.rng.chance(self.config.resolution.skill_activation_chance) {
            return None;
        }
        debug!(skill = %skill.name, effect = skill.effect_type.label(), "skill offered");
        Some(skill.clone())
    }

    fn finish_action(&mut self) {
        self.check = None;
        self.pending_outcome = None;
        self.interaction = Interaction::Idle;
        self.flip_possession();
        self.state.wait_too_long = false;
        debug!(action = self.state.current_action.label(), "possession changed after action");
    }

    /// Toggles the action, picks a fitting player and restarts rotation.
    fn flip_possession(&mut self) {
        let phase = self.state.phase;
        self.state.current_action = self.state.current_action.toggled();
        self.reselect_player();
        self.rotation.resume(phase);
        self.sync_rotation_display();
    }

    fn reselect_player(&mut self) {
        self.state.current_player = select_player(
            &self.catalog.players,
            self.state.current_action,
            self.config.rotation.suitability_threshold,
            self.rng.as_mut(),
        );
    }

    fn sync_rotation_display(&mut self) {
        self.state.rotation_seconds_remaining = self.rotation.seconds_remaining();
    }

    fn handle_rotation_event(&mut self, event: RotationEvent) {
        match event {
            RotationEvent::Countdown(seconds) => {
                self.state.rotation_seconds_remaining = seconds;
            }
            RotationEvent::WaitTooLong => {
                if self.state.phase == MatchPhase::Playing {
                    self.state.wait_too_long = true;
                    self.state.push_log("You waited too long! Make a move.");
                    debug!("wait-too-long warning raised");
                }
            }
            RotationEvent::RotationTick => {
                let phase = self.state.phase;
                match decide_rotation(phase, &self.config.rotation, self.rng.as_mut()) {
                    RotationDecision::SwitchPossession => {
                        self.flip_possession();
                        let message = match self.state.current_action {
                            PossessionAction::Offense => "We win the ball back! Our possession.",
                            PossessionAction::Defense => "Possession lost, get back on defense!",
                        };
                        self.state.push_log(message);
                        debug!(action = self.state.current_action.label(), "rotation switched possession");
                    }
                    RotationDecision::Pass => {
                        self.reselect_player();
                        self.rotation.note_rotation();
                        self.sync_rotation_display();
                        let message = format!("Ball passed to {}", self.state.current_player.name);
                        self.state.push_log(message);
                        debug!(player = %self.state.current_player.name, "rotation pass");
                    }
                }
                self.state.wait_too_long = false;
            }
        }
    }

    // ============================================
    // Snapshot
    // ============================================

    pub fn snapshot(&self) -> MatchSnapshot {
        let current_skill = self
            .catalog
            .skill_for(&self.state.current_player)
            .filter(|skill| !self.state.used_skills.contains(skill.id))
            .cloned();
        MatchSnapshot {
            match_id: self.state.match_id.to_string(),
            revision: self.revision,
            phase: self.state.phase,
            clock_seconds: self.state.clock_seconds,
            team_score: self.state.team_score,
            opponent_score: self.state.opponent_score,
            current_action: self.state.current_action,
            current_player: self.state.current_player.clone(),
            current_skill,
            opponent: self.state.opponent.clone(),
            rotation_seconds_remaining: self.state.rotation_seconds_remaining,
            wait_too_long: self.state.wait_too_long,
            interaction: self.interaction,
            check: self.check.as_ref().map(TimingWindow::view),
            pending_outcome: self.pending_outcome.clone(),
            used_skills: self.state.used_skills.iter().collect(),
            log: self.state.log().to_vec(),
            result: self.result(),
        }
    }
}

fn fresh_state(catalog: &Catalog, config: &EngineConfig, rng: &mut dyn RandomSource) -> MatchState {
    let opponent = catalog.pick_opponent(rng);
    let seed = simulate_first_three_quarters(
        catalog.team_attack(),
        catalog.team_defense(),
        opponent.attack_value,
        opponent.defense_value,
        rng,
    );
    let action = if rng.chance(OPENING_OFFENSE_CHANCE) {
        PossessionAction::Offense
    } else {
        PossessionAction::Defense
    };
    let player = select_player(&catalog.players, action, config.rotation.suitability_threshold, rng);
    MatchState::new(
        config.clock.start_seconds,
        config.rotation.countdown_seconds,
        opponent,
        action,
        player,
        seed.as_pair(),
    )
}
