//! Real-time match engine: clock, rotation, skill checks and resolution,
//! coordinated by [`controller::MatchController`].

pub mod clock;
pub mod config;
pub mod controller;
pub mod resolution;
pub mod rng;
pub mod rotation;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod timing_window;


pub use clock::{ClockTick, MatchClock};
pub use config::EngineConfig;
pub use controller::MatchController;
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use snapshot::{Interaction, MatchResultKind, MatchSnapshot};
pub use state::{LogEntry, MatchPhase, MatchState, PossessionAction, UsedSkills};
pub use timing_window::{CheckKind, CheckResult, CheckView, TimingWindow, Zone};
