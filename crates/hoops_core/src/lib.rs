//! # hoops_core - Final-Minutes Basketball Match Engine
//!
//! Real-time engine for the last two minutes of a basketball match: a match
//! clock with a critical phase, automatic player rotation, timing-window
//! skill checks and probabilistic offense/defense resolution.
//!
//! ## Features
//! - Deterministic replay: every draw goes through an injectable random source
//! - Time-sliced driver: `advance` fires events in order at any step size
//! - JSON API for easy integration with game engines and UI shells
//!
//! ```rust
//! use hoops_core::{Catalog, EngineConfig, MatchController, MatchPhase};
//!
//! let catalog = Catalog::demo().unwrap();
//! let mut controller = MatchController::with_seed(catalog, EngineConfig::default(), 7).unwrap();
//! controller.start().unwrap();
//! controller.advance_ms(120_000);
//! assert_eq!(controller.phase(), MatchPhase::Ended);
//! ```

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;

// Re-export main API functions
pub use api::{
    create_match_json, match_command_json, match_snapshot_json, snapshot_schema_json, MatchCommand,
};
pub use error::{MatchError, Result};

// Re-export engine types
pub use data::{simulate_first_three_quarters, Catalog, SeedScore};
pub use engine::{
    EngineConfig, Interaction, MatchController, MatchPhase, MatchResultKind, MatchSnapshot,
    PossessionAction, RandomSource, ScriptedRandom, SeededRandom,
};
pub use models::{ActionOutcome, Opponent, Player, Skill, SkillEffect};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the JSON API payloads
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_seeded_matches_are_reproducible() {
        let run = |seed| {
            let catalog = Catalog::demo().unwrap();
            let mut controller =
                MatchController::with_seed(catalog, EngineConfig::default(), seed).unwrap();
            controller.start().unwrap();
            controller.advance_ms(150_000);
            let state = controller.state();
            (state.team_score, state.opponent_score, state.log().to_vec())
        };
        assert_eq!(run(11), run(11));
    }
}
