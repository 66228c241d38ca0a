//! Static match entities and resolution outputs.

pub mod opponent;
pub mod outcome;
pub mod player;
pub mod skill;

pub use opponent::Opponent;
pub use outcome::{ActionOutcome, OutcomeStats};
pub use player::Player;
pub use skill::{Skill, SkillEffect};
