//! Game rules.
//!
//! `RulesEngine` is the seam drivers program against: legal actions for a
//! seat, applying an action, and detecting the end of the game. `Flip7` is
//! the Flip Seven implementation; `hand_score` is shared with front-ends and
//! bots that want to value a hand without an engine.

pub mod engine;
pub mod flip7;
pub mod scoring;

pub use engine::{GameResult, RulesEngine};
pub use flip7::{Flip7, Flip7Builder, RoundSummary, DEFAULT_ROSTER};
pub use scoring::hand_score;
