//! Core types: players, RNG, actions, observations, configuration, state, errors.
//!
//! Nothing in here knows the rules of the game. `rules::Flip7` is the only
//! code that changes a `GameState` during play.

pub mod action;
pub mod config;
pub mod error;
pub mod observation;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionKind, ActionRecord};
pub use config::{GameConfig, MAX_PLAYERS};
pub use error::{ConfigError, RulesError};
pub use observation::{Observation, ObservationExtras};
pub use player::{Player, PlayerId, PlayerMap, PlayerStatus};
pub use rng::GameRng;
pub use state::{GameState, Phase};
