//! # flip-seven
//!
//! Rules engine for the Flip Seven push-your-luck card game, with a bust-odds
//! estimator, pluggable decision-makers and a parallel simulation harness.
//!
//! ## Design Principles
//!
//! 1. **Action-Driven**: Every decision is an `Action` picked from the list
//!    the engine offers. The engine never calls a player; a driver loop does.
//!
//! 2. **N-Player First**: One to twelve seats. Per-seat data lives in
//!    `PlayerMap`, indexed by `PlayerId`.
//!
//! 3. **Deterministic**: All randomness flows from a seeded `GameRng`, so a
//!    seed replays a whole game and batch runs are reproducible.
//!
//! 4. **Injected Side Effects**: The engine reports through an `EventSink`
//!    handed to it at construction, never through global state.
//!
//! ## Modules
//!
//! - `core`: Players, actions, observations, configuration, state, RNG, errors
//! - `cards`: Card faces, the unordered deck, hands
//! - `rules`: `RulesEngine` trait, the `Flip7` state machine, hand scoring
//! - `odds`: Bust probability estimates
//! - `events`: Game events and sinks
//! - `strategy`: Random, threshold, human and display-wrapping strategies
//! - `display`: Plain-text rendering of an observation
//! - `runner`: The decision loop for one game
//! - `batch`: Many games across the rayon pool
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use flip_seven::{Flip7Builder, GameConfig, GameRunner, NullSink, Strategy, ThresholdStrategy};
//!
//! let (game, state) = Flip7Builder::new()
//!     .players(["Elias", "Eloise", "Jules"])
//!     .config(GameConfig::default().with_seed(7))
//!     .sink(Arc::new(NullSink))
//!     .build()
//!     .unwrap();
//!
//! let bots: Vec<Box<dyn Strategy>> = (0..3)
//!     .map(|_| Box::new(ThresholdStrategy::default()) as Box<dyn Strategy>)
//!     .collect();
//! let summary = GameRunner::new(game, state, bots).unwrap().run().unwrap();
//! assert!(summary.winner.is_some());
//! ```

pub mod core;
pub mod cards;
pub mod rules;
pub mod odds;
pub mod events;
pub mod strategy;
pub mod display;
pub mod runner;
pub mod batch;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, Player, PlayerStatus,
    GameRng,
    GameConfig, MAX_PLAYERS,
    Action, ActionKind, ActionRecord,
    Observation, ObservationExtras,
    GameState, Phase,
    RulesError, ConfigError,
};

pub use crate::cards::{Card, CardFace, Deck, Hand, STANDARD_DECK_SIZE};

pub use crate::rules::{Flip7, Flip7Builder, GameResult, RoundSummary, RulesEngine, hand_score};

pub use crate::odds::{bust_probability, direct_match_probability, match_by_flip_three_probability};

pub use crate::events::{EventSink, GameEvent, LogSink, NullSink, RecordingSink, Seat};

pub use crate::strategy::{DisplayStrategy, HumanStrategy, RandomStrategy, Strategy, ThresholdStrategy};

pub use crate::display::TextDisplay;

pub use crate::runner::{AbortFlag, GameRunner, GameSummary, RunError, Step};

pub use crate::batch::{run_batch, run_parallel, BatchSummary};
