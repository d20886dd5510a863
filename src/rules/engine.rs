//! Rules engine trait.
//!
//! A rules engine owns every change to a `GameState`. Drivers ask it what a
//! seat may do, submit one of those actions, and check whether the game
//! has ended.

use crate::core::{Action, GameState, PlayerId, RulesError};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Several seats share the top score.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty vec if the player can't act. Never fails.
/// - `apply_action`: Reject anything `legal_actions` would not offer.
/// - `is_terminal`: Return None if the game continues.
pub trait RulesEngine {
    /// Every action `player` may submit right now.
    ///
    /// Recomputed from the state on each call; calling it twice without an
    /// intervening `apply_action` yields equal lists.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    /// Validate and apply one action.
    fn apply_action(&self, state: &mut GameState, action: &Action) -> Result<(), RulesError>;

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    /// Whether `player` has anything to decide.
    fn can_act(&self, state: &GameState, player: PlayerId) -> bool {
        !self.legal_actions(state, player).is_empty()
    }
}
