//! The decision loop.
//!
//! `GameRunner` owns one table: the engine, its state and one strategy per
//! seat. Each `step` hands the active seat's observation and legal actions to
//! its strategy, applies the answer and moves the turn along. Seats with
//! nothing to decide are skipped without consulting their strategy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Action, ConfigError, GameState, Phase, PlayerId, PlayerMap, RulesError};
use crate::rules::{Flip7, RoundSummary, RulesEngine};
use crate::strategy::Strategy;

/// Shared "stop now" switch. Strategies set it (a human pressing `q`); the
/// runner checks it after every decision.
#[derive(Clone, Debug, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0} returned no decision")]
    NoDecision(PlayerId),

    #[error("{player} chose an action that was not offered: {action}")]
    IllegalChoice { player: PlayerId, action: Action },

    #[error("expected {expected} strategies, got {got}")]
    StrategyCount { expected: usize, got: usize },

    #[error("{0} must act but has no legal action")]
    Stalled(PlayerId),
}

/// What one call to [`GameRunner::step`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// A strategy decided and the action was applied.
    Acted(Action),
    /// Nobody had to decide; the turn (or round) moved on.
    Advanced,
    GameOver,
    Aborted,
}

/// Final result of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Rounds scored.
    pub rounds: u32,
    pub scores: PlayerMap<u32>,
    pub names: PlayerMap<String>,
    /// Leader's name once the game is over; `None` after an abort.
    pub winner: Option<String>,
    pub aborted: bool,
}

/// Drives one game to completion.
pub struct GameRunner {
    game: Flip7,
    state: GameState,
    strategies: Vec<Box<dyn Strategy>>,
    abort: AbortFlag,
    rounds: Vec<RoundSummary>,
}

impl GameRunner {
    /// One strategy per seat, in seat order.
    pub fn new(game: Flip7, state: GameState, strategies: Vec<Box<dyn Strategy>>) -> Result<Self, RunError> {
        if strategies.len() != state.player_count() {
            return Err(RunError::StrategyCount {
                expected: state.player_count(),
                got: strategies.len(),
            });
        }
        Ok(Self {
            game,
            state,
            strategies,
            abort: AbortFlag::new(),
            rounds: Vec::new(),
        })
    }

    /// Share an existing abort flag (e.g. one handed to a human strategy).
    #[must_use]
    pub fn with_abort(mut self, abort: AbortFlag) -> Self {
        self.abort = abort;
        self
    }

    #[must_use]
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    #[must_use]
    pub fn game(&self) -> &Flip7 {
        &self.game
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Summaries of the rounds scored so far.
    #[must_use]
    pub fn rounds(&self) -> &[RoundSummary] {
        &self.rounds
    }

    /// Perform one decision or one automatic advance.
    pub fn step(&mut self) -> Result<Step, RunError> {
        if self.state.game_over {
            return Ok(Step::GameOver);
        }
        if self.abort.is_aborted() {
            return Ok(Step::Aborted);
        }

        let actor = self.state.active_player;
        let legal = self.game.legal_actions(&self.state, actor);
        if legal.is_empty() {
            if self.state.phase != Phase::Flip {
                return Err(RunError::Stalled(actor));
            }
            self.advance();
            return Ok(Step::Advanced);
        }

        let obs = self.game.observe(&self.state, actor);
        let choice = self.strategies[actor.index()].choose_action(&obs, &legal);
        if self.abort.is_aborted() {
            log::info!("game aborted by {}", self.state.player(actor).name);
            return Ok(Step::Aborted);
        }

        let action = choice.ok_or(RunError::NoDecision(actor))?;
        if !legal.contains(&action) {
            return Err(RunError::IllegalChoice { player: actor, action });
        }
        log::trace!("{action}");
        self.game.apply_action(&mut self.state, &action)?;

        if self.state.phase == Phase::Flip {
            self.advance();
        }
        Ok(Step::Acted(action))
    }

    fn advance(&mut self) {
        if let Some(summary) = self.game.advance_turn(&mut self.state) {
            self.rounds.push(summary);
        }
    }

    /// Step until the game ends or is aborted.
    pub fn run(&mut self) -> Result<GameSummary, RunError> {
        loop {
            match self.step()? {
                Step::GameOver | Step::Aborted => break,
                Step::Acted(_) | Step::Advanced => {}
            }
        }

        let summary = self.summary();
        match &summary.winner {
            Some(winner) => log::debug!("{winner} wins after {} rounds", summary.rounds),
            None => log::debug!("game stopped after {} rounds", summary.rounds),
        }
        Ok(summary)
    }

    /// Scores and outcome as of now.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        let players = self.state.players();
        let winner = self
            .state
            .game_over
            .then(|| self.state.player(self.game.leader(&self.state)).name.clone());

        GameSummary {
            rounds: self.rounds.len() as u32,
            scores: players.map(|_, p| p.score),
            names: players.map(|_, p| p.name.clone()),
            winner,
            aborted: self.abort.is_aborted() && !self.state.game_over,
        }
    }
}
