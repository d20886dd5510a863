//! Uniform random play.

use super::Strategy;
use crate::core::{Action, GameRng, Observation};

/// Selects uniformly from legal actions.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_rng(GameRng::new(seed))
    }

    /// Use an existing stream, e.g. `state.rng.for_context("bot-2")`.
    #[must_use]
    pub fn from_rng(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn choose_action(&mut self, _obs: &Observation, legal: &[Action]) -> Option<Action> {
        self.rng.choose(legal).cloned()
    }

    fn name(&self) -> &str {
        "random"
    }
}
