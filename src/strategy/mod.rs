//! Decision-makers.
//!
//! A `Strategy` sees an `Observation` plus the legal actions and returns one
//! of them. The engine never calls strategies itself; `GameRunner` does.
//! Wrapping is done by composition: `DisplayStrategy` renders the table and
//! then defers to whatever strategy it holds.

mod display;
mod human;
mod random;
mod threshold;

pub use display::DisplayStrategy;
pub use human::{HumanStrategy, StdinLines};
pub use random::RandomStrategy;
pub use threshold::ThresholdStrategy;

use crate::core::{Action, Observation};

/// Picks one action from the legal list.
pub trait Strategy {
    /// Return a member of `legal`, or `None` to give up the decision.
    ///
    /// `legal` is never empty.
    fn choose_action(&mut self, obs: &Observation, legal: &[Action]) -> Option<Action>;

    /// Short label for logs and batch reports.
    fn name(&self) -> &str {
        "strategy"
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn choose_action(&mut self, obs: &Observation, legal: &[Action]) -> Option<Action> {
        (**self).choose_action(obs, legal)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
