//! Watch a strategy play.

use std::io::Write;
use std::time::Duration;

use super::Strategy;
use crate::core::{Action, Observation};
use crate::display::TextDisplay;

/// Renders every decision point before delegating to the wrapped strategy,
/// optionally pausing so a human can follow along.
pub struct DisplayStrategy<S, W> {
    inner: S,
    display: TextDisplay,
    output: W,
    delay: Duration,
}

impl<S: Strategy, W: Write> DisplayStrategy<S, W> {
    pub fn new(inner: S, display: TextDisplay, output: W) -> Self {
        Self {
            inner,
            display,
            output,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_inner(self) -> (S, W) {
        (self.inner, self.output)
    }
}

impl<S: Strategy, W: Write> Strategy for DisplayStrategy<S, W> {
    fn choose_action(&mut self, obs: &Observation, legal: &[Action]) -> Option<Action> {
        if let Err(err) = self.display.render(obs, legal, &mut self.output) {
            log::warn!("could not render table: {err}");
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.inner.choose_action(obs, legal)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
