//! Keyboard-driven play.

use std::io::{self, BufRead, Read, Stdin, Stdout, Write};

use super::Strategy;
use crate::core::{Action, Observation};
use crate::display::{build_choices, choice_for_key, TextDisplay};
use crate::runner::AbortFlag;

/// Renders the table and reads one key per line.
///
/// `d` draws, `p` passes, `1`..`9` pick a target and `q` quits. Quitting (or
/// reaching end of input) sets the abort flag and returns no decision.
pub struct HumanStrategy<R, W> {
    input: R,
    output: W,
    abort: AbortFlag,
    display: TextDisplay,
}

/// Line-at-a-time reader over the process stdin.
///
/// Holds the stdin lock only while a line is read, so several human seats can
/// share the terminal.
#[derive(Debug)]
pub struct StdinLines {
    stdin: Stdin,
    line: Vec<u8>,
    pos: usize,
}

impl StdinLines {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for StdinLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            let mut text = String::new();
            self.stdin.read_line(&mut text)?;
            self.line = text.into_bytes();
            self.pos = 0;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}

impl HumanStrategy<StdinLines, Stdout> {
    /// Read from stdin, write to stdout.
    #[must_use]
    pub fn stdio(abort: AbortFlag) -> Self {
        Self::new(StdinLines::new(), io::stdout(), abort)
    }
}

impl<R: BufRead, W: Write> HumanStrategy<R, W> {
    pub fn new(input: R, output: W, abort: AbortFlag) -> Self {
        Self {
            input,
            output,
            abort,
            display: TextDisplay::new(),
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: TextDisplay) -> Self {
        self.display = display;
        self
    }

    /// Give the writer back, e.g. to inspect what was shown.
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str) {
        let written = write!(self.output, "{text}").and_then(|()| self.output.flush());
        if let Err(err) = written {
            log::warn!("could not write prompt: {err}");
        }
    }

    fn quit(&mut self) -> Option<Action> {
        self.abort.abort();
        None
    }
}

impl<R: BufRead, W: Write> Strategy for HumanStrategy<R, W> {
    fn choose_action(&mut self, obs: &Observation, legal: &[Action]) -> Option<Action> {
        let choices = build_choices(obs, legal);
        if let Err(err) = self.display.render(obs, legal, &mut self.output) {
            log::warn!("could not render table: {err}");
        }

        loop {
            self.prompt("> ");
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return self.quit(),
                Ok(_) => {}
                Err(err) => {
                    log::warn!("could not read input: {err}");
                    return self.quit();
                }
            }

            let key = line.trim();
            if key.eq_ignore_ascii_case("q") {
                return self.quit();
            }
            if let Some(choice) = choice_for_key(&choices, key) {
                return Some(choice.action.clone());
            }
            self.prompt(&format!("Unknown choice '{key}'\n"));
        }
    }

    fn name(&self) -> &str {
        "human"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionKind, GameConfig, PlayerId};
    use crate::events::NullSink;
    use crate::rules::{Flip7Builder, RulesEngine};
    use std::io::Cursor;
    use std::sync::Arc;

    fn ask(keys: &str) -> (Option<Action>, AbortFlag, String) {
        let (game, state) = Flip7Builder::new()
            .players(["Ann", "Bob"])
            .config(GameConfig::default().with_seed(4))
            .sink(Arc::new(NullSink))
            .build()
            .unwrap();
        let me = PlayerId::new(0);
        let abort = AbortFlag::new();
        let mut human = HumanStrategy::new(Cursor::new(keys.to_string()), Vec::new(), abort.clone());

        let choice = human.choose_action(&game.observe(&state, me), &game.legal_actions(&state, me));
        let shown = String::from_utf8(human.into_output()).unwrap();
        (choice, abort, shown)
    }

    #[test]
    fn test_keys_map_to_actions() {
        let (choice, abort, _) = ask("d\n");
        assert_eq!(choice.map(|a| a.kind), Some(ActionKind::Draw));
        assert!(!abort.is_aborted());
    }

    #[test]
    fn test_unknown_key_reprompts() {
        let (choice, _, shown) = ask("z\nP\n");
        assert_eq!(choice.map(|a| a.kind), Some(ActionKind::Pass));
        assert!(shown.contains("Unknown choice 'z'"));
    }

    #[test]
    fn test_quit_and_eof_abort() {
        let (choice, abort, _) = ask("q\n");
        assert!(choice.is_none());
        assert!(abort.is_aborted());

        let (choice, abort, _) = ask("");
        assert!(choice.is_none());
        assert!(abort.is_aborted());
    }
}
