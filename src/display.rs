//! Plain-text table rendering.
//!
//! Works only from an `Observation` and the legal actions, so it can show any
//! seat's view without touching live state. Key bindings are shared with
//! `HumanStrategy`: `d` draws, `p` passes, `1`..`9` pick a target.

use std::io::{self, Write};
use std::sync::Arc;

use crate::cards::Card;
use crate::core::{Action, ActionKind, Observation, PlayerId};
use crate::events::RecordingSink;

/// One selectable action with its key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub label: String,
    pub action: Action,
}

/// Map legal actions to keys.
#[must_use]
pub fn build_choices(obs: &Observation, legal: &[Action]) -> Vec<Choice> {
    let mut choices = Vec::with_capacity(legal.len());

    if let Some(draw) = legal.iter().find(|a| a.kind == ActionKind::Draw) {
        choices.push(Choice {
            key: "d".into(),
            label: "Draw".into(),
            action: draw.clone(),
        });
    }
    if let Some(pass) = legal.iter().find(|a| a.kind == ActionKind::Pass) {
        choices.push(Choice {
            key: "p".into(),
            label: "Pass".into(),
            action: pass.clone(),
        });
    }

    let targets = legal.iter().filter(|a| a.kind == ActionKind::ChoosePlayer);
    for (i, action) in targets.enumerate() {
        let label = match action.target {
            Some(target) => format!("Choose {}", obs.name_of(target)),
            None => "Choose".to_string(),
        };
        choices.push(Choice {
            key: (i + 1).to_string(),
            label,
            action: action.clone(),
        });
    }
    choices
}

/// Find the choice bound to `key`, ignoring case and surrounding spaces.
#[must_use]
pub fn choice_for_key<'a>(choices: &'a [Choice], key: &str) -> Option<&'a Choice> {
    let key = key.trim();
    choices.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

/// Renders observations as text.
#[derive(Clone, Debug, Default)]
pub struct TextDisplay {
    log: Option<Arc<RecordingSink>>,
    log_lines: usize,
}

impl TextDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the last `lines` recorded events under the table.
    #[must_use]
    pub fn with_log(mut self, log: Arc<RecordingSink>, lines: usize) -> Self {
        self.log = Some(log);
        self.log_lines = lines;
        self
    }

    /// Header, one block per seat, then the actions on offer.
    pub fn render(&self, obs: &Observation, legal: &[Action], out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "Flip 7  |  Round {}  |  {}  |  Acting: {}  |  Deck: {}",
            obs.round,
            obs.phase,
            obs.name_of(obs.acting_player),
            obs.deck_size
        )?;
        if let (Some(card), Some(owner)) = (obs.extras.pending_effect, obs.extras.pending_effect_owner) {
            writeln!(out, "Resolving {card} drawn by {}", obs.name_of(owner))?;
        }
        if !obs.extras.effects_to_resolve.is_empty() {
            let queued: Vec<String> = obs
                .extras
                .effects_to_resolve
                .iter()
                .map(|card| match card.owner {
                    Some(owner) => format!("{card} ({})", obs.name_of(owner)),
                    None => card.to_string(),
                })
                .collect();
            writeln!(out, "Queued: {}", queued.join(", "))?;
        }
        writeln!(out)?;

        for (id, name) in obs.names.iter() {
            let mut line = format!("{}: {name} score={}", id.index() + 1, obs.scores[id]);
            if let Some(hand) = obs.hand_scores[id] {
                line.push_str(&format!("+({hand})"));
            }
            if let Some(odds) = obs.extras.bust_probabilities.as_ref().and_then(|o| o.get(id)) {
                line.push_str(&format!(" bust~{:.0}%", odds * 100.0));
            }

            let mut flags = Vec::new();
            if let Some(status) = obs.statuses[id] {
                flags.push(status.to_string());
            }
            if id == obs.acting_player {
                flags.push("ACTING".to_string());
            }
            if id == obs.leading_player {
                flags.push("LEADER".to_string());
            }
            if !flags.is_empty() {
                line.push_str(&format!(" [{}]", flags.join(",")));
            }
            writeln!(out, "{line}")?;

            match self.visible_hand(obs, id) {
                Some(cards) if !cards.is_empty() => {
                    let shown: Vec<String> = cards.iter().map(ToString::to_string).collect();
                    writeln!(out, "   {}", shown.join(", "))?;
                }
                Some(_) => writeln!(out, "   (empty)")?,
                None => writeln!(out, "   {} card(s)", obs.hand_sizes[id])?,
            }
        }

        if let Some(log) = &self.log {
            let events = log.events();
            let skip = events.len().saturating_sub(self.log_lines);
            writeln!(out)?;
            for event in &events[skip..] {
                writeln!(out, "  {event}")?;
            }
        }

        writeln!(out)?;
        let choices = build_choices(obs, legal);
        if choices.is_empty() {
            writeln!(out, "(no actions)")?;
        }
        for choice in &choices {
            writeln!(out, "[{}] {}", choice.key, choice.label)?;
        }
        Ok(())
    }

    fn visible_hand<'a>(&self, obs: &'a Observation, id: PlayerId) -> Option<&'a [Card]> {
        if id == obs.acting_player {
            return Some(&obs.own_hand);
        }
        obs.other_hands
            .as_ref()
            .and_then(|hands| hands.iter().find(|(seat, _)| *seat == id))
            .map(|(_, cards)| cards.as_slice())
    }
}
