//! Decisions a player can submit to the engine.
//!
//! An action is a verb (`ActionKind`) plus who performs it and, for
//! targeted effects, who it is aimed at. The engine produces the full list of
//! legal actions at each decision point; decision-makers pick one of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::player::PlayerId;

/// The verb of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Flip another card.
    Draw,
    /// Stop and bank the current hand.
    Pass,
    /// Pick the target of the pending Freeze / Flip three.
    ChoosePlayer,
    /// Reserved for variants; never legal in this game.
    PlayCard,
    /// Reserved for variants; never legal in this game.
    Respond,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActionKind::Draw => "draw",
            ActionKind::Pass => "pass",
            ActionKind::ChoosePlayer => "choose player",
            ActionKind::PlayCard => "play card",
            ActionKind::Respond => "respond",
        };
        f.write_str(label)
    }
}

/// A complete decision.
///
/// ```
/// use flip_seven::core::{Action, ActionKind, PlayerId};
///
/// let freeze_target = Action::choose_player(PlayerId::new(0), PlayerId::new(2));
/// assert_eq!(freeze_target.kind, ActionKind::ChoosePlayer);
/// assert_eq!(freeze_target.target, Some(PlayerId::new(2)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,

    /// Seat submitting the action.
    pub actor: PlayerId,

    /// Seat the action is aimed at (ChoosePlayer only).
    pub target: Option<PlayerId>,

    /// Free-form extra data for variants.
    pub payload: Option<BTreeMap<String, i64>>,
}

impl Action {
    /// Create an untargeted action.
    #[must_use]
    pub fn new(kind: ActionKind, actor: PlayerId) -> Self {
        Self {
            kind,
            actor,
            target: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn draw(actor: PlayerId) -> Self {
        Self::new(ActionKind::Draw, actor)
    }

    #[must_use]
    pub fn pass(actor: PlayerId) -> Self {
        Self::new(ActionKind::Pass, actor)
    }

    #[must_use]
    pub fn choose_player(actor: PlayerId, target: PlayerId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(ActionKind::ChoosePlayer, actor)
        }
    }

    /// Attach a payload entry.
    #[must_use]
    pub fn with_payload(mut self, key: impl Into<String>, value: i64) -> Self {
        self.payload.get_or_insert_with(BTreeMap::new).insert(key.into(), value);
        self
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target {
            Some(target) => write!(f, "{} {} -> {}", self.actor, self.kind, target),
            None => write!(f, "{} {}", self.actor, self.kind),
        }
    }
}

/// An applied action with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action taken.
    pub action: Action,

    /// Round in which it was applied (starts at 1).
    pub round: u32,

    /// Global sequence number (0-based, never reset).
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(action: Action, round: u32, sequence: u32) -> Self {
        Self {
            action,
            round,
            sequence,
        }
    }
}
