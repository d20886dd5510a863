//! What a decision-maker gets to see.
//!
//! An `Observation` is an immutable snapshot built by the engine for one
//! seat. It never references live state, so strategies cannot mutate the game
//! behind the engine's back.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap, PlayerStatus};
use super::state::Phase;
use crate::cards::Card;

/// Effect and estimator details for richer front-ends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationExtras {
    /// Queued effect cards, front first.
    pub effects_to_resolve: Vec<Card>,

    /// Owner of each queued effect, parallel to `effects_to_resolve`.
    pub effect_owners: Vec<PlayerId>,

    /// Effect whose target is being chosen right now.
    pub pending_effect: Option<Card>,

    pub pending_effect_owner: Option<PlayerId>,

    /// Estimated bust odds per seat (0 for seats that are done).
    pub bust_probabilities: Option<PlayerMap<f64>>,
}

/// Snapshot of the game from one seat's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Seat this observation was built for.
    pub acting_player: PlayerId,
    pub turn_player: PlayerId,
    pub leading_player: PlayerId,
    pub players_still_playing: usize,
    pub phase: Phase,
    pub round: u32,

    /// Cumulative scores.
    pub scores: PlayerMap<u32>,
    pub done: PlayerMap<bool>,
    pub statuses: PlayerMap<Option<PlayerStatus>>,
    pub names: PlayerMap<String>,
    pub hand_sizes: PlayerMap<usize>,

    /// Current hand value for hands this seat can see.
    pub hand_scores: PlayerMap<Option<u32>>,

    pub deck_size: usize,
    pub own_hand: Vec<Card>,
    pub open_hands: bool,

    /// Everyone else's hand, present only with open hands.
    pub other_hands: Option<Vec<(PlayerId, Vec<Card>)>>,

    pub extras: ObservationExtras,
}

impl Observation {
    /// Bust estimate for the acting seat, when the engine provides one.
    #[must_use]
    pub fn own_bust_probability(&self) -> Option<f64> {
        self.extras
            .bust_probabilities
            .as_ref()
            .and_then(|odds| odds.get(self.acting_player).copied())
    }

    /// Display name of a seat, or its id if unknown.
    #[must_use]
    pub fn name_of(&self, player: PlayerId) -> String {
        self.names
            .get(player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }
}
