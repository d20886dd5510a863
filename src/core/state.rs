//! Game state.
//!
//! `GameState` is plain data: the engine (`rules::Flip7`) owns every rule
//! about how it changes. The effect queue and action history use `im`
//! persistent vectors so snapshots of a state are cheap to take.
//!
//! ## Card conservation
//!
//! Within a round, `deck + Σ hands + discard` is always the multiset built by
//! `Deck::standard()`. Cards only move between those three places.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, Deck};

/// Decision phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The turn player decides to draw or pass.
    #[default]
    Flip,
    /// The owner of the pending effect picks a target.
    EffectChoose,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Flip => f.write_str("flip phase"),
            Phase::EffectChoose => f.write_str("effect-choose phase"),
        }
    }
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Draw pile for the current round.
    pub deck: Deck,

    /// Cards spent by Second Chance saves this round.
    pub discard: Vec<Card>,

    players: PlayerMap<Player>,

    /// Whose normal turn it is.
    pub turn_player: PlayerId,

    /// Who must act right now (the effect owner while an effect is pending).
    pub active_player: PlayerId,

    pub phase: Phase,

    /// Round number, starting at 1.
    pub round: u32,

    /// Drawn effect cards waiting for their owner to pick a target (FIFO).
    effect_queue: Vector<Card>,

    /// Effect currently being resolved. Its `owner` is the chooser.
    pending_effect: Option<Card>,

    /// Set once a player reaches the target score.
    pub game_over: bool,

    /// Deck draws come from this stream.
    pub rng: GameRng,

    history: Vector<ActionRecord>,
}

impl GameState {
    /// Fresh game: full deck, empty hands, player 0 to act.
    #[must_use]
    pub fn new(names: &[String], seed: u64) -> Self {
        let players = PlayerMap::from_vec(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Player::new(PlayerId::new(i as u8), name.clone()))
                .collect(),
        );

        Self {
            deck: Deck::standard(),
            discard: Vec::new(),
            players,
            turn_player: PlayerId::new(0),
            active_player: PlayerId::new(0),
            phase: Phase::Flip,
            round: 1,
            effect_queue: Vector::new(),
            pending_effect: None,
            game_over: false,
            rng: GameRng::new(seed),
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// Direct access to the seats. Intended for setting up positions in
    /// tests and tools; gameplay changes go through the engine.
    pub fn players_mut(&mut self) -> &mut PlayerMap<Player> {
        &mut self.players
    }

    /// # Panics
    ///
    /// Panics if the seat does not exist.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// # Panics
    ///
    /// Panics if the seat does not exist.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    #[must_use]
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Seats whose round is still running, in seat order.
    #[must_use]
    pub fn players_not_done(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|(_, p)| !p.is_done).map(|(id, _)| id).collect()
    }

    #[must_use]
    pub fn players_still_playing(&self) -> usize {
        self.players.values().filter(|p| !p.is_done).count()
    }

    #[must_use]
    pub fn everyone_done(&self) -> bool {
        self.players.values().all(|p| p.is_done)
    }

    // === Effects ===

    #[must_use]
    pub fn effect_queue(&self) -> &Vector<Card> {
        &self.effect_queue
    }

    #[must_use]
    pub fn pending_effect(&self) -> Option<&Card> {
        self.pending_effect.as_ref()
    }

    #[must_use]
    pub fn pending_effect_owner(&self) -> Option<PlayerId> {
        self.pending_effect.and_then(|card| card.owner)
    }

    pub(crate) fn enqueue_effect(&mut self, card: Card) {
        self.effect_queue.push_back(card);
    }

    pub(crate) fn pop_effect(&mut self) -> Option<Card> {
        self.effect_queue.pop_front()
    }

    pub(crate) fn set_pending_effect(&mut self, card: Option<Card>) {
        self.pending_effect = card;
    }

    /// Drop queued effects drawn by `owner`.
    pub(crate) fn purge_effects_of(&mut self, owner: PlayerId) {
        self.effect_queue = self
            .effect_queue
            .iter()
            .filter(|card| card.owner != Some(owner))
            .copied()
            .collect();
    }

    // === History ===

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    pub(crate) fn record(&mut self, action: Action) {
        let sequence = self.history.len() as u32;
        self.history.push_back(ActionRecord::new(action, self.round, sequence));
    }

    // === Accounting ===

    /// Cards in hands, summed over seats.
    #[must_use]
    pub fn cards_in_hands(&self) -> usize {
        self.players.values().map(|p| p.hand.len()).sum()
    }

    /// Deck + hands + discard; constant within a round.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.cards_in_hands() + self.discard.len()
    }

    /// New deck, empty hands, cleared round flags and effects.
    pub(crate) fn reset_round(&mut self) {
        self.deck = Deck::standard();
        self.discard.clear();
        self.effect_queue.clear();
        self.pending_effect = None;
        self.phase = Phase::Flip;
        for (_, player) in self.players.iter_mut() {
            player.reset_for_round();
        }
    }
}
