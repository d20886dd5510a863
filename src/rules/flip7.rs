//! The Flip Seven state machine.
//!
//! `Flip7` holds the rule settings and the event sink; all mutable data lives
//! in `GameState`. A driver alternates between asking `legal_actions` for the
//! active seat, submitting one of them with `apply_action`, and calling
//! `advance_turn` whenever the table is back in the flip phase.
//!
//! ## Draw resolution
//!
//! 1. A random card leaves the deck, is tagged with the drawer and joins
//!    their hand.
//! 2. A duplicate number is absorbed by a Second chance (both cards go to the
//!    discard pile) or busts the drawer.
//! 3. Seven numbers end the drawer's round with the Flip 7 flag.
//! 4. Freeze and Flip three go onto the effect queue. Outside a forced chain
//!    the queue is advanced at once.
//!
//! A Flip three runs step 1-4 against its target up to three times with the
//! queue frozen, then advances the queue.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::engine::{GameResult, RulesEngine};
use super::scoring::{hand_score, SEVEN};
use crate::cards::{Card, CardFace};
use crate::core::{
    Action, ActionKind, ConfigError, GameConfig, GameState, Observation, ObservationExtras, Phase,
    PlayerId, PlayerMap, PlayerStatus, RulesError, MAX_PLAYERS,
};
use crate::events::{EventSink, GameEvent, LogSink, Seat};
use crate::odds::bust_probability;

/// Names used when a table is opened without any.
pub const DEFAULT_ROSTER: [&str; 5] = ["Elias", "Eloise", "Jules", "Mina", "Theo"];

/// Scores at the end of one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    /// Points banked this round.
    pub hand_scores: PlayerMap<u32>,
    /// Cumulative scores after banking.
    pub totals: PlayerMap<u32>,
    pub statuses: PlayerMap<Option<PlayerStatus>>,
    /// True when this round pushed someone to the target score.
    pub game_over: bool,
}

/// Flip Seven rules engine.
#[derive(Clone)]
pub struct Flip7 {
    config: GameConfig,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Flip7 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flip7").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Builder for a table and its opening state.
pub struct Flip7Builder {
    names: Vec<String>,
    config: GameConfig,
    sink: Option<Arc<dyn EventSink>>,
}

impl Default for Flip7Builder {
    fn default() -> Self {
        Self {
            names: DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect(),
            config: GameConfig::default(),
            sink: None,
        }
    }
}

impl Flip7Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat names in turn order.
    pub fn players<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Where events go. Defaults to [`LogSink`].
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the engine and the opening state.
    ///
    /// The deck is seeded from `config.seed`, or from entropy when unset.
    pub fn build(self) -> Result<(Flip7, GameState), ConfigError> {
        self.config.validate()?;
        if self.names.is_empty() || self.names.len() > MAX_PLAYERS {
            return Err(ConfigError::Invalid(format!(
                "a table seats 1 to {MAX_PLAYERS} players, got {}",
                self.names.len()
            )));
        }
        if self.names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid("player names must not be empty".into()));
        }
        for (i, name) in self.names.iter().enumerate() {
            if self.names[..i].contains(name) {
                return Err(ConfigError::Invalid(format!("player name {name:?} is used twice")));
            }
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let state = GameState::new(&self.names, seed);
        let game = Flip7::new(self.config, self.sink.unwrap_or_else(|| Arc::new(LogSink)));

        game.emit(GameEvent::RoundStarted {
            round: state.round,
            starter: seat(&state, state.turn_player),
        });
        Ok((game, state))
    }
}

fn seat(state: &GameState, id: PlayerId) -> Seat {
    Seat {
        id,
        name: state.player(id).name.clone(),
    }
}

impl Flip7 {
    pub fn new(config: GameConfig, sink: Arc<dyn EventSink>) -> Self {
        Self { config, sink }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn emit(&self, event: GameEvent) {
        self.sink.emit(&event);
    }

    // === Queries ===

    /// Seat with the highest cumulative score; ties go to the lowest seat.
    #[must_use]
    pub fn leader(&self, state: &GameState) -> PlayerId {
        let mut best = PlayerId::new(0);
        for (id, player) in state.players().iter() {
            if player.score > state.player(best).score {
                best = id;
            }
        }
        best
    }

    /// What `player`'s hand is worth right now.
    #[must_use]
    pub fn hand_score(&self, state: &GameState, player: PlayerId) -> u32 {
        state
            .get_player(player)
            .map_or(0, |p| hand_score(&p.hand, self.config.seven_card_bonus))
    }

    /// Bust estimate per seat; seats that are done get 0.
    #[must_use]
    pub fn bust_probabilities(&self, state: &GameState) -> PlayerMap<f64> {
        let active = state.players_still_playing();
        state.players().map(|_, player| {
            if player.is_done {
                0.0
            } else {
                bust_probability(&player.hand, &state.deck, active)
            }
        })
    }

    /// Snapshot of the table for `player`.
    #[must_use]
    pub fn observe(&self, state: &GameState, player: PlayerId) -> Observation {
        let open = self.config.open_hands;
        let players = state.players();

        let other_hands: Option<Vec<(PlayerId, Vec<Card>)>> = open.then(|| {
            players
                .iter()
                .filter(|(id, _)| *id != player)
                .map(|(id, p)| (id, p.hand.cards().to_vec()))
                .collect()
        });

        let extras = ObservationExtras {
            effects_to_resolve: state.effect_queue().iter().copied().collect(),
            effect_owners: state.effect_queue().iter().filter_map(|card| card.owner).collect(),
            pending_effect: state.pending_effect().copied(),
            pending_effect_owner: state.pending_effect_owner(),
            bust_probabilities: self
                .config
                .show_probabilities
                .then(|| self.bust_probabilities(state)),
        };

        Observation {
            acting_player: player,
            turn_player: state.turn_player,
            leading_player: self.leader(state),
            players_still_playing: state.players_still_playing(),
            phase: state.phase,
            round: state.round,
            scores: players.map(|_, p| p.score),
            done: players.map(|_, p| p.is_done),
            statuses: players.map(|_, p| p.status),
            names: players.map(|_, p| p.name.clone()),
            hand_sizes: players.map(|_, p| p.hand.len()),
            hand_scores: players.map(|id, p| {
                (open || id == player).then(|| hand_score(&p.hand, self.config.seven_card_bonus))
            }),
            deck_size: state.deck.len(),
            own_hand: state
                .get_player(player)
                .map(|p| p.hand.cards().to_vec())
                .unwrap_or_default(),
            open_hands: open,
            other_hands,
            extras,
        }
    }

    // === Turn and round flow ===

    /// Move play along once the table is back in the flip phase.
    ///
    /// When everyone is done the round is scored (see [`Flip7::finish_round`])
    /// and its summary returned. Otherwise the turn passes to the next seat
    /// that is still playing. Does nothing mid-effect or after the game ends.
    pub fn advance_turn(&self, state: &mut GameState) -> Option<RoundSummary> {
        if state.game_over || state.phase != Phase::Flip {
            return None;
        }
        if state.everyone_done() {
            return Some(self.finish_round(state));
        }

        let n = state.player_count();
        let mut next = state.turn_player.next(n);
        while state.player(next).is_done {
            next = next.next(n);
        }
        state.turn_player = next;
        state.active_player = next;
        None
    }

    /// Bank every hand, then either end the game or deal a new round.
    ///
    /// The game ends as soon as any cumulative score reaches `max_score`; the
    /// final hands are left on the table. Otherwise round `r + 1` is opened by
    /// seat `r % n`.
    pub fn finish_round(&self, state: &mut GameState) -> RoundSummary {
        let bonus = self.config.seven_card_bonus;
        let hand_scores = state.players().map(|_, p| hand_score(&p.hand, bonus));
        for (id, player) in state.players_mut().iter_mut() {
            player.score += hand_scores[id];
        }

        let totals = state.players().map(|_, p| p.score);
        let game_over = totals.values().any(|&score| score >= self.config.max_score);
        let summary = RoundSummary {
            round: state.round,
            hand_scores,
            totals,
            statuses: state.players().map(|_, p| p.status),
            game_over,
        };

        self.emit(GameEvent::RoundScored {
            round: summary.round,
            scores: state
                .players()
                .iter()
                .map(|(id, p)| (seat(state, id), summary.hand_scores[id], p.score))
                .collect(),
        });

        if game_over {
            state.game_over = true;
            let winner = self.leader(state);
            self.emit(GameEvent::GameOver {
                winner: seat(state, winner),
                score: state.player(winner).score,
            });
        } else {
            state.reset_round();
            let starter = PlayerId::new((state.round as usize % state.player_count()) as u8);
            state.turn_player = starter;
            state.active_player = starter;
            state.round += 1;
            self.emit(GameEvent::RoundStarted {
                round: state.round,
                starter: seat(state, starter),
            });
        }
        summary
    }

    // === Resolution ===

    fn end_round_for(&self, state: &mut GameState, player: PlayerId, status: PlayerStatus) {
        let p = state.player_mut(player);
        p.is_done = true;
        p.status = Some(status);
        state.purge_effects_of(player);
        self.emit(GameEvent::RoundOverFor {
            who: seat(state, player),
        });
    }

    /// Steps 1-4 of a draw for `player`.
    fn resolve_draw(&self, state: &mut GameState, player: PlayerId, forced: bool) -> Result<(), RulesError> {
        let bust_odds = bust_probability(&state.player(player).hand, &state.deck, state.players_still_playing());
        let card = state
            .deck
            .draw(&mut state.rng)
            .ok_or(RulesError::DeckExhausted)?
            .owned_by(player);
        state.player_mut(player).hand.push(card);
        self.emit(GameEvent::Drew {
            who: seat(state, player),
            card,
            forced,
            bust_odds,
        });

        if state.player(player).hand.has_duplicate() {
            if !state.player(player).hand.contains(CardFace::SecondChance) {
                self.emit(GameEvent::Busted {
                    who: seat(state, player),
                    card,
                });
                self.end_round_for(state, player, PlayerStatus::Busted);
                return Ok(());
            }

            let hand = &mut state.player_mut(player).hand;
            let spent = [hand.remove(CardFace::SecondChance), hand.remove(card.face)];
            state.discard.extend(spent.into_iter().flatten());
            self.emit(GameEvent::SecondChanceUsed {
                who: seat(state, player),
                card,
            });
        }

        if state.player(player).hand.number_count() == SEVEN {
            self.emit(GameEvent::FlippedSeven {
                who: seat(state, player),
            });
            self.end_round_for(state, player, PlayerStatus::FlippedSeven);
            return Ok(());
        }

        if card.is_effect() {
            state.enqueue_effect(card);
            self.emit(GameEvent::EffectQueued {
                who: seat(state, player),
                card,
            });
            if !forced {
                self.advance_effects(state);
            }
        }
        Ok(())
    }

    /// Flip three against `target`: forced draws, then the queue moves on.
    fn forced_chain(&self, state: &mut GameState, target: PlayerId) -> Result<(), RulesError> {
        for _ in 0..self.config.flip_three_draws {
            if state.player(target).is_done || state.deck.is_empty() {
                break;
            }
            self.resolve_draw(state, target, true)?;
        }
        if !state.player(target).is_done {
            self.emit(GameEvent::FlipThreeSurvived {
                target: seat(state, target),
            });
        }
        self.advance_effects(state);
        Ok(())
    }

    /// Pop the next queued effect, or hand control back to the turn player.
    fn advance_effects(&self, state: &mut GameState) {
        match state.pop_effect() {
            Some(card) => {
                let owner = card.owner.unwrap_or(state.turn_player);
                state.set_pending_effect(Some(card));
                state.phase = Phase::EffectChoose;
                state.active_player = owner;
                self.emit(GameEvent::EffectPending {
                    owner: seat(state, owner),
                    card,
                });
            }
            None => {
                state.set_pending_effect(None);
                state.phase = Phase::Flip;
                state.active_player = state.turn_player;
            }
        }
    }

    fn resolve_effect(&self, state: &mut GameState, effect: Card, target: PlayerId) -> Result<(), RulesError> {
        let by = effect.owner.unwrap_or(state.turn_player);
        match effect.face {
            CardFace::Freeze => {
                self.emit(GameEvent::Frozen {
                    target: seat(state, target),
                    by: seat(state, by),
                });
                self.end_round_for(state, target, PlayerStatus::Frozen);
                self.advance_effects(state);
                Ok(())
            }
            CardFace::FlipThree => {
                self.emit(GameEvent::FlipThree {
                    target: seat(state, target),
                    by: seat(state, by),
                });
                self.forced_chain(state, target)
            }
            _ => {
                self.advance_effects(state);
                Ok(())
            }
        }
    }

    fn check_flip(&self, state: &GameState, action: &Action) -> Result<(), RulesError> {
        if !matches!(action.kind, ActionKind::Draw | ActionKind::Pass) {
            return Err(RulesError::IllegalActionForPhase {
                kind: action.kind,
                phase: state.phase,
            });
        }
        if action.actor != state.turn_player || state.player(action.actor).is_done {
            return Err(RulesError::UnauthorizedActor {
                actor: action.actor,
                phase: state.phase,
            });
        }
        if action.kind == ActionKind::Draw && state.deck.is_empty() {
            return Err(RulesError::DeckExhausted);
        }
        Ok(())
    }

    fn check_choose(&self, state: &GameState, action: &Action) -> Result<(Card, PlayerId), RulesError> {
        if action.kind != ActionKind::ChoosePlayer {
            return Err(RulesError::IllegalActionForPhase {
                kind: action.kind,
                phase: state.phase,
            });
        }
        let effect = state.pending_effect().copied().ok_or(RulesError::NoPendingEffect)?;
        if effect.owner != Some(action.actor) {
            return Err(RulesError::UnauthorizedActor {
                actor: action.actor,
                phase: state.phase,
            });
        }
        let target = action.target.ok_or(RulesError::MissingTarget)?;
        match state.get_player(target) {
            Some(player) if !player.is_done => Ok((effect, target)),
            _ => Err(RulesError::InvalidTarget(target)),
        }
    }
}

impl RulesEngine for Flip7 {
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        if state.game_over || state.everyone_done() {
            return vec![];
        }
        match state.get_player(player) {
            Some(p) if !p.is_done => {}
            _ => return vec![],
        }

        match state.phase {
            Phase::Flip => {
                if player != state.turn_player {
                    return vec![];
                }
                let mut actions = Vec::with_capacity(2);
                if !state.deck.is_empty() {
                    actions.push(Action::draw(player));
                }
                actions.push(Action::pass(player));
                actions
            }
            Phase::EffectChoose => {
                if state.pending_effect_owner() != Some(player) {
                    return vec![];
                }
                state
                    .players_not_done()
                    .into_iter()
                    .map(|target| Action::choose_player(player, target))
                    .collect()
            }
        }
    }

    fn apply_action(&self, state: &mut GameState, action: &Action) -> Result<(), RulesError> {
        if state.game_over {
            return Err(RulesError::GameOver);
        }
        if !state.players().contains(action.actor) {
            return Err(RulesError::UnknownPlayer(action.actor));
        }

        match state.phase {
            Phase::Flip => {
                self.check_flip(state, action)?;
                state.record(action.clone());
                if action.kind == ActionKind::Draw {
                    self.resolve_draw(state, action.actor, false)
                } else {
                    self.emit(GameEvent::Passed {
                        who: seat(state, action.actor),
                    });
                    self.end_round_for(state, action.actor, PlayerStatus::Passed);
                    Ok(())
                }
            }
            Phase::EffectChoose => {
                let (effect, target) = self.check_choose(state, action)?;
                state.record(action.clone());
                state.set_pending_effect(None);
                self.resolve_effect(state, effect, target)
            }
        }
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !state.game_over {
            return None;
        }
        let top = state.players().values().map(|p| p.score).max()?;
        let mut winners: Vec<PlayerId> = state
            .players()
            .iter()
            .filter(|(_, p)| p.score == top)
            .map(|(id, _)| id)
            .collect();

        if winners.len() == 1 {
            winners.pop().map(GameResult::Winner)
        } else {
            Some(GameResult::Winners(winners))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Deck;
    use crate::events::NullSink;

    fn table(n: usize) -> (Flip7, GameState) {
        Flip7Builder::new()
            .players((0..n).map(|i| format!("P{i}")))
            .config(GameConfig::default().with_seed(5))
            .sink(Arc::new(NullSink))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_rejects_bad_tables() {
        let empty: Vec<String> = vec![];
        assert!(Flip7Builder::new().players(empty).build().is_err());
        assert!(Flip7Builder::new().players((0..13).map(|i| i.to_string())).build().is_err());
        assert!(Flip7Builder::new().players(["Ann", " "]).build().is_err());
        assert!(matches!(
            Flip7Builder::new().players(["Ann", "Bob", "Ann"]).build(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_default_roster() {
        let (_, state) = Flip7Builder::new().sink(Arc::new(NullSink)).build().unwrap();
        assert_eq!(state.player_count(), 5);
        assert_eq!(state.player(PlayerId::new(4)).name, "Theo");
    }

    #[test]
    fn test_leader_ties_go_to_lowest_seat() {
        let (game, mut state) = table(3);
        state.player_mut(PlayerId::new(1)).score = 40;
        state.player_mut(PlayerId::new(2)).score = 40;
        assert_eq!(game.leader(&state), PlayerId::new(1));
    }

    #[test]
    fn test_advance_turn_skips_done_seats() {
        let (game, mut state) = table(3);
        state.player_mut(PlayerId::new(1)).is_done = true;

        assert!(game.advance_turn(&mut state).is_none());
        assert_eq!(state.turn_player, PlayerId::new(2));
        assert!(game.advance_turn(&mut state).is_none());
        assert_eq!(state.turn_player, PlayerId::new(0));
        assert_eq!(state.active_player, PlayerId::new(0));
    }

    #[test]
    fn test_finish_round_rotates_starter() {
        let (game, mut state) = table(3);

        let summary = game.finish_round(&mut state);
        assert_eq!(summary.round, 1);
        assert!(!summary.game_over);
        assert_eq!(state.round, 2);
        assert_eq!(state.turn_player, PlayerId::new(1));

        game.finish_round(&mut state);
        assert_eq!(state.turn_player, PlayerId::new(2));
    }

    #[test]
    fn test_draw_not_offered_from_empty_deck() {
        let (game, mut state) = table(2);
        state.deck = Deck::new();

        let legal = game.legal_actions(&state, PlayerId::new(0));
        assert_eq!(legal, vec![Action::pass(PlayerId::new(0))]);
        assert_eq!(
            game.apply_action(&mut state, &Action::draw(PlayerId::new(0))),
            Err(RulesError::DeckExhausted)
        );
    }

    #[test]
    fn test_observe_hides_hands() {
        let (game, mut state) = table(2);
        state.player_mut(PlayerId::new(1)).hand.push(Card::new(CardFace::Number(8)));

        let obs = game.observe(&state, PlayerId::new(0));
        assert!(obs.other_hands.is_none());
        assert_eq!(obs.hand_scores[PlayerId::new(1)], None);
        assert_eq!(obs.hand_scores[PlayerId::new(0)], Some(0));
        assert_eq!(obs.hand_sizes[PlayerId::new(1)], 1);
        assert!(obs.extras.bust_probabilities.is_some());
    }
}
