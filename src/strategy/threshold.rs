//! Draw-until-risky bot.

use super::Strategy;
use crate::cards::{CardFace, Deck, Hand};
use crate::core::{Action, ActionKind, Observation, PlayerId};
use crate::odds::bust_probability;

/// Draws while its bust estimate stays below `max_bust` and, optionally,
/// while its hand is worth less than `stop_at`.
///
/// Freeze goes to the strongest other live seat (banked score plus visible
/// hand). Flip three goes to the other live seat most likely to bust. When
/// no one else is left the bot has to pick itself.
#[derive(Clone, Debug)]
pub struct ThresholdStrategy {
    max_bust: f64,
    stop_at: Option<u32>,
    label: String,
}

impl ThresholdStrategy {
    #[must_use]
    pub fn new(max_bust: f64) -> Self {
        Self {
            max_bust,
            stop_at: None,
            label: format!("threshold-{max_bust}"),
        }
    }

    /// Also pass once the hand is worth `points`.
    #[must_use]
    pub fn stop_at(mut self, points: u32) -> Self {
        self.stop_at = Some(points);
        self.label = format!("threshold-{}-{points}", self.max_bust);
        self
    }

    /// Engine estimate when the observation carries one, otherwise an
    /// estimate against a full deck minus every card this seat can see.
    fn bust_estimate(obs: &Observation) -> f64 {
        if let Some(odds) = obs.own_bust_probability() {
            return odds;
        }

        let hand = Hand::from_faces(obs.own_hand.iter().map(|c| c.face));
        let mut deck = Deck::standard();
        let seen = obs
            .own_hand
            .iter()
            .chain(obs.other_hands.iter().flatten().flat_map(|(_, cards)| cards.iter()));
        for card in seen {
            deck.remove(card.face);
        }
        bust_probability(&hand, &deck, obs.players_still_playing)
    }

    fn choose_target(&self, obs: &Observation, targets: &[&Action]) -> Option<Action> {
        let me = obs.acting_player;
        let others: Vec<&Action> = targets.iter().copied().filter(|a| a.target != Some(me)).collect();
        if others.is_empty() {
            return targets.first().map(|a| (*a).clone());
        }

        let seat = |a: &Action| a.target.unwrap_or(me);
        let pick = match obs.extras.pending_effect.map(|c| c.face) {
            Some(CardFace::FlipThree) => others.iter().max_by(|a, b| {
                let (pa, pb) = (Self::bust_of(obs, seat(**a)), Self::bust_of(obs, seat(**b)));
                pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
            }),
            _ => others.iter().max_by_key(|a| Self::strength_of(obs, seat(**a))),
        };
        pick.map(|a| (*a).clone())
    }

    fn bust_of(obs: &Observation, seat: PlayerId) -> f64 {
        obs.extras
            .bust_probabilities
            .as_ref()
            .and_then(|odds| odds.get(seat).copied())
            .unwrap_or_else(|| obs.hand_sizes.get(seat).copied().unwrap_or(0) as f64 / 100.0)
    }

    fn strength_of(obs: &Observation, seat: PlayerId) -> u32 {
        let banked = obs.scores.get(seat).copied().unwrap_or(0);
        let hand = obs.hand_scores.get(seat).copied().flatten().unwrap_or(0);
        banked + hand
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl Strategy for ThresholdStrategy {
    fn choose_action(&mut self, obs: &Observation, legal: &[Action]) -> Option<Action> {
        let targets: Vec<&Action> = legal.iter().filter(|a| a.kind == ActionKind::ChoosePlayer).collect();
        if !targets.is_empty() {
            return self.choose_target(obs, &targets);
        }

        let draw = legal.iter().find(|a| a.kind == ActionKind::Draw);
        let pass = legal.iter().find(|a| a.kind == ActionKind::Pass);

        let hand = obs.hand_scores.get(obs.acting_player).copied().flatten().unwrap_or(0);
        let wants_more =
            Self::bust_estimate(obs) < self.max_bust && self.stop_at.map_or(true, |limit| hand < limit);

        let choice = if wants_more { draw.or(pass) } else { pass.or(draw) };
        choice.cloned()
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::{GameConfig, GameState, Phase};
    use crate::events::NullSink;
    use crate::rules::{Flip7, Flip7Builder, RulesEngine};
    use std::sync::Arc;

    fn table(names: &[&str]) -> (Flip7, GameState) {
        Flip7Builder::new()
            .players(names.iter().copied())
            .config(GameConfig::default().with_seed(21))
            .sink(Arc::new(NullSink))
            .build()
            .unwrap()
    }

    #[test]
    fn test_draws_on_empty_hand_and_passes_when_risky() {
        let (game, mut state) = table(&["A", "B"]);
        let me = PlayerId::new(0);
        let mut bot = ThresholdStrategy::new(0.2);

        let legal = game.legal_actions(&state, me);
        let choice = bot.choose_action(&game.observe(&state, me), &legal);
        assert_eq!(choice.map(|a| a.kind), Some(ActionKind::Draw));

        for n in [12, 11, 10] {
            state.player_mut(me).hand.push(Card::new(CardFace::Number(n)));
        }
        let choice = bot.choose_action(&game.observe(&state, me), &legal);
        assert_eq!(choice.map(|a| a.kind), Some(ActionKind::Pass));
    }

    #[test]
    fn test_stop_at_hand_value() {
        let (game, mut state) = table(&["A", "B"]);
        let me = PlayerId::new(0);
        state.player_mut(me).hand.push(Card::new(CardFace::Bonus(10)));
        let mut bot = ThresholdStrategy::new(1.0).stop_at(10);

        let legal = game.legal_actions(&state, me);
        let choice = bot.choose_action(&game.observe(&state, me), &legal);
        assert_eq!(choice.map(|a| a.kind), Some(ActionKind::Pass));
    }

    #[test]
    fn test_freeze_targets_leader() {
        let (game, mut state) = table(&["A", "B", "C"]);
        let me = PlayerId::new(0);
        state.player_mut(PlayerId::new(2)).score = 90;
        state.player_mut(PlayerId::new(1)).score = 30;
        state.deck = Deck::from_faces([CardFace::Freeze]);

        game.apply_action(&mut state, &Action::draw(me)).unwrap();
        assert_eq!(state.phase, Phase::EffectChoose);

        let legal = game.legal_actions(&state, me);
        let choice = ThresholdStrategy::default().choose_action(&game.observe(&state, me), &legal);
        assert_eq!(choice.and_then(|a| a.target), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_alone_targets_self() {
        let (game, mut state) = table(&["A", "B"]);
        let me = PlayerId::new(0);
        state.player_mut(PlayerId::new(1)).is_done = true;
        state.deck = Deck::from_faces([CardFace::FlipThree]);

        game.apply_action(&mut state, &Action::draw(me)).unwrap();
        let legal = game.legal_actions(&state, me);
        assert_eq!(legal.len(), 1);

        let choice = ThresholdStrategy::default().choose_action(&game.observe(&state, me), &legal);
        assert_eq!(choice.and_then(|a| a.target), Some(me));
    }

    #[test]
    fn test_estimate_without_engine_odds() {
        let (game, mut state) = Flip7Builder::new()
            .players(["A", "B"])
            .config(GameConfig::default().with_seed(2).with_probabilities(false))
            .sink(Arc::new(NullSink))
            .build()
            .unwrap();
        let me = PlayerId::new(0);
        state.player_mut(me).hand.push(Card::new(CardFace::Number(12)));

        let obs = game.observe(&state, me);
        assert!(obs.own_bust_probability().is_none());
        let estimate = ThresholdStrategy::bust_estimate(&obs);
        assert!((estimate - 11.0 / 93.0).abs() < 1e-12);
    }
}
