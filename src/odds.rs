//! Bust probability estimates.
//!
//! Pure functions of a hand, the remaining deck and the number of seats still
//! in the round. They never touch game state; the engine calls them to fill
//! observations and bots call them to decide whether to keep drawing.
//!
//! ## Approximation
//!
//! The Flip three term treats the three forced draws as independent trials
//! with the same match probability. The deck actually shrinks between draws
//! and the chain may turn up further effect or Second chance cards. Treat the
//! result as an estimate, not an exact probability.

use crate::cards::{CardFace, Deck, Hand};

/// Forced draws modelled by [`match_by_flip_three_probability`].
const FORCED_DRAWS: u32 = 3;

/// Chance that the next draw duplicates a number already in `hand`.
///
/// Returns 0 when the hand holds a Second chance while other seats are still
/// playing: the holder survives one match and would aim any Flip three
/// elsewhere. Also 0 for a hand without numbers or an empty deck.
#[must_use]
pub fn direct_match_probability(hand: &Hand, deck: &Deck, active_players: usize) -> f64 {
    if hand.contains(CardFace::SecondChance) && active_players > 1 {
        return 0.0;
    }
    let held = hand.number_mask();
    if held == 0 || deck.is_empty() {
        return 0.0;
    }

    let matching = deck.count_where(|card| card.face.number_bit().is_some_and(|bit| held & bit != 0));
    matching as f64 / deck.len() as f64
}

/// Chance of busting through a Flip three the holder must aim at themself.
///
/// Only the last seat in a round is forced to self-target, so this is 0
/// unless `active_players == 1`. The estimate is
/// `P(draw Flip three) * P(more matches than Second chances in 3 draws)`.
#[must_use]
pub fn match_by_flip_three_probability(hand: &Hand, deck: &Deck, active_players: usize) -> f64 {
    if active_players != 1 || deck.is_empty() {
        return 0.0;
    }
    let flip_threes = deck.count(CardFace::FlipThree);
    if flip_threes == 0 {
        return 0.0;
    }
    let p_get = flip_threes as f64 / deck.len() as f64;

    let mut rest = deck.clone();
    rest.remove(CardFace::FlipThree);
    let p = direct_match_probability(hand, &rest, active_players);
    let lives = hand.count(CardFace::SecondChance) as u32;

    p_get * binomial_tail(FORCED_DRAWS, p, lives + 1)
}

/// Chance the next decision ends in a bust: a direct match plus the forced
/// Flip three chain when the holder is alone.
///
/// Always in `[0, 1]`.
#[must_use]
pub fn bust_probability(hand: &Hand, deck: &Deck, active_players: usize) -> f64 {
    let total = direct_match_probability(hand, deck, active_players)
        + match_by_flip_three_probability(hand, deck, active_players);
    total.clamp(0.0, 1.0)
}

/// `P(X >= k)` for `X ~ Binomial(n, p)`.
fn binomial_tail(n: u32, p: f64, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let q = 1.0 - p;
    (k..=n)
        .map(|i| binomial(n, i) as f64 * p.powi(i as i32) * q.powi((n - i) as i32))
        .sum()
}

fn binomial(n: u32, k: u32) -> u64 {
    (0..k).fold(1u64, |acc, i| acc * u64::from(n - i) / u64::from(i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardFace::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_binomial_tail_matches_closed_forms() {
        let p = 0.3;
        let q = 1.0 - p;
        assert!((binomial_tail(3, p, 1) - (1.0 - q.powi(3))).abs() < EPS);
        assert!((binomial_tail(3, p, 2) - (3.0 * p * p * q + p.powi(3))).abs() < EPS);
        assert!((binomial_tail(3, p, 3) - p.powi(3)).abs() < EPS);
        assert_eq!(binomial_tail(3, p, 4), 0.0);
    }

    #[test]
    fn test_direct_match_counts_held_values() {
        let hand = Hand::from_faces([Number(3), Number(5)]);
        let deck = Deck::standard();

        let expected = (3.0 + 5.0) / 94.0;
        assert!((direct_match_probability(&hand, &deck, 3) - expected).abs() < EPS);
    }

    #[test]
    fn test_second_chance_shields_with_company() {
        let hand = Hand::from_faces([Number(12), SecondChance]);
        let deck = Deck::standard();

        assert_eq!(direct_match_probability(&hand, &deck, 2), 0.0);
        assert!(direct_match_probability(&hand, &deck, 1) > 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let deck = Deck::standard();
        assert_eq!(direct_match_probability(&Hand::new(), &deck, 1), 0.0);

        let hand = Hand::from_faces([Number(4)]);
        assert_eq!(direct_match_probability(&hand, &Deck::new(), 1), 0.0);
        assert_eq!(bust_probability(&hand, &Deck::new(), 1), 0.0);
    }

    #[test]
    fn test_flip_three_term_only_when_alone() {
        let hand = Hand::from_faces([Number(4)]);
        let deck = Deck::from_faces([Number(4), Number(4), FlipThree, Number(9)]);

        assert_eq!(match_by_flip_three_probability(&hand, &deck, 2), 0.0);

        // p_get = 1/4, then p = 2/3 on the remaining three cards.
        let p: f64 = 2.0 / 3.0;
        let expected = 0.25 * (1.0 - (1.0 - p).powi(3));
        assert!((match_by_flip_three_probability(&hand, &deck, 1) - expected).abs() < EPS);
    }

    #[test]
    fn test_no_flip_three_in_deck() {
        let hand = Hand::from_faces([Number(4)]);
        let deck = Deck::from_faces([Number(4), Freeze]);
        assert_eq!(match_by_flip_three_probability(&hand, &deck, 1), 0.0);
    }

    #[test]
    fn test_second_chances_count_as_lives() {
        let deck = Deck::from_faces([Number(4), Number(4), FlipThree, Number(9)]);
        let p: f64 = 2.0 / 3.0;

        let one_life = Hand::from_faces([Number(4), SecondChance]);
        let expected = 0.25 * (3.0 * p * p * (1.0 - p) + p.powi(3));
        assert!((match_by_flip_three_probability(&one_life, &deck, 1) - expected).abs() < EPS);

        let three_lives = Hand::from_faces([Number(4), SecondChance, SecondChance, SecondChance]);
        assert_eq!(match_by_flip_three_probability(&three_lives, &deck, 1), 0.0);
    }
}
