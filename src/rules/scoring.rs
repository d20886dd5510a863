//! Hand scoring.

use crate::cards::{CardFace, Hand};

/// Numbered cards needed for the seven-card bonus.
pub const SEVEN: usize = 7;

/// Points a hand is worth if the round ended now.
///
/// A hand holding two equal numbers is worth nothing. Otherwise the numbers
/// and `+N` cards are summed, `seven_card_bonus` is added for exactly seven
/// numbers, and the total is doubled once when the hand holds the x2.
///
/// ```
/// use flip_seven::cards::{CardFace, Hand};
/// use flip_seven::rules::hand_score;
///
/// let hand = Hand::from_faces([CardFace::Number(9), CardFace::Bonus(4), CardFace::TimesTwo]);
/// assert_eq!(hand_score(&hand, 15), 26);
/// ```
#[must_use]
pub fn hand_score(hand: &Hand, seven_card_bonus: u32) -> u32 {
    if hand.has_duplicate() {
        return 0;
    }

    let mut total = if hand.number_count() == SEVEN {
        seven_card_bonus
    } else {
        0
    };
    total += hand.iter().filter_map(|card| card.face.points()).sum::<u32>();

    if hand.contains(CardFace::TimesTwo) {
        total *= 2;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardFace::*;

    #[test]
    fn test_empty_hand() {
        assert_eq!(hand_score(&Hand::new(), 15), 0);
    }

    #[test]
    fn test_duplicate_scores_zero() {
        let hand = Hand::from_faces([Number(12), Number(12), Bonus(10), TimesTwo]);
        assert_eq!(hand_score(&hand, 15), 0);
    }

    #[test]
    fn test_effects_are_worthless() {
        let hand = Hand::from_faces([Number(3), Freeze, FlipThree, SecondChance]);
        assert_eq!(hand_score(&hand, 15), 3);
    }

    #[test]
    fn test_seven_numbers_with_multiplier() {
        let hand = Hand::from_faces([
            Number(0),
            Number(1),
            Number(2),
            Number(3),
            Number(4),
            Number(5),
            Number(6),
            Bonus(4),
            TimesTwo,
        ]);
        assert_eq!(hand_score(&hand, 15), (15 + 21 + 4) * 2);
    }

    #[test]
    fn test_bonus_configurable() {
        let hand = Hand::from_faces((1..=7).map(Number));
        assert_eq!(hand_score(&hand, 0), 28);
        assert_eq!(hand_score(&hand, 20), 48);
    }
}
