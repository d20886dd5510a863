//! The draw pile: an unordered multiset of cards.
//!
//! There is no "top" card. Every draw picks uniformly among the remaining
//! cards, so the deck never exposes positions.

use rustc_hash::FxHashMap;

use super::card::{Card, CardFace};
use crate::core::rng::GameRng;

/// Number of cards produced by [`Deck::standard`].
pub const STANDARD_DECK_SIZE: usize = 94;

/// Unordered multiset of cards with random draw without replacement.
#[derive(Clone, Debug, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh round deck.
    ///
    /// Numbers 0..=12 with `max(n, 1)` copies each, three each of Freeze,
    /// Flip three and Second chance, one x2, and one each of +2 to +10.
    #[must_use]
    pub fn standard() -> Self {
        let mut deck = Deck::new();
        for n in 0..=CardFace::MAX_NUMBER {
            deck.add(CardFace::Number(n), usize::from(n.max(1)));
        }
        deck.add(CardFace::Freeze, 3);
        deck.add(CardFace::FlipThree, 3);
        deck.add(CardFace::SecondChance, 3);
        deck.add(CardFace::TimesTwo, 1);
        for bonus in (2..=10).step_by(2) {
            deck.add(CardFace::Bonus(bonus), 1);
        }
        deck
    }

    /// Build a deck holding exactly the given faces.
    pub fn from_faces(faces: impl IntoIterator<Item = CardFace>) -> Self {
        faces.into_iter().map(Card::new).collect()
    }

    /// Add `copies` fresh copies of a face.
    pub fn add(&mut self, face: CardFace, copies: usize) {
        self.cards.extend(std::iter::repeat(Card::new(face)).take(copies));
    }

    /// Put a card (back) into the deck.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remove and return a uniformly random card.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.gen_index(self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    /// Look at a uniformly random card without removing it.
    #[must_use]
    pub fn peek(&self, rng: &mut GameRng) -> Option<&Card> {
        rng.choose(&self.cards)
    }

    /// Remove one card equal to `face`.
    pub fn remove(&mut self, face: CardFace) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c.face == face)?;
        Some(self.cards.swap_remove(idx))
    }

    /// Number of copies of `face` left.
    #[must_use]
    pub fn count(&self, face: CardFace) -> usize {
        self.count_where(|c| c.face == face)
    }

    /// Number of cards matching a predicate.
    pub fn count_where(&self, pred: impl Fn(&Card) -> bool) -> usize {
        self.cards.iter().filter(|c| pred(c)).count()
    }

    #[must_use]
    pub fn contains(&self, face: CardFace) -> bool {
        self.cards.iter().any(|c| c.face == face)
    }

    /// Numbered cards.
    pub fn normal_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| !c.is_special())
    }

    /// Everything that is not a numbered card.
    pub fn special_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_special())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Multiset view: copies per face.
    #[must_use]
    pub fn face_counts(&self) -> FxHashMap<CardFace, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(card.face).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl Extend<Card> for Deck {
    fn extend<I: IntoIterator<Item = Card>>(&mut self, iter: I) {
        self.cards.extend(iter);
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_composition() {
        let deck = Deck::standard();

        assert_eq!(deck.len(), STANDARD_DECK_SIZE);
        assert_eq!(deck.normal_cards().count(), 79);
        assert_eq!(deck.special_cards().count(), 15);
        assert_eq!(deck.count(CardFace::Number(0)), 1);
        assert_eq!(deck.count(CardFace::Number(1)), 1);
        assert_eq!(deck.count(CardFace::Number(12)), 12);
        assert_eq!(deck.count(CardFace::Freeze), 3);
        assert_eq!(deck.count(CardFace::FlipThree), 3);
        assert_eq!(deck.count(CardFace::SecondChance), 3);
        assert_eq!(deck.count(CardFace::TimesTwo), 1);
        assert_eq!(deck.count(CardFace::Bonus(10)), 1);
    }

    #[test]
    fn test_draw_without_replacement() {
        let mut deck = Deck::standard();
        let before = deck.face_counts();
        let mut rng = GameRng::new(5);

        let mut drawn = Vec::new();
        while let Some(card) = deck.draw(&mut rng) {
            drawn.push(card);
        }

        assert!(deck.is_empty());
        assert_eq!(drawn.len(), STANDARD_DECK_SIZE);
        let redrawn: Deck = drawn.into_iter().collect();
        assert_eq!(redrawn.face_counts(), before);
    }

    #[test]
    fn test_draw_from_empty() {
        let mut deck = Deck::new();
        let mut rng = GameRng::new(1);
        assert!(deck.draw(&mut rng).is_none());
        assert!(deck.peek(&mut rng).is_none());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let deck = Deck::from_faces([CardFace::Freeze, CardFace::Number(4)]);
        let mut rng = GameRng::new(9);

        let seen = deck.peek(&mut rng).copied();
        assert!(seen.is_some());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_remove_by_value() {
        let mut deck = Deck::from_faces([CardFace::Number(3), CardFace::FlipThree, CardFace::Number(3)]);

        assert!(deck.remove(CardFace::FlipThree).is_some());
        assert!(deck.remove(CardFace::FlipThree).is_none());
        assert_eq!(deck.count(CardFace::Number(3)), 2);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_display() {
        let deck = Deck::from_faces([CardFace::Number(3), CardFace::TimesTwo]);
        assert_eq!(deck.to_string(), "3, x2");
    }
}
