//! A player's hand for the current round.

use smallvec::SmallVec;

use super::card::{Card, CardFace};

/// Cards held by one player this round.
///
/// SmallVec keeps typical hands (well under 16 cards) off the heap.
#[derive(Clone, Debug, Default)]
pub struct Hand {
    cards: SmallVec<[Card; 16]>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from faces, mostly for tests and tools.
    pub fn from_faces(faces: impl IntoIterator<Item = CardFace>) -> Self {
        Self {
            cards: faces.into_iter().map(Card::new).collect(),
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove one card equal to `face`, keeping the order of the rest.
    pub fn remove(&mut self, face: CardFace) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c.face == face)?;
        Some(self.cards.remove(idx))
    }

    #[must_use]
    pub fn contains(&self, face: CardFace) -> bool {
        self.cards.iter().any(|c| c.face == face)
    }

    #[must_use]
    pub fn count(&self, face: CardFace) -> usize {
        self.cards.iter().filter(|c| c.face == face).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Numbers on the numbered cards, in draw order.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.cards.iter().filter_map(|c| c.face.number())
    }

    /// Count of numbered cards.
    #[must_use]
    pub fn number_count(&self) -> usize {
        self.numbers().count()
    }

    /// Bit `n` is set when a numbered card `n` is held. Numbers outside the
    /// deck's range have no bit.
    #[must_use]
    pub fn number_mask(&self) -> u16 {
        self.cards
            .iter()
            .filter_map(|c| c.face.number_bit())
            .fold(0, |mask, bit| mask | bit)
    }

    /// Two numbered cards share a value.
    #[must_use]
    pub fn has_duplicate(&self) -> bool {
        let mut seen = 0u16;
        for (i, card) in self.cards.iter().enumerate() {
            match card.face.number_bit() {
                Some(bit) if seen & bit != 0 => return true,
                Some(bit) => seen |= bit,
                None if card.face.is_number() => {
                    if self.cards[i + 1..].iter().any(|c| c.face == card.face) {
                        return true;
                    }
                }
                None => {}
            }
        }
        false
    }
}

impl std::fmt::Display for Hand {
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
