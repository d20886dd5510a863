//! Card faces and card values.
//!
//! A card is its face plus an owner tag. Two cards are equal when their faces
//! are equal; the owner is bookkeeping for effect purging and never takes part
//! in comparisons.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::core::player::PlayerId;

/// What is printed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawFace")]
pub enum CardFace {
    /// Numbered card, 0 through 12.
    Number(u8),
    /// Ends the chosen target's round.
    Freeze,
    /// Forces the chosen target through three draws.
    FlipThree,
    /// Absorbs one duplicate-number bust.
    SecondChance,
    /// Doubles the hand total.
    TimesTwo,
    /// Adds a flat bonus (+2 .. +10).
    Bonus(u8),
}

impl CardFace {
    /// Highest numbered card in the deck.
    pub const MAX_NUMBER: u8 = 12;

    /// Numbered ("normal") card.
    #[must_use]
    pub fn is_number(self) -> bool {
        matches!(self, CardFace::Number(_))
    }

    /// Anything that is not a numbered card.
    #[must_use]
    pub fn is_special(self) -> bool {
        !self.is_number()
    }

    /// Cards that put an effect on the queue when drawn.
    #[must_use]
    pub fn is_effect(self) -> bool {
        matches!(self, CardFace::Freeze | CardFace::FlipThree)
    }

    /// The number on a numbered card.
    #[must_use]
    pub fn number(self) -> Option<u8> {
        match self {
            CardFace::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Bit `n` of a number mask, for numbers 0 through [`Self::MAX_NUMBER`].
    #[must_use]
    pub fn number_bit(self) -> Option<u16> {
        self.number()
            .filter(|&n| n <= Self::MAX_NUMBER)
            .map(|n| 1 << n)
    }

    /// Points this card adds to a hand total, if any.
    #[must_use]
    pub fn points(self) -> Option<u32> {
        match self {
            CardFace::Number(n) | CardFace::Bonus(n) => Some(u32::from(n)),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardFace::Number(n) => write!(f, "{n}"),
            CardFace::Freeze => f.write_str("Freeze"),
            CardFace::FlipThree => f.write_str("Flip three"),
            CardFace::SecondChance => f.write_str("Second chance"),
            CardFace::TimesTwo => f.write_str("x2"),
            CardFace::Bonus(n) => write!(f, "+{n}"),
        }
    }
}

/// Failure to read a card face from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised card '{0}'")]
pub struct ParseCardError(pub String);

impl FromStr for CardFace {
    type Err = ParseCardError;

    /// Accepts the display strings (`7`, `+4`, `x2`, `Freeze`, `Flip three`,
    /// `Second chance`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let face = match lower.as_str() {
            "freeze" => CardFace::Freeze,
            "flip three" | "flip3" | "flip-three" => CardFace::FlipThree,
            "second chance" | "second-chance" => CardFace::SecondChance,
            "x2" => CardFace::TimesTwo,
            other => {
                if let Some(bonus) = other.strip_prefix('+') {
                    bonus
                        .parse()
                        .map(CardFace::Bonus)
                        .map_err(|_| ParseCardError(trimmed.to_string()))?
                } else {
                    match other.parse::<u8>() {
                        Ok(n) if n <= CardFace::MAX_NUMBER => CardFace::Number(n),
                        _ => return Err(ParseCardError(trimmed.to_string())),
                    }
                }
            }
        };
        Ok(face)
    }
}

/// Wire form of [`CardFace`]; numbers are range-checked on the way in.
#[derive(Deserialize)]
#[serde(rename = "CardFace")]
enum RawFace {
    Number(u8),
    Freeze,
    FlipThree,
    SecondChance,
    TimesTwo,
    Bonus(u8),
}

impl TryFrom<RawFace> for CardFace {
    type Error = ParseCardError;

    fn try_from(raw: RawFace) -> Result<Self, Self::Error> {
        Ok(match raw {
            RawFace::Number(n) if n <= CardFace::MAX_NUMBER => CardFace::Number(n),
            RawFace::Number(n) => return Err(ParseCardError(n.to_string())),
            RawFace::Freeze => CardFace::Freeze,
            RawFace::FlipThree => CardFace::FlipThree,
            RawFace::SecondChance => CardFace::SecondChance,
            RawFace::TimesTwo => CardFace::TimesTwo,
            RawFace::Bonus(n) => CardFace::Bonus(n),
        })
    }
}

/// A physical card: face plus the seat that drew it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    /// What is printed on the card.
    pub face: CardFace,

    /// Seat that drew the card, `None` while it sits in the deck.
    pub owner: Option<PlayerId>,
}

impl Card {
    /// An unowned card.
    #[must_use]
    pub const fn new(face: CardFace) -> Self {
        Self { face, owner: None }
    }

    /// Same card tagged with the seat that drew it.
    #[must_use]
    pub fn owned_by(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.face.is_special()
    }

    #[must_use]
    pub fn is_effect(&self) -> bool {
        self.face.is_effect()
    }
}

impl From<CardFace> for Card {
    fn from(face: CardFace) -> Self {
        Card::new(face)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.face == other.face
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.face.hash(state);
    }
}

impl PartialEq<CardFace> for Card {
    fn eq(&self, other: &CardFace) -> bool {
        self.face == *other
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.face.fmt(f)
    }
}
