//! Cards, the draw pile and player hands.
//!
//! - `CardFace`: what is printed on a card (numbers, effects, modifiers)
//! - `Card`: a face plus the seat that drew it
//! - `Deck`: unordered multiset with random draw
//! - `Hand`: one player's cards for the current round

pub mod card;
pub mod deck;
pub mod hand;

pub use card::{Card, CardFace, ParseCardError};
pub use deck::{Deck, STANDARD_DECK_SIZE};
pub use hand::Hand;
