use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub const fn penalty_value(self) -> u32 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit.is_heart() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("card text is empty")]
    Empty,
    #[error("unknown suit in '{0}'")]
    UnknownSuit(String),
    #[error("unknown rank in '{0}'")]
    UnknownRank(String),
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Accepts `QS`, `10h`, `T♥` and similar: a rank followed by one suit letter or glyph.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let mut chars = text.chars();
        let suit_char = chars.next_back().ok_or(ParseCardError::Empty)?;
        let suit =
            Suit::from_symbol(suit_char).ok_or_else(|| ParseCardError::UnknownSuit(text.into()))?;
        let rank = Rank::from_symbol(chars.as_str())
            .ok_or_else(|| ParseCardError::UnknownRank(text.into()))?;
        Ok(Card::new(rank, suit))
    }
}
