//! Round-robin dealing of a 52-card deck into four hands.

use crate::model::card::Card;
use crate::model::deck::DECK_SIZE;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use std::array;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: [Hand; 4],
    /// Holder of the two of clubs, who leads the first trick.
    pub opener: Seat,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("deck must hold 52 cards, got {len}")]
    InvalidDeck { len: usize },
    #[error("no seat holds the two of clubs")]
    MissingOpeningCard,
    #[error("deck holds {0} more than once")]
    DuplicateCard(Card),
}

/// Card `i` goes to seat `i mod 4`.
pub fn deal(cards: &[Card]) -> Result<Deal, DealError> {
    if cards.len() != DECK_SIZE {
        return Err(DealError::InvalidDeck { len: cards.len() });
    }

    let mut dealt: [Vec<Card>; 4] = array::from_fn(|_| Vec::with_capacity(DECK_SIZE / 4));
    for (index, card) in cards.iter().enumerate() {
        dealt[index % 4].push(*card);
    }
    let hands = dealt.map(Hand::with_cards);

    let opener = Seat::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(Card::TWO_OF_CLUBS))
        .ok_or(DealError::MissingOpeningCard)?;

    let mut seen = HashSet::with_capacity(DECK_SIZE);
    if let Some(duplicate) = cards.iter().copied().find(|card| !seen.insert(*card)) {
        return Err(DealError::DuplicateCard(duplicate));
    }

    Ok(Deal { hands, opener })
}
