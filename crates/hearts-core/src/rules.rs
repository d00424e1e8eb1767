//! Pure Hearts rules: follow-suit legality, trick resolution and end-of-deal detection.
//!
//! No "hearts broken" restriction exists here. A leader may open with any card,
//! hearts and the queen of spades included.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickOutcome {
    pub winner: Seat,
    pub points: u32,
}

/// A card is legal when leading, when it follows the lead suit, or when the hand is void
/// in the lead suit. Membership of `card` in `hand` is checked by the caller.
pub fn is_legal_play(hand: &Hand, trick: &Trick, card: Card) -> bool {
    match trick.lead_suit() {
        None => true,
        Some(lead) => card.suit == lead || !hand.has_suit(lead),
    }
}

/// The legal subset of `hand`, in hand order.
pub fn legal_cards(hand: &Hand, trick: &Trick) -> Vec<Card> {
    legal_subset(hand.cards(), trick.lead_suit())
}

/// Cards of `lead` when any are held, otherwise every card. Leading (`None`) allows all.
pub fn legal_subset(cards: &[Card], lead: Option<Suit>) -> Vec<Card> {
    let following: Vec<Card> = match lead {
        Some(suit) => cards.iter().copied().filter(|c| c.suit == suit).collect(),
        None => Vec::new(),
    };
    if following.is_empty() {
        cards.to_vec()
    } else {
        following
    }
}

/// Highest card of the lead suit takes the trick along with every point in it.
/// Returns `None` for an empty trick.
pub fn resolve_trick(trick: &Trick) -> Option<TrickOutcome> {
    let lead = trick.lead_suit()?;
    let winner = trick
        .plays()
        .iter()
        .filter(|play| play.card.suit == lead)
        .max_by_key(|play| play.card.rank.order())?
        .seat;
    let points = trick
        .plays()
        .iter()
        .map(|play| play.card.penalty_value())
        .sum();
    Some(TrickOutcome { winner, points })
}

pub fn is_game_over(hands: &[Hand]) -> bool {
    hands.iter().all(Hand::is_empty)
}
