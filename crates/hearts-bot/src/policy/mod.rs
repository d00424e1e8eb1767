mod first_legal;
mod random;

pub use first_legal::FirstLegalPolicy;
pub use random::RandomPolicy;

use hearts_core::game::view::SeatView;
use hearts_core::model::card::Card;
use hearts_core::model::seat::Seat;
use hearts_core::model::suit::Suit;
use hearts_core::rules;
use tracing::{Level, event};

/// Context provided to policies for decision-making
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub lead_suit: Option<Suit>,
    pub trick_len: usize,
}

impl<'a> PolicyContext<'a> {
    pub fn from_view(view: &'a SeatView) -> Self {
        Self {
            seat: view.seat,
            hand: &view.hand,
            lead_suit: view.trick.first().map(|play| play.card.suit),
            trick_len: view.trick.len(),
        }
    }

    pub fn legal_moves(&self) -> Vec<Card> {
        rules::legal_subset(self.hand, self.lead_suit)
    }
}

/// Move selection for an automated seat.
pub trait Policy: Send {
    /// Returns a card from `ctx.hand` that is legal for the current trick,
    /// or `None` when the hand is empty.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    #[default]
    Random,
    FirstLegal,
}

impl PolicyKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(match seed {
                Some(seed) => RandomPolicy::with_seed(seed),
                None => RandomPolicy::from_entropy(),
            }),
            PolicyKind::FirstLegal => Box::new(FirstLegalPolicy),
        }
    }
}

// Legal moves are never empty while the hand has cards; this keeps the seat
// from stalling if that ever stops holding.
fn fallback(ctx: &PolicyContext, policy: &str) -> Option<Card> {
    let card = ctx.hand.first().copied()?;
    tracing::warn!(
        target: "hearts_bot::play",
        seat = %ctx.seat,
        policy,
        card = %card,
        "no legal move computed; falling back to first card in hand"
    );
    Some(card)
}

fn log_play_decision(ctx: &PolicyContext, policy: &str, legal_moves: &[Card], chosen: Card) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if legal_moves.len() <= 6 {
        legal_moves
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal_moves.len())
    };

    event!(
        target: "hearts_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        policy,
        legal_count = legal_moves.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        trick_cards = ctx.trick_len,
    );
}

#[cfg(test)]
mod tests {
    use super::{PolicyContext, PolicyKind};
    use hearts_core::game::engine::{GameEngine, GamePhase, PlayOutcome};
    use hearts_core::model::card::Card;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::seat::Seat;
    use hearts_core::model::suit::Suit;

    #[test]
    fn legal_moves_follow_lead_suit() {
        let hand = [
            Card::new(Rank::Two, Suit::Spades),
            Card::new(Rank::Nine, Suit::Hearts),
            Card::new(Rank::Jack, Suit::Hearts),
        ];
        let ctx = PolicyContext {
            seat: Seat::West,
            hand: &hand,
            lead_suit: Some(Suit::Hearts),
            trick_len: 1,
        };
        assert_eq!(ctx.legal_moves(), vec![hand[1], hand[2]]);

        let void = PolicyContext {
            lead_suit: Some(Suit::Clubs),
            ..ctx
        };
        assert_eq!(void.legal_moves().len(), 3);
    }

    #[test]
    fn every_kind_completes_a_deal_with_accepted_plays() {
        for kind in [PolicyKind::Random, PolicyKind::FirstLegal] {
            let mut engine = GameEngine::with_seed(31).unwrap();
            let mut policy = kind.build(Some(7));
            while engine.phase() == GamePhase::Playing {
                let seat = engine.turn();
                let view = engine.view(seat);
                let card = policy
                    .choose_play(&PolicyContext::from_view(&view))
                    .expect("a card while cards remain");
                match engine.play_card(seat, card) {
                    Ok(PlayOutcome::TrickFull(_)) => {
                        engine.resolve_trick().unwrap();
                    }
                    Ok(PlayOutcome::Played { .. }) => {}
                    Err(err) => panic!("{kind:?} chose {card} for {seat}: {err}"),
                }
            }
            assert_eq!(engine.scores().total(), 26);
        }
    }
}
