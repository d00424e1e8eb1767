use crate::deal::{Deal, DealError, deal};
use crate::game::view::SeatView;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::score::ScoreBoard;
use crate::model::seat::Seat;
use crate::model::trick::{Play, Trick, TrickError};
use crate::rules::{self, TrickOutcome};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::array;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Only observable if dealing failed; a successful deal moves straight to `Playing`.
    Dealing,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played { next: Seat },
    /// The fourth card is down. The trick waits for [`GameEngine::resolve_trick`].
    TrickFull(TrickOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: TrickOutcome,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub plays: Vec<Play>,
    pub outcome: TrickOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("no deal is in progress")]
    NoDeal,
    #[error("the deal is over")]
    GameOver,
    #[error("the trick on the table has not been collected yet")]
    ResolutionPending,
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: Seat, actual: Seat },
    #[error("{card} is not in {seat}'s hand")]
    CardNotInHand { seat: Seat, card: Card },
    #[error("{card} does not follow the lead suit")]
    IllegalPlay { card: Card },
    #[error("there is no full trick to resolve")]
    NothingToResolve,
    #[error(transparent)]
    Trick(#[from] TrickError),
}

/// Owns every piece of state for one table: hands, trick, scores, turn and phase.
///
/// `play_card` is the only way cards move. A deal identifier increments on every new
/// deal so that work scheduled against an earlier deal can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct GameEngine {
    rng: StdRng,
    deal_id: u64,
    phase: GamePhase,
    hands: [Hand; 4],
    trick: Trick,
    turn: Seat,
    scores: ScoreBoard,
    history: Vec<CompletedTrick>,
}

impl GameEngine {
    pub fn new() -> Result<Self, DealError> {
        Self::with_seed(rand::random())
    }

    /// Every deal, including later calls to [`new_deal`](Self::new_deal), follows from `seed`.
    pub fn with_seed(seed: u64) -> Result<Self, DealError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        let mut engine = Self::empty(rng);
        engine.install(&deck)?;
        Ok(engine)
    }

    /// First deal uses `deck` as given; later deals are shuffled.
    pub fn with_deck(deck: &Deck) -> Result<Self, DealError> {
        let mut engine = Self::empty(StdRng::seed_from_u64(rand::random()));
        engine.install(deck)?;
        Ok(engine)
    }

    fn empty(rng: StdRng) -> Self {
        Self {
            rng,
            deal_id: 0,
            phase: GamePhase::Dealing,
            hands: array::from_fn(|_| Hand::new()),
            trick: Trick::new(Seat::HUMAN),
            turn: Seat::HUMAN,
            scores: ScoreBoard::new(),
            history: Vec::new(),
        }
    }

    /// Abandons whatever is in progress and deals a fresh shuffled deck.
    pub fn new_deal(&mut self) -> Result<u64, DealError> {
        let deck = Deck::shuffled(&mut self.rng);
        self.install(&deck)
    }

    fn install(&mut self, deck: &Deck) -> Result<u64, DealError> {
        self.phase = GamePhase::Dealing;
        let Deal { hands, opener } = deal(deck.cards())?;

        self.deal_id += 1;
        self.hands = hands;
        self.trick = Trick::new(opener);
        self.turn = opener;
        self.scores = ScoreBoard::new();
        self.history.clear();
        self.phase = GamePhase::Playing;

        debug!(deal_id = self.deal_id, opener = %opener, "dealt new hands");
        Ok(self.deal_id)
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, PlayError> {
        match self.phase {
            GamePhase::Playing => {}
            GamePhase::Dealing => return Err(PlayError::NoDeal),
            GamePhase::GameOver => return Err(PlayError::GameOver),
        }

        if self.trick.is_complete() {
            return Err(PlayError::ResolutionPending);
        }

        if seat != self.turn {
            return Err(PlayError::NotYourTurn {
                expected: self.turn,
                actual: seat,
            });
        }

        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand { seat, card });
        }

        if !rules::is_legal_play(hand, &self.trick, card) {
            return Err(PlayError::IllegalPlay { card });
        }

        self.trick.play(seat, card)?;
        self.hands[seat.index()].remove(card);
        debug!(deal_id = self.deal_id, seat = %seat, card = %card, "card played");

        if self.trick.is_complete() {
            let outcome = rules::resolve_trick(&self.trick).ok_or(PlayError::NothingToResolve)?;
            return Ok(PlayOutcome::TrickFull(outcome));
        }

        self.turn = seat.next();
        Ok(PlayOutcome::Played { next: self.turn })
    }

    /// Scores the full trick, clears it and hands the lead to its winner.
    pub fn resolve_trick(&mut self) -> Result<Resolution, PlayError> {
        if self.phase != GamePhase::Playing || !self.trick.is_complete() {
            return Err(PlayError::NothingToResolve);
        }
        let outcome = rules::resolve_trick(&self.trick).ok_or(PlayError::NothingToResolve)?;

        self.scores.add_points(outcome.winner, outcome.points);
        let finished = std::mem::replace(&mut self.trick, Trick::new(outcome.winner));
        self.history.push(CompletedTrick {
            plays: finished.plays().to_vec(),
            outcome,
        });
        self.turn = outcome.winner;

        info!(
            deal_id = self.deal_id,
            trick = self.history.len(),
            winner = %outcome.winner,
            points = outcome.points,
            "trick resolved"
        );

        let game_over = rules::is_game_over(&self.hands);
        if game_over {
            self.phase = GamePhase::GameOver;
            info!(
                deal_id = self.deal_id,
                scores = ?self.scores.standings(),
                "deal finished"
            );
        }

        Ok(Resolution { outcome, game_over })
    }

    pub fn view(&self, seat: Seat) -> SeatView {
        SeatView::capture(self, seat)
    }

    pub fn deal_id(&self) -> u64 {
        self.deal_id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn trick(&self) -> &Trick {
        &self.trick
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn awaiting_resolution(&self) -> bool {
        self.phase == GamePhase::Playing && self.trick.is_complete()
    }

    pub fn tricks_completed(&self) -> usize {
        self.history.len()
    }

    pub fn last_trick(&self) -> Option<&CompletedTrick> {
        self.history.last()
    }

    pub fn hand_sizes(&self) -> [usize; 4] {
        array::from_fn(|index| self.hands[index].len())
    }

    // Other seats' cards stay inside the crate; presentations read them through `view`.
    pub(crate) fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::{GameEngine, GamePhase, PlayError, PlayOutcome};
    use crate::game::view::SeatView;
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use std::collections::HashSet;

    // Dealing the unshuffled deck puts the two of clubs with North and gives
    // East 3C, South 4C and West 5C.
    fn standard_engine() -> GameEngine {
        GameEngine::with_deck(&Deck::standard()).unwrap()
    }

    fn all_views(engine: &GameEngine) -> Vec<SeatView> {
        Seat::LOOP.iter().map(|seat| engine.view(*seat)).collect()
    }

    fn play_first_legal(engine: &mut GameEngine) -> PlayOutcome {
        let seat = engine.turn();
        let card = engine.view(seat).legal[0];
        engine.play_card(seat, card).unwrap()
    }

    fn cards(ranks: &[(Rank, Suit)]) -> Vec<Card> {
        ranks.iter().map(|&(r, s)| Card::new(r, s)).collect()
    }

    #[test]
    fn new_deal_starts_with_two_of_clubs_holder() {
        for seed in 0..16 {
            let engine = GameEngine::with_seed(seed).unwrap();
            assert_eq!(engine.phase(), GamePhase::Playing);
            assert_eq!(engine.hand_sizes(), [13; 4]);
            assert!(engine.hand(engine.turn()).contains(Card::TWO_OF_CLUBS));
            assert_eq!(engine.scores().standings(), &[0; 4]);
            assert!(engine.trick().is_empty());
            assert_eq!(engine.deal_id(), 1);
        }
    }

    #[test]
    fn same_seed_gives_same_deals() {
        let mut a = GameEngine::with_seed(77).unwrap();
        let mut b = GameEngine::with_seed(77).unwrap();
        assert_eq!(all_views(&a), all_views(&b));
        a.new_deal().unwrap();
        b.new_deal().unwrap();
        assert_eq!(all_views(&a), all_views(&b));
    }

    #[test]
    fn out_of_turn_play_changes_nothing() {
        let mut engine = standard_engine();
        assert_eq!(engine.turn(), Seat::North);
        let before = all_views(&engine);
        let err = engine
            .play_card(Seat::South, Card::new(Rank::Two, Suit::Spades))
            .unwrap_err();
        assert_eq!(
            err,
            PlayError::NotYourTurn {
                expected: Seat::North,
                actual: Seat::South
            }
        );
        assert_eq!(before, all_views(&engine));
    }

    #[test]
    fn rejects_cards_not_held_and_off_suit_plays() {
        let mut engine = standard_engine();
        engine.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        let before = all_views(&engine);

        assert_eq!(
            engine.play_card(Seat::East, Card::TWO_OF_CLUBS),
            Err(PlayError::CardNotInHand {
                seat: Seat::East,
                card: Card::TWO_OF_CLUBS
            })
        );
        let off_suit = Card::new(Rank::Two, Suit::Diamonds);
        assert_eq!(
            engine.play_card(Seat::East, off_suit),
            Err(PlayError::IllegalPlay { card: off_suit })
        );
        assert_eq!(before, all_views(&engine));
    }

    #[test]
    fn fourth_card_waits_for_resolution() {
        let mut engine = standard_engine();
        let plays = [
            (Seat::North, Card::TWO_OF_CLUBS),
            (Seat::East, Card::new(Rank::Three, Suit::Clubs)),
            (Seat::South, Card::new(Rank::Four, Suit::Clubs)),
        ];
        for (seat, card) in plays {
            assert_eq!(
                engine.play_card(seat, card),
                Ok(PlayOutcome::Played { next: seat.next() })
            );
        }
        let outcome = engine
            .play_card(Seat::West, Card::new(Rank::Five, Suit::Clubs))
            .unwrap();
        let PlayOutcome::TrickFull(pending) = outcome else {
            panic!("expected a full trick, got {outcome:?}");
        };
        assert_eq!(pending.winner, Seat::West);
        assert!(engine.awaiting_resolution());
        assert_eq!(engine.trick().len(), 4);

        let west_card = engine.view(Seat::West).hand[0];
        assert_eq!(
            engine.play_card(Seat::West, west_card),
            Err(PlayError::ResolutionPending)
        );

        let resolution = engine.resolve_trick().unwrap();
        assert_eq!(resolution.outcome, pending);
        assert!(!resolution.game_over);
        assert_eq!(engine.turn(), Seat::West);
        assert!(engine.trick().is_empty());
        assert_eq!(engine.tricks_completed(), 1);
        assert_eq!(
            engine.last_trick().map(|t| t.plays.len()),
            Some(4)
        );
        assert_eq!(engine.resolve_trick(), Err(PlayError::NothingToResolve));
    }

    #[test]
    fn points_go_to_trick_winner() {
        let mut engine = standard_engine();
        for (seat, card) in [
            (Seat::North, Card::TWO_OF_CLUBS),
            (Seat::East, Card::new(Rank::Three, Suit::Clubs)),
            (Seat::South, Card::new(Rank::Four, Suit::Clubs)),
            (Seat::West, Card::new(Rank::Five, Suit::Clubs)),
        ] {
            engine.play_card(seat, card).unwrap();
        }
        engine.resolve_trick().unwrap();

        // West leads a heart; North holds hearts and must follow.
        for (seat, card) in [
            (Seat::West, Card::new(Rank::Ace, Suit::Hearts)),
            (Seat::North, Card::new(Rank::Three, Suit::Hearts)),
            (Seat::East, Card::new(Rank::Four, Suit::Hearts)),
            (Seat::South, Card::new(Rank::Five, Suit::Hearts)),
        ] {
            engine.play_card(seat, card).unwrap();
        }
        let resolution = engine.resolve_trick().unwrap();
        assert_eq!(resolution.outcome.winner, Seat::West);
        assert_eq!(resolution.outcome.points, 4);
        assert_eq!(engine.scores().score(Seat::West), 4);
        assert_eq!(engine.scores().total(), 4);
    }

    #[test]
    fn full_deal_ends_with_twenty_six_points() {
        let mut engine = GameEngine::with_seed(5).unwrap();
        while engine.phase() == GamePhase::Playing {
            if let PlayOutcome::TrickFull(_) = play_first_legal(&mut engine) {
                engine.resolve_trick().unwrap();
            }
        }
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.tricks_completed(), 13);
        assert_eq!(engine.hand_sizes(), [0; 4]);
        assert_eq!(engine.scores().total(), 26);

        let seen: HashSet<Card> = engine
            .history
            .iter()
            .flat_map(|t| t.plays.iter().map(|p| p.card))
            .collect();
        assert_eq!(seen.len(), 52);

        let winner = engine.turn();
        assert_eq!(
            engine.play_card(winner, Card::TWO_OF_CLUBS),
            Err(PlayError::GameOver)
        );
    }

    #[test]
    fn new_deal_mid_game_discards_progress() {
        for seed in [11, 23, 42] {
            let mut engine = GameEngine::with_seed(seed).unwrap();
            // Play on until points are on the board and the next trick has started.
            while engine.scores().total() == 0 || engine.trick().is_empty() {
                assert_eq!(engine.phase(), GamePhase::Playing, "seed {seed}");
                if let PlayOutcome::TrickFull(_) = play_first_legal(&mut engine) {
                    engine.resolve_trick().unwrap();
                }
            }
            assert!(engine.scores().total() > 0);
            assert!(engine.tricks_completed() > 0);
            let first_id = engine.deal_id();

            let next_id = engine.new_deal().unwrap();
            assert_eq!(next_id, first_id + 1);
            assert_eq!(engine.phase(), GamePhase::Playing);
            assert!(engine.trick().is_empty());
            assert_eq!(engine.scores().standings(), &[0; 4]);
            assert_eq!(engine.tricks_completed(), 0);
            assert_eq!(engine.last_trick(), None);
            assert_eq!(engine.hand_sizes(), [13; 4]);
        }
    }

    #[test]
    fn new_deal_is_allowed_after_game_over() {
        let mut engine = GameEngine::with_seed(3).unwrap();
        while engine.phase() == GamePhase::Playing {
            if let PlayOutcome::TrickFull(_) = play_first_legal(&mut engine) {
                engine.resolve_trick().unwrap();
            }
        }
        engine.new_deal().unwrap();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.scores().total(), 0);
    }

    #[test]
    fn malformed_deck_is_fatal() {
        let short = Deck::from_cards(cards(&[(Rank::Two, Suit::Clubs)]));
        assert!(GameEngine::with_deck(&short).is_err());
    }
}
