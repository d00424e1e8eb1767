use crate::game::engine::{CompletedTrick, GameEngine, GamePhase};
use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::trick::Play;
use crate::rules;
use serde::{Deserialize, Serialize};

/// What one seat is allowed to see: its own cards plus the public table state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub deal_id: u64,
    pub seat: Seat,
    pub phase: GamePhase,
    pub turn: Seat,
    pub awaiting_resolution: bool,
    pub hand: Vec<Card>,
    /// Empty unless it is this seat's turn to play.
    pub legal: Vec<Card>,
    pub trick_leader: Seat,
    pub trick: Vec<Play>,
    pub scores: [u32; 4],
    pub hand_sizes: [usize; 4],
    pub tricks_completed: usize,
    pub last_trick: Option<CompletedTrick>,
}

impl SeatView {
    pub fn capture(engine: &GameEngine, seat: Seat) -> Self {
        let hand = engine.hand(seat);
        let awaiting_resolution = engine.awaiting_resolution();
        let to_act = engine.phase() == GamePhase::Playing
            && !awaiting_resolution
            && engine.turn() == seat;
        let legal = if to_act {
            rules::legal_cards(hand, engine.trick())
        } else {
            Vec::new()
        };

        SeatView {
            deal_id: engine.deal_id(),
            seat,
            phase: engine.phase(),
            turn: engine.turn(),
            awaiting_resolution,
            hand: hand.cards().to_vec(),
            legal,
            trick_leader: engine.trick().leader(),
            trick: engine.trick().plays().to_vec(),
            scores: *engine.scores().standings(),
            hand_sizes: engine.hand_sizes(),
            tricks_completed: engine.tricks_completed(),
            last_trick: engine.last_trick().cloned(),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        !self.legal.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
