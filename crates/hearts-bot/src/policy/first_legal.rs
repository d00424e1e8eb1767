use super::{Policy, PolicyContext, fallback, log_play_decision};
use hearts_core::model::card::Card;

/// Always plays the first legal card in hand order. Deterministic baseline for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalPolicy;

impl Policy for FirstLegalPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let legal_moves = ctx.legal_moves();
        match legal_moves.first().copied() {
            Some(card) => {
                log_play_decision(ctx, "first_legal", &legal_moves, card);
                Some(card)
            }
            None => fallback(ctx, "first_legal"),
        }
    }
}
