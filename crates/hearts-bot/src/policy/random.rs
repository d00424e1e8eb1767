use super::{Policy, PolicyContext, fallback, log_play_decision};
use hearts_core::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Picks uniformly among the legal cards.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let legal_moves = ctx.legal_moves();
        match legal_moves.choose(&mut self.rng).copied() {
            Some(card) => {
                log_play_decision(ctx, "random", &legal_moves, card);
                Some(card)
            }
            None => fallback(ctx, "random"),
        }
    }
}
