use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::card::{Card, Color};
use crate::state::GameView;

/// Baseline bot that samples uniformly from the legal cards, and from the suits for wilds.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _state: &GameView, legal_moves: &[Card]) -> Action {
        let Some(card) = legal_moves.choose(&mut self.rng) else {
            return Action::Draw;
        };
        let color = if card.is_wild() {
            Color::SUITS.choose(&mut self.rng).copied()
        } else {
            None
        };
        Action::Play {
            card: card.id,
            color,
        }
    }
}
