use crate::action::Action;
use crate::bot::Bot;
use crate::card::{Card, Color};
use crate::state::GameView;

/// Room policy: no lookahead and no randomness of its own.
///
/// - Play the first legal card in hand order.
/// - For a wild, name the suit held most often in the remaining hand, ties going to
///   Red, Yellow, Green, Blue in that order.
/// - With nothing playable, draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyBot;

impl GreedyBot {
    pub fn new() -> Self {
        Self
    }

    /// Suit with the highest count in `hand`.
    pub fn pick_color(hand: &[Card]) -> Color {
        let mut best = Color::SUITS[0];
        let mut best_count = 0;
        for suit in Color::SUITS {
            let count = hand.iter().filter(|card| card.color == suit).count();
            if count > best_count {
                best = suit;
                best_count = count;
            }
        }
        best
    }
}

impl Bot for GreedyBot {
    fn select_action(&mut self, state: &GameView, legal_moves: &[Card]) -> Action {
        let Some(first) = legal_moves.first() else {
            return Action::Draw;
        };
        let color = first.is_wild().then(|| Self::pick_color(&state.hand));
        Action::Play {
            card: first.id,
            color,
        }
    }
}
