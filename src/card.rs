use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Stable identity of a physical card, assigned once at deck construction.
pub type CardId = u16;

pub const DECK_SIZE: usize = 108;
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const WILD_COPIES: usize = 4;

/// Card color. `Wild` marks the suit-less wild-family cards and never names a chosen color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// The four playable suits, in tie-breaking order.
    pub const SUITS: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    #[inline]
    pub fn is_suit(&self) -> bool {
        !matches!(self, Color::Wild)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Numeral between 0 and 9.
    Number(u8),
    Skip,
    Reverse,
    Draw2,
    Wild,
    WildDraw4,
}

impl Rank {
    /// Ranks dealt twice per suit.
    pub const PAIRED: [Rank; 12] = [
        Rank::Number(1),
        Rank::Number(2),
        Rank::Number(3),
        Rank::Number(4),
        Rank::Number(5),
        Rank::Number(6),
        Rank::Number(7),
        Rank::Number(8),
        Rank::Number(9),
        Rank::Skip,
        Rank::Reverse,
        Rank::Draw2,
    ];

    #[inline]
    pub fn is_wild(&self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDraw4)
    }

    /// Whether this rank adds to the pending forced draw and may be stacked on it.
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(self, Rank::Draw2 | Rank::WildDraw4)
    }

    /// Cards added to the pending forced draw when played.
    #[inline]
    pub fn draw_penalty(&self) -> u32 {
        match self {
            Rank::Draw2 => 2,
            Rank::WildDraw4 => 4,
            Rank::Number(_) | Rank::Skip | Rank::Reverse | Rank::Wild => 0,
        }
    }
}

/// A single physical card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub color: Color,
    pub rank: Rank,
}

impl Card {
    pub fn new(id: CardId, color: Color, rank: Rank) -> Self {
        Self { id, color, rank }
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        self.rank.is_wild()
    }
}

/// Builds the full 108-card supply in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    let mut next_id: CardId = 0;
    let mut push = |deck: &mut Vec<Card>, color: Color, rank: Rank| {
        deck.push(Card::new(next_id, color, rank));
        next_id += 1;
    };
    for color in Color::SUITS {
        push(&mut deck, color, Rank::Number(0));
        for rank in Rank::PAIRED {
            push(&mut deck, color, rank);
            push(&mut deck, color, rank);
        }
    }
    for _ in 0..WILD_COPIES {
        push(&mut deck, Color::Wild, Rank::Wild);
    }
    for _ in 0..WILD_COPIES {
        push(&mut deck, Color::Wild, Rank::WildDraw4);
    }
    deck
}

/// Uniform random permutation of `cards` (Fisher-Yates).
pub fn shuffle<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Vec<Card> {
    cards.shuffle(rng);
    cards
}
