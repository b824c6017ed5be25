use serde::{Deserialize, Serialize};

use crate::action::{GameId, PlayerId, RoomId};
use crate::card::{Card, Color};
use crate::game::Player;

/// Lifecycle of a game within a room.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// Roster still being collected; no cards dealt.
    #[default]
    Lobby,
    InProgress,
    /// Terminal: someone emptied their hand.
    Completed,
}

impl GameStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Seating direction of play.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Direction {
    /// Seat index increases.
    #[default]
    Forward,
    /// Seat index decreases.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Signed seat offset, +1 or -1.
    pub fn offset(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// A hand entry as seen by a particular viewer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardView {
    /// Someone else's card: reveals neither identity nor rank.
    Hidden,
    Visible(Card),
}

impl CardView {
    pub fn card(&self) -> Option<Card> {
        match self {
            Self::Hidden => None,
            Self::Visible(card) => Some(*card),
        }
    }
}

/// Public portion of a seat, with the hand redacted unless it belongs to the viewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<CardView>,
    pub hand_size: usize,
    pub has_called_uno: bool,
    pub is_bot: bool,
    pub is_current: bool,
}

/// Game snapshot tailored to one viewer. Never aliases canonical state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameView {
    pub id: GameId,
    pub room_id: RoomId,
    pub status: GameStatus,
    pub viewer: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    pub current_index: usize,
    pub current_player: Option<PlayerId>,
    pub direction: Direction,
    pub draw_pile_count: usize,
    pub discard_pile: Vec<Card>,
    pub top_card: Option<Card>,
    pub active_color: Color,
    pub pending_draw: u32,
    pub must_choose_color: bool,
    pub winner: Option<PlayerId>,
    pub uno_pending: Option<PlayerId>,
    pub turn: u64,
    /// The viewer's own hand, empty for spectators.
    pub hand: Vec<Card>,
}

impl GameView {
    /// Placeholder game shown while a room is still collecting its roster.
    pub fn lobby(room_id: RoomId, roster: &[Player], viewer: Option<PlayerId>) -> Self {
        let players = roster
            .iter()
            .map(|player| PlayerView {
                id: player.id,
                name: player.name.clone(),
                hand: Vec::new(),
                hand_size: 0,
                has_called_uno: false,
                is_bot: player.is_bot,
                is_current: false,
            })
            .collect();
        Self {
            id: room_id,
            room_id,
            status: GameStatus::Lobby,
            viewer,
            players,
            current_index: 0,
            current_player: None,
            direction: Direction::Forward,
            draw_pile_count: 0,
            discard_pile: Vec::new(),
            top_card: None,
            active_color: Color::Red,
            pending_draw: 0,
            must_choose_color: false,
            winner: None,
            uno_pending: None,
            turn: 0,
            hand: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Total cards visible through this view: hands, draw pile and discard pile.
    pub fn card_count(&self) -> usize {
        let in_hands: usize = self.players.iter().map(|player| player.hand_size).sum();
        in_hands + self.draw_pile_count + self.discard_pile.len()
    }
}

/// Outbound state message: the redacted game plus the recipient's own record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub game: GameView,
    pub you: Option<Player>,
}
