use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{CardId, Color};

/// Identity of a seated or registered player.
pub type PlayerId = Uuid;

/// Identity of a room; a room hosts one game at a time.
pub type RoomId = Uuid;

/// Identity of a single game within a room.
pub type GameId = Uuid;

/// Command a seated player can issue against a running game.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from hand. `color` names the suit for wild-family cards and is ignored otherwise.
    Play { card: CardId, color: Option<Color> },
    /// Take the pending forced draw, or a single card when none is pending.
    Draw,
    /// End the turn without playing; only valid when no move exists.
    Pass,
    /// Declare being down to one card.
    Declare,
}

impl Action {
    /// Returns the card id if the action is a play.
    pub fn card(&self) -> Option<CardId> {
        match self {
            Action::Play { card, .. } => Some(*card),
            _ => None,
        }
    }

    /// Whether the action passes the turn on when it succeeds.
    pub fn ends_turn(&self) -> bool {
        !matches!(self, Action::Declare)
    }
}
