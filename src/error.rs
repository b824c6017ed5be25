use thiserror::Error;

use crate::action::{PlayerId, RoomId};
use crate::card::CardId;

/// Errors that can occur when applying a command to the game state.
///
/// Every variant is raised before the canonical game is replaced, so a rejected
/// command never leaves a partial mutation behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("not the specified player's turn")]
    TurnViolation,
    #[error("game is not in progress")]
    InvalidState,
    #[error("card {0} is not in the player's hand")]
    CardNotFound(CardId),
    #[error("a color must be chosen for a wild card")]
    ColorRequired,
    #[error("illegal move")]
    IllegalMove,
    #[error("at least two players are required")]
    NotEnoughPlayers,
    #[error("player {0} is not seated in this game")]
    UnknownPlayer(PlayerId),
    #[error("draw and discard piles are both exhausted")]
    SupplyExhausted,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Malformed or mis-addressed commands, rejected before they reach a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed command: {0}")]
    Malformed(String),
    #[error("display name must be between 1 and {max} characters")]
    InvalidName { max: usize },
    #[error("a wild card needs a suit, not another wild")]
    WildColor,
    #[error("connection is not bound to a player in this room")]
    Unbound,
    #[error("connection is bound to player {bound}, not {claimed}")]
    IdentityMismatch { bound: PlayerId, claimed: PlayerId },
}

/// Errors surfaced by room orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("game already started")]
    AlreadyStarted,
    #[error("room is full")]
    RoomFull,
    #[error("player {0} is not registered in this room")]
    UnknownPlayer(PlayerId),
    #[error("room {0} is closed")]
    Closed(RoomId),
}

impl RoomError {
    /// Whether the error stems from the command shape rather than game rules.
    pub fn is_validation(&self) -> bool {
        matches!(self, RoomError::Validation(_))
    }
}
