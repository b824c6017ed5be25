use serde::{Deserialize, Serialize};

use crate::action::{Action, PlayerId, RoomId};
use crate::card::{CardId, Color};
use crate::config::MAX_NAME_LEN;
use crate::error::ValidationError;
use crate::state::Snapshot;

/// Messages received from a client connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Register a human in the room's roster and bind this connection to them.
    Join { room_id: RoomId, name: String },
    /// Bind this connection to a player who joined earlier.
    Attach { room_id: RoomId, player_id: PlayerId },
    Start { room_id: RoomId },
    Play {
        room_id: RoomId,
        player_id: PlayerId,
        card_id: CardId,
        #[serde(default)]
        chosen_color: Option<Color>,
    },
    Draw { room_id: RoomId, player_id: PlayerId },
    Pass { room_id: RoomId, player_id: PlayerId },
    Declare { room_id: RoomId, player_id: PlayerId },
}

impl ClientMessage {
    pub fn room_id(&self) -> RoomId {
        match self {
            ClientMessage::Join { room_id, .. }
            | ClientMessage::Attach { room_id, .. }
            | ClientMessage::Start { room_id }
            | ClientMessage::Play { room_id, .. }
            | ClientMessage::Draw { room_id, .. }
            | ClientMessage::Pass { room_id, .. }
            | ClientMessage::Declare { room_id, .. } => *room_id,
        }
    }

    /// The claimed player and the game command, for the in-game message types.
    pub fn command(&self) -> Option<(PlayerId, Action)> {
        match *self {
            ClientMessage::Play {
                player_id,
                card_id,
                chosen_color,
                ..
            } => Some((
                player_id,
                Action::Play {
                    card: card_id,
                    color: chosen_color,
                },
            )),
            ClientMessage::Draw { player_id, .. } => Some((player_id, Action::Draw)),
            ClientMessage::Pass { player_id, .. } => Some((player_id, Action::Pass)),
            ClientMessage::Declare { player_id, .. } => Some((player_id, Action::Declare)),
            _ => None,
        }
    }
}

/// Messages pushed to a client connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to a successful join.
    Joined { room_id: RoomId, player_id: PlayerId },
    /// Full per-viewer state; sent after every command.
    State(Snapshot),
    /// Sent to the originating connection only.
    Error { message: String },
}

impl ServerMessage {
    pub fn joined(room_id: RoomId, player_id: PlayerId) -> Self {
        Self::Joined { room_id, player_id }
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

/// JSON codec for the wire messages.
pub struct Protocol;

impl Protocol {
    /// Parses and validates one inbound message.
    pub fn decode(text: &str) -> Result<ClientMessage, ValidationError> {
        let message: ClientMessage = serde_json::from_str(text)
            .map_err(|err| ValidationError::Malformed(err.to_string()))?;
        Self::validate(&message)?;
        Ok(message)
    }

    /// Shape checks that need no game context. `chosen_color: Wild` is refused on any
    /// play, wild card or not.
    pub fn validate(message: &ClientMessage) -> Result<(), ValidationError> {
        match message {
            ClientMessage::Join { name, .. } => {
                let len = name.trim().chars().count();
                if len == 0 || len > MAX_NAME_LEN {
                    return Err(ValidationError::InvalidName { max: MAX_NAME_LEN });
                }
            }
            ClientMessage::Play {
                chosen_color: Some(Color::Wild),
                ..
            } => return Err(ValidationError::WildColor),
            _ => {}
        }
        Ok(())
    }

    pub fn encode(message: &ServerMessage) -> Result<String, serde_json::Error> {
        serde_json::to_string(message)
    }
}
