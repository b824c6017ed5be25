//! UNO game engine and room server core: a pure rules reducer, bot policies and
//! per-room actors that drive mixed human and bot tables.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod config;
pub mod error;
pub mod game;
pub mod hub;
pub mod protocol;
pub mod room;
pub mod rules;
pub mod session;
pub mod state;
pub mod timer;
pub mod visualize;

pub use crate::action::{Action, GameId, PlayerId, RoomId};
pub use crate::bot::{Bot, step, step_with};
pub use crate::bots::{GreedyBot, RandomBot, create_bot_from_spec, label_for_spec};
pub use crate::card::{Card, CardId, Color, DECK_SIZE, Rank};
pub use crate::config::HubConfig;
pub use crate::error::{GameError, RoomError, ValidationError};
pub use crate::game::{Game, GameBuilder, Player};
pub use crate::hub::{Hub, RoomHandle, RoomMessage};
pub use crate::protocol::{ClientMessage, Protocol, ServerMessage};
pub use crate::room::Room;
pub use crate::session::{ConnectionId, Outbox, SessionRegistry};
pub use crate::state::{CardView, Direction, GameStatus, GameView, PlayerView, Snapshot};
pub use crate::timer::{BotTicket, TimerConfig};
pub use crate::visualize::{VisualOptions, describe_action, format_card, render_view};
