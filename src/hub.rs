use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, WeakUnboundedSender, unbounded_channel,
};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::action::{Action, PlayerId, RoomId};
use crate::config::HubConfig;
use crate::error::RoomError;
use crate::protocol::{ClientMessage, Protocol, ServerMessage};
use crate::room::Room;
use crate::session::{ConnectionId, Outbox};
use crate::state::Snapshot;
use crate::timer::BotTicket;

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Mailbox entries processed one at a time by a room's actor.
#[derive(Debug)]
pub enum RoomMessage {
    Join {
        conn: ConnectionId,
        name: String,
        outbox: Outbox,
        reply: Reply<PlayerId>,
    },
    Attach {
        conn: ConnectionId,
        player: PlayerId,
        outbox: Outbox,
        reply: Reply<()>,
    },
    Detach {
        conn: ConnectionId,
    },
    Start {
        reply: Reply<()>,
    },
    Command {
        conn: ConnectionId,
        outbox: Outbox,
        claimed: Option<PlayerId>,
        action: Action,
        reply: Reply<()>,
    },
    /// Posted by a bot timer once its delay has elapsed.
    BotTurn(BotTicket),
    Snapshot {
        player: PlayerId,
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Handle to communicate with a running room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    pub id: RoomId,
    tx: UnboundedSender<RoomMessage>,
}

impl RoomHandle {
    /// Spawns the actor that owns `room` and returns the handle feeding its mailbox.
    pub fn spawn(room: Room) -> Self {
        let id = room.id();
        let (tx, rx) = unbounded_channel();
        tokio::spawn(run(room, rx, tx.downgrade()));
        Self { id, tx }
    }

    pub async fn join(
        &self,
        conn: ConnectionId,
        name: impl Into<String>,
        outbox: Outbox,
    ) -> Result<PlayerId, RoomError> {
        let name = name.into();
        self.request(|reply| RoomMessage::Join {
            conn,
            name,
            outbox,
            reply,
        })
        .await
    }

    pub async fn attach(
        &self,
        conn: ConnectionId,
        player: PlayerId,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomMessage::Attach {
            conn,
            player,
            outbox,
            reply,
        })
        .await
    }

    pub fn detach(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.tx
            .send(RoomMessage::Detach { conn })
            .map_err(|_| RoomError::Closed(self.id))
    }

    pub async fn start(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomMessage::Start { reply }).await
    }

    /// Runs `action` for the player bound to `conn`; rejections are reported on `outbox`.
    pub async fn command(
        &self,
        conn: ConnectionId,
        outbox: Outbox,
        claimed: Option<PlayerId>,
        action: Action,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomMessage::Command {
            conn,
            outbox,
            claimed,
            action,
            reply,
        })
        .await
    }

    pub async fn snapshot(&self, player: PlayerId) -> Result<Snapshot, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RoomMessage::Snapshot { player, reply })
            .map_err(|_| RoomError::Closed(self.id))?;
        rx.await.map_err(|_| RoomError::Closed(self.id))
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(Reply<T>) -> RoomMessage,
    ) -> Result<T, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(message(reply))
            .map_err(|_| RoomError::Closed(self.id))?;
        rx.await.map_err(|_| RoomError::Closed(self.id))?
    }
}

/// Drains the mailbox until every strong handle is gone.
async fn run(
    mut room: Room,
    mut rx: UnboundedReceiver<RoomMessage>,
    mailbox: WeakUnboundedSender<RoomMessage>,
) {
    log::debug!("[room {}] actor started", room.id());
    while let Some(message) = rx.recv().await {
        let armed = match message {
            RoomMessage::Join {
                conn,
                name,
                outbox,
                reply,
            } => {
                let _ = reply.send(room.join(conn, &name, outbox));
                None
            }
            RoomMessage::Attach {
                conn,
                player,
                outbox,
                reply,
            } => {
                let _ = reply.send(room.attach(conn, player, outbox));
                None
            }
            RoomMessage::Detach { conn } => {
                room.detach(conn);
                None
            }
            RoomMessage::Start { reply } => {
                let result = room.start();
                let armed = result.as_ref().ok().copied().flatten();
                let _ = reply.send(result.map(|_| ()));
                armed
            }
            RoomMessage::Command {
                conn,
                outbox,
                claimed,
                action,
                reply,
            } => {
                let result = room.dispatch(conn, &outbox, claimed, action);
                let armed = result.as_ref().ok().copied().flatten();
                let _ = reply.send(result.map(|_| ()));
                armed
            }
            RoomMessage::BotTurn(ticket) => match room.bot_turn(&ticket) {
                Ok(armed) => armed,
                Err(err) => {
                    log::warn!("[room {}] bot {} failed to act: {}", room.id(), ticket.bot, err);
                    None
                }
            },
            RoomMessage::Snapshot { player, reply } => {
                let _ = reply.send(room.snapshot_for(player));
                None
            }
        };
        if let Some(ticket) = armed {
            schedule(room.id(), ticket, mailbox.clone());
        }
    }
    log::debug!("[room {}] actor stopped", room.id());
}

/// Posts `ticket` back to the room after its delay, unless the room is gone by then.
fn schedule(room: RoomId, ticket: BotTicket, mailbox: WeakUnboundedSender<RoomMessage>) {
    log::trace!("[room {}] bot {} acts in {:?}", room, ticket.bot, ticket.delay);
    tokio::spawn(async move {
        tokio::time::sleep(ticket.delay).await;
        if let Some(tx) = mailbox.upgrade() {
            let _ = tx.send(RoomMessage::BotTurn(ticket));
        }
    });
}

/// Routes client messages to room actors.
pub struct Hub {
    config: HubConfig,
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl Hub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Opens a room under a fresh id.
    pub async fn create_room(&self) -> RoomHandle {
        self.ensure_room(Uuid::new_v4()).await
    }

    /// Returns the room with `id`, opening it first if needed.
    pub async fn ensure_room(&self, id: RoomId) -> RoomHandle {
        if let Some(handle) = self.rooms.read().await.get(&id) {
            return handle.clone();
        }
        self.rooms
            .write()
            .await
            .entry(id)
            .or_insert_with(|| {
                log::info!("[hub] opened room {}", id);
                RoomHandle::spawn(Room::new(id, self.config.clone()))
            })
            .clone()
    }

    pub async fn room(&self, id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RoomError::RoomNotFound(id))
    }

    /// Forgets the room; its actor stops once outstanding handles are dropped.
    pub async fn close_room(&self, id: RoomId) -> Result<(), RoomError> {
        self.rooms
            .write()
            .await
            .remove(&id)
            .map(|_| log::info!("[hub] closed room {}", id))
            .ok_or(RoomError::RoomNotFound(id))
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Decodes one text frame from `conn` and routes it. Any failure is also reported on
    /// `outbox`, and to no other connection.
    pub async fn receive(
        &self,
        conn: ConnectionId,
        outbox: &Outbox,
        text: &str,
    ) -> Result<(), RoomError> {
        let message = Protocol::decode(text)
            .map_err(RoomError::from)
            .inspect_err(|err| report(outbox, err))?;
        self.route(conn, outbox, message).await
    }

    /// Routes an already decoded message.
    pub async fn route(
        &self,
        conn: ConnectionId,
        outbox: &Outbox,
        message: ClientMessage,
    ) -> Result<(), RoomError> {
        let room_id = message.room_id();
        if let Some((player, action)) = message.command() {
            // The room reports its own rejections to the caller.
            let handle = self
                .room(room_id)
                .await
                .inspect_err(|err| report(outbox, err))?;
            return handle
                .command(conn, outbox.clone(), Some(player), action)
                .await;
        }
        let result = match message {
            ClientMessage::Join { name, .. } => self
                .ensure_room(room_id)
                .await
                .join(conn, name, outbox.clone())
                .await
                .map(|_| ()),
            ClientMessage::Attach { player_id, .. } => match self.room(room_id).await {
                Ok(handle) => handle.attach(conn, player_id, outbox.clone()).await,
                Err(err) => Err(err),
            },
            ClientMessage::Start { .. } => match self.room(room_id).await {
                Ok(handle) => handle.start().await,
                Err(err) => Err(err),
            },
            _ => Ok(()),
        };
        result.inspect_err(|err| report(outbox, err))
    }

    /// Unbinds `conn` from every room, for transports that lose a connection.
    pub async fn disconnect(&self, conn: ConnectionId) {
        for handle in self.rooms.read().await.values() {
            let _ = handle.detach(conn);
        }
    }
}

fn report(outbox: &Outbox, err: &RoomError) {
    let _ = outbox.send(ServerMessage::error(err));
}
