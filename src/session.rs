use std::collections::BTreeMap;

use tokio::sync::mpsc::UnboundedSender;

use crate::action::PlayerId;
use crate::protocol::ServerMessage;

/// Transport-assigned identity of one live connection.
pub type ConnectionId = u64;

/// Where a connection receives its outbound messages.
pub type Outbox = UnboundedSender<ServerMessage>;

/// A connection bound to a player of the room.
#[derive(Debug, Clone)]
pub struct Session {
    pub player: PlayerId,
    pub outbox: Outbox,
}

impl Session {
    /// Queues `message`, returning false once the transport hung up.
    pub fn send(&self, message: ServerMessage) -> bool {
        self.outbox.send(message).is_ok()
    }
}

/// Connection to player bindings owned by a room. A connection has at most one binding.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<ConnectionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `conn` to `player`, returning the binding it replaced.
    pub fn bind(&mut self, conn: ConnectionId, player: PlayerId, outbox: Outbox) -> Option<Session> {
        self.sessions.insert(conn, Session { player, outbox })
    }

    pub fn unbind(&mut self, conn: ConnectionId) -> Option<Session> {
        self.sessions.remove(&conn)
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&Session> {
        self.sessions.get(&conn)
    }

    pub fn player(&self, conn: ConnectionId) -> Option<PlayerId> {
        self.sessions.get(&conn).map(|session| session.player)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Session)> {
        self.sessions.iter().map(|(conn, session)| (*conn, session))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops bindings whose transport has gone away and returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.outbox.is_closed());
        before - self.sessions.len()
    }
}
