use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::action::{Action, PlayerId, RoomId};
use crate::bot;
use crate::card::MIN_PLAYERS;
use crate::config::HubConfig;
use crate::error::{GameError, RoomError, ValidationError};
use crate::game::{Game, GameBuilder, Player};
use crate::protocol::ServerMessage;
use crate::session::{ConnectionId, Outbox, SessionRegistry};
use crate::state::{GameStatus, GameView, Snapshot};
use crate::timer::{BotTicket, TimerConfig};

/// One session's table: the roster, the current game and the connections watching it.
///
/// `Room` performs no IO of its own beyond queueing messages on connection outboxes.
/// Every method that changes what players can see broadcasts before returning, and
/// every method that can hand the turn to a bot returns the [`BotTicket`] to schedule.
pub struct Room {
    id: RoomId,
    config: HubConfig,
    timers: TimerConfig,
    humans: Vec<Player>,
    bots: Vec<Player>,
    game: Option<Game>,
    sessions: SessionRegistry,
    seeds: StdRng,
}

impl Room {
    pub fn new(id: RoomId, config: HubConfig) -> Self {
        let seeds = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            id,
            timers: config.timers(),
            config,
            humans: Vec::new(),
            bots: Vec::new(),
            game: None,
            sessions: SessionRegistry::new(),
            seeds,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.game.as_ref().map_or(GameStatus::Lobby, Game::status)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn humans(&self) -> &[Player] {
        &self.humans
    }

    pub fn bots(&self) -> &[Player] {
        &self.bots
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Registers a human, binds `conn` to them and replies `joined` before the broadcast.
    pub fn join(
        &mut self,
        conn: ConnectionId,
        name: &str,
        outbox: Outbox,
    ) -> Result<PlayerId, RoomError> {
        if self.status().is_active() {
            return Err(RoomError::AlreadyStarted);
        }
        if self.humans.len() + self.bots.len() >= self.config.max_players() {
            return Err(RoomError::RoomFull);
        }
        let player = Player::human(name.trim());
        let id = player.id;
        log::info!("[room {}] {} joined as {}", self.id, player.name, id);
        self.humans.push(player);
        let _ = outbox.send(ServerMessage::joined(self.id, id));
        self.sessions.bind(conn, id, outbox);
        self.broadcast();
        Ok(id)
    }

    /// Binds `conn` to a registered human and sends that connection its snapshot.
    pub fn attach(
        &mut self,
        conn: ConnectionId,
        player: PlayerId,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        if !self.humans.iter().any(|human| human.id == player) {
            return Err(RoomError::UnknownPlayer(player));
        }
        let snapshot = self.snapshot_for(player);
        let _ = outbox.send(ServerMessage::State(snapshot));
        if let Some(previous) = self.sessions.bind(conn, player, outbox) {
            log::debug!(
                "[room {}] connection {} rebound from {} to {}",
                self.id,
                conn,
                previous.player,
                player
            );
        }
        Ok(())
    }

    pub fn detach(&mut self, conn: ConnectionId) -> bool {
        let removed = self.sessions.unbind(conn).is_some();
        if removed {
            log::debug!("[room {}] connection {} detached", self.id, conn);
        }
        removed
    }

    /// Deals a new game for the roster, synthesizing one bot for a lone human.
    pub fn start(&mut self) -> Result<Option<BotTicket>, RoomError> {
        if self.status().is_active() {
            return Err(RoomError::AlreadyStarted);
        }
        let synthesize = self.humans.len() < MIN_PLAYERS && self.bots.is_empty();
        if self.humans.len() + self.bots.len() + usize::from(synthesize) < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers.into());
        }
        if synthesize {
            let bot = Player::bot(self.config.bot_name.clone());
            log::debug!("[room {}] seating bot {}", self.id, bot.id);
            self.bots.push(bot);
        }
        let seats = self.humans.iter().chain(self.bots.iter()).cloned().collect();
        let game = GameBuilder::new(seats)?
            .in_room(self.id)
            .with_seed(self.seeds.next_u64())
            .build()?;
        log::info!(
            "[room {}] game {} started with {} seats",
            self.id,
            game.id(),
            game.players().len()
        );
        self.game = Some(game);
        self.broadcast();
        Ok(self.pending_bot_turn())
    }

    /// Runs a player command issued over `conn`.
    ///
    /// The acting player is the one bound to `conn`; `claimed` must agree with it when
    /// present. A rejection is reported on `reply` only. Either way every bound
    /// connection then receives the current state.
    pub fn dispatch(
        &mut self,
        conn: ConnectionId,
        reply: &Outbox,
        claimed: Option<PlayerId>,
        action: Action,
    ) -> Result<Option<BotTicket>, RoomError> {
        let result = self.execute(conn, claimed, action);
        if let Err(err) = &result {
            log::debug!("[room {}] rejected {:?}: {}", self.id, action, err);
            let _ = reply.send(ServerMessage::error(err));
        }
        self.broadcast();
        result
    }

    fn execute(
        &mut self,
        conn: ConnectionId,
        claimed: Option<PlayerId>,
        action: Action,
    ) -> Result<Option<BotTicket>, RoomError> {
        let bound = self.sessions.player(conn).ok_or(ValidationError::Unbound)?;
        if let Some(claimed) = claimed.filter(|claimed| *claimed != bound) {
            return Err(ValidationError::IdentityMismatch { bound, claimed }.into());
        }
        let game = self.game.as_ref().ok_or(GameError::InvalidState)?;
        let next = game.apply(bound, action)?;
        self.game = Some(next);
        if action.ends_turn() {
            Ok(self.pending_bot_turn())
        } else {
            Ok(None)
        }
    }

    /// The deferred turn to arm if a bot holds the current seat.
    pub fn pending_bot_turn(&self) -> Option<BotTicket> {
        let game = self.game.as_ref()?;
        let human_owes = game
            .uno_pending()
            .and_then(|holder| game.player(holder))
            .is_some_and(|holder| !holder.is_bot && !holder.has_called_uno);
        BotTicket::arm(game, human_owes, &self.timers)
    }

    /// Plays a fired ticket if it still describes the live game. Stale tickets are dropped
    /// without a broadcast.
    pub fn bot_turn(&mut self, ticket: &BotTicket) -> Result<Option<BotTicket>, RoomError> {
        let Some(game) = self.game.as_ref().filter(|game| ticket.is_current(game)) else {
            log::debug!("[room {}] dropping stale bot ticket {:?}", self.id, ticket);
            return Ok(None);
        };
        let next = bot::step(game)?;
        self.game = Some(next);
        self.broadcast();
        Ok(self.pending_bot_turn())
    }

    /// What `player` is allowed to see, plus their own record.
    pub fn snapshot_for(&self, player: PlayerId) -> Snapshot {
        let roster_entry = || {
            self.humans
                .iter()
                .chain(self.bots.iter())
                .find(|entry| entry.id == player)
                .cloned()
        };
        match &self.game {
            Some(game) => Snapshot {
                game: game.publicize(Some(player)),
                you: game.player(player).cloned().or_else(roster_entry),
            },
            None => {
                let roster: Vec<Player> =
                    self.humans.iter().chain(self.bots.iter()).cloned().collect();
                Snapshot {
                    game: GameView::lobby(self.id, &roster, Some(player)),
                    you: roster_entry(),
                }
            }
        }
    }

    /// Pushes each bound connection its own snapshot, forgetting connections that hung up.
    pub fn broadcast(&mut self) {
        let pruned = self.sessions.prune();
        if pruned > 0 {
            log::debug!("[room {}] pruned {} closed connections", self.id, pruned);
        }
        for (_, session) in self.sessions.iter() {
            session.send(ServerMessage::State(self.snapshot_for(session.player)));
        }
    }
}

#[cfg(test)]
impl Room {
    /// Lays out the running game: `hands` by seat, `top` alone on the discard pile,
    /// `draws` as the draw pile, seat 0 to act.
    pub(crate) fn stack_table(
        &mut self,
        hands: &[Vec<crate::card::Card>],
        top: crate::card::Card,
        draws: Vec<crate::card::Card>,
    ) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        for (player, hand) in game.players.iter_mut().zip(hands) {
            player.hand = hand.clone();
            player.has_called_uno = false;
        }
        game.discard_pile = vec![top];
        game.draw_pile = draws;
        game.active_color = top.color;
        game.must_choose_color = false;
        game.pending_draw = 0;
        game.uno_pending = None;
        game.direction = crate::state::Direction::Forward;
        game.current = 0;
    }
}
