use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::{Action, GameId, PlayerId, RoomId};
use crate::card::{
    Card, CardId, Color, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS, Rank, full_deck, shuffle,
};
use crate::error::GameError;
use crate::rules;
use crate::state::{CardView, Direction, GameStatus, GameView, PlayerView};

/// Cards drawn by a human who reached one card and did not declare in time.
pub const UNO_PENALTY: u32 = 2;

/// A seat at the table (or a roster entry before the deal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub has_called_uno: bool,
    pub is_bot: bool,
}

impl Player {
    pub fn human(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    fn new(name: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hand: Vec::with_capacity(HAND_SIZE),
            has_called_uno: false,
            is_bot,
        }
    }

    pub fn with_id(mut self, id: PlayerId) -> Self {
        self.id = id;
        self
    }
}

/// Builder that enables deterministic deck injection for tests and simulations.
pub struct GameBuilder {
    room_id: RoomId,
    players: Vec<Player>,
    seed: Option<u64>,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new(players: Vec<Player>) -> Result<Self, GameError> {
        if players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if players.len() > MAX_PLAYERS {
            return Err(GameError::InvalidConfiguration("too many players"));
        }
        Ok(Self {
            room_id: Uuid::nil(),
            players,
            seed: None,
            deck: None,
        })
    }

    pub fn in_room(mut self, room_id: RoomId) -> Self {
        self.room_id = room_id;
        self
    }

    /// Seed for the deal and every later reshuffle. Entropy is used when absent.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use `deck` as the draw pile instead of a shuffled full deck. The last card is dealt first.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Core UNO state machine.
///
/// Every public operation is a reducer: it takes `&self`, applies the command to a
/// copy and hands the copy back, so a rejected command never disturbs the caller's
/// state.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) room_id: RoomId,
    pub(crate) players: Vec<Player>,
    pub(crate) current: usize,
    pub(crate) direction: Direction,
    pub(crate) draw_pile: Vec<Card>,
    pub(crate) discard_pile: Vec<Card>,
    pub(crate) active_color: Color,
    pub(crate) pending_draw: u32,
    pub(crate) must_choose_color: bool,
    pub(crate) status: GameStatus,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) uno_pending: Option<PlayerId>,
    pub(crate) turn: u64,
    pub(crate) rng: StdRng,
}

impl Game {
    pub fn builder(players: Vec<Player>) -> Result<GameBuilder, GameError> {
        GameBuilder::new(players)
    }

    /// Deals a fresh game for `players` in `room_id`, shuffled from entropy.
    pub fn create(room_id: RoomId, players: Vec<Player>) -> Result<Self, GameError> {
        GameBuilder::new(players)?.in_room(room_id).build()
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.id == id)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    pub fn top_card(&self) -> Option<&Card> {
        rules::top_discard(self)
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn pending_draw(&self) -> u32 {
        self.pending_draw
    }

    pub fn must_choose_color(&self) -> bool {
        self.must_choose_color
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn uno_pending(&self) -> Option<PlayerId> {
        self.uno_pending
    }

    /// Count of applied plays, draws and passes. Declarations leave it untouched.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether a computer-controlled seat must act next.
    pub fn is_bot_turn(&self) -> bool {
        self.status.is_active() && self.current_player().is_bot
    }

    /// Cards across every hand and both piles; always the full supply.
    pub fn card_count(&self) -> usize {
        let in_hands: usize = self.players.iter().map(|player| player.hand.len()).sum();
        in_hands + self.draw_pile.len() + self.discard_pile.len()
    }

    pub fn legal_moves(&self, player: PlayerId) -> Vec<Card> {
        rules::legal_moves(self, player)
    }

    pub fn apply(&self, player: PlayerId, action: Action) -> Result<Self, GameError> {
        let mut next = self.clone();
        next.reduce(player, action)?;
        Ok(next)
    }

    pub fn apply_play(
        &self,
        player: PlayerId,
        card: CardId,
        color: Option<Color>,
    ) -> Result<Self, GameError> {
        self.apply(player, Action::Play { card, color })
    }

    pub fn apply_draw(&self, player: PlayerId) -> Result<Self, GameError> {
        self.apply(player, Action::Draw)
    }

    pub fn apply_pass(&self, player: PlayerId) -> Result<Self, GameError> {
        self.apply(player, Action::Pass)
    }

    pub fn call_uno(&self, player: PlayerId) -> Result<Self, GameError> {
        self.apply(player, Action::Declare)
    }

    /// Projection for `viewer`: every other hand is replaced by hidden placeholders.
    pub fn publicize(&self, viewer: Option<PlayerId>) -> GameView {
        self.view(viewer, false)
    }

    /// Omniscient projection with every hand visible.
    pub fn reveal(&self) -> GameView {
        self.view(None, true)
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            room_id,
            mut players,
            seed,
            deck,
        } = builder;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut draw_pile = match deck {
            Some(deck) => deck,
            None => shuffle(full_deck(), &mut rng),
        };
        if draw_pile.len() <= HAND_SIZE * players.len() {
            return Err(GameError::InvalidConfiguration(
                "deck does not contain enough cards to deal and flip",
            ));
        }

        for player in players.iter_mut() {
            player.hand.clear();
            player.has_called_uno = false;
        }
        for _ in 0..HAND_SIZE {
            for player in players.iter_mut() {
                let card = draw_pile.pop().ok_or(GameError::InvalidConfiguration(
                    "deck exhausted while dealing",
                ))?;
                player.hand.push(card);
            }
        }

        let flipped = draw_pile.pop();
        // A wild flip names no suit, so play opens on the neutral default Red.
        let active_color = flipped
            .map(|card| card.color)
            .filter(Color::is_suit)
            .unwrap_or(Color::Red);
        let must_choose_color = flipped.is_some_and(|card| card.is_wild());

        let game = Game {
            id: Uuid::new_v4(),
            room_id,
            players,
            current: 0,
            direction: Direction::Forward,
            draw_pile,
            discard_pile: flipped.into_iter().collect(),
            active_color,
            pending_draw: 0,
            must_choose_color,
            status: GameStatus::InProgress,
            winner: None,
            uno_pending: None,
            turn: 0,
            rng,
        };
        log::debug!(
            "[game {}] dealt {} seats, flipped {:?}",
            game.id,
            game.players.len(),
            flipped
        );
        Ok(game)
    }

    fn reduce(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        if !self.status.is_active() {
            return Err(GameError::InvalidState);
        }
        match action {
            Action::Declare => self.declare(player),
            Action::Play { card, color } => {
                let seat = self.begin_turn(player)?;
                self.play_card(seat, card, color)
            }
            Action::Draw => {
                let seat = self.begin_turn(player)?;
                self.draw_cards(seat)
            }
            Action::Pass => {
                let seat = self.begin_turn(player)?;
                self.pass_turn(seat)
            }
        }
    }

    /// Settles the previous declaration window, then checks that `player` is on turn.
    fn begin_turn(&mut self, player: PlayerId) -> Result<usize, GameError> {
        self.settle_uno_penalty()?;
        if self.players[self.current].id != player {
            return Err(GameError::TurnViolation);
        }
        Ok(self.current)
    }

    fn settle_uno_penalty(&mut self) -> Result<(), GameError> {
        let Some(holder) = self.uno_pending.take() else {
            return Ok(());
        };
        let Some(seat) = self.seat_of(holder) else {
            return Ok(());
        };
        if !self.players[seat].has_called_uno {
            log::debug!("[game {}] {} missed the declaration", self.id, holder);
            rules::ensure_draw_cards(self, UNO_PENALTY, seat)?;
        }
        Ok(())
    }

    fn play_card(
        &mut self,
        seat: usize,
        card_id: CardId,
        color: Option<Color>,
    ) -> Result<(), GameError> {
        let index = self.players[seat]
            .hand
            .iter()
            .position(|card| card.id == card_id)
            .ok_or(GameError::CardNotFound(card_id))?;
        let card = self.players[seat].hand[index];
        let chosen = color.filter(Color::is_suit);
        if card.is_wild() && chosen.is_none() {
            return Err(GameError::ColorRequired);
        }
        if !rules::is_legal_move(self, &card) {
            return Err(GameError::IllegalMove);
        }

        self.players[seat].hand.remove(index);
        self.discard_pile.push(card);
        self.active_color = match chosen {
            Some(color) if card.is_wild() => {
                self.must_choose_color = false;
                color
            }
            _ => card.color,
        };

        let steps = match card.rank {
            Rank::Skip => 2,
            // Two seats included: the direction flips and play still moves on by one.
            Rank::Reverse => {
                self.direction = self.direction.reversed();
                1
            }
            Rank::Draw2 | Rank::WildDraw4 => {
                self.pending_draw += card.rank.draw_penalty();
                1
            }
            Rank::Number(_) | Rank::Wild => 1,
        };

        self.turn += 1;
        let player = &mut self.players[seat];
        if player.hand.is_empty() {
            self.status = GameStatus::Completed;
            self.winner = Some(player.id);
            log::info!("[game {}] {} wins", self.id, player.name);
            return Ok(());
        }

        if player.hand.len() == 1 {
            if player.is_bot {
                player.has_called_uno = true;
                self.uno_pending = None;
            } else {
                player.has_called_uno = false;
                self.uno_pending = Some(player.id);
            }
        } else {
            player.has_called_uno = false;
            self.uno_pending = None;
        }

        self.advance(steps);
        Ok(())
    }

    fn draw_cards(&mut self, seat: usize) -> Result<(), GameError> {
        let count = self.pending_draw.max(1);
        rules::ensure_draw_cards(self, count, seat)?;
        self.pending_draw = 0;
        self.turn += 1;
        self.advance(1);
        Ok(())
    }

    fn pass_turn(&mut self, seat: usize) -> Result<(), GameError> {
        let player = self.players[seat].id;
        if self.pending_draw > 0 || !rules::legal_moves(self, player).is_empty() {
            return Err(GameError::IllegalMove);
        }
        self.turn += 1;
        self.advance(1);
        Ok(())
    }

    fn declare(&mut self, player: PlayerId) -> Result<(), GameError> {
        let seat = self
            .seat_of(player)
            .ok_or(GameError::UnknownPlayer(player))?;
        let player = &mut self.players[seat];
        if player.hand.len() == 1 {
            player.has_called_uno = true;
        }
        Ok(())
    }

    fn advance(&mut self, steps: usize) {
        for _ in 0..steps {
            self.current = rules::next_index(self, self.current);
        }
    }

    fn view(&self, viewer: Option<PlayerId>, reveal_all: bool) -> GameView {
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                let visible = reveal_all || Some(player.id) == viewer;
                let hand = if visible {
                    player.hand.iter().copied().map(CardView::Visible).collect()
                } else {
                    vec![CardView::Hidden; player.hand.len()]
                };
                PlayerView {
                    id: player.id,
                    name: player.name.clone(),
                    hand,
                    hand_size: player.hand.len(),
                    has_called_uno: player.has_called_uno,
                    is_bot: player.is_bot,
                    is_current: seat == self.current,
                }
            })
            .collect();
        let hand = viewer
            .and_then(|id| self.player(id))
            .map(|player| player.hand.clone())
            .unwrap_or_default();

        GameView {
            id: self.id,
            room_id: self.room_id,
            status: self.status,
            viewer,
            players,
            current_index: self.current,
            current_player: Some(self.players[self.current].id),
            direction: self.direction,
            draw_pile_count: self.draw_pile.len(),
            discard_pile: self.discard_pile.clone(),
            top_card: self.discard_pile.last().copied(),
            active_color: self.active_color,
            pending_draw: self.pending_draw,
            must_choose_color: self.must_choose_color,
            winner: self.winner,
            uno_pending: self.uno_pending,
            turn: self.turn,
            hand,
        }
    }
}
