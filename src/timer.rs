use std::time::Duration;

use crate::action::{GameId, PlayerId};
use crate::game::Game;

pub const DEFAULT_THINK_MS: u64 = 1300;
pub const DEFAULT_UNO_GRACE_MS: u64 = 1300;

/// Delays applied before a bot acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Pause before every bot turn.
    pub think: Duration,
    /// Minimum pause while a human still owes a one-card declaration.
    pub uno_grace: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            think: Duration::from_millis(DEFAULT_THINK_MS),
            uno_grace: Duration::from_millis(DEFAULT_UNO_GRACE_MS),
        }
    }
}

impl TimerConfig {
    pub fn new(think: Duration, uno_grace: Duration) -> Self {
        Self { think, uno_grace }
    }

    pub fn bot_delay(&self, human_owes_declaration: bool) -> Duration {
        if human_owes_declaration {
            self.think.max(self.uno_grace)
        } else {
            self.think
        }
    }
}

/// A deferred bot turn, captured when armed and re-validated when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTicket {
    pub bot: PlayerId,
    pub game: GameId,
    pub turn: u64,
    pub delay: Duration,
}

impl BotTicket {
    /// Arms a ticket if the current seat of `game` is a bot.
    pub fn arm(game: &Game, human_owes_declaration: bool, config: &TimerConfig) -> Option<Self> {
        if !game.is_bot_turn() {
            return None;
        }
        Some(Self {
            bot: game.current_player().id,
            game: game.id(),
            turn: game.turn(),
            delay: config.bot_delay(human_owes_declaration),
        })
    }

    /// Whether the live `game` is still the position this ticket was armed for.
    pub fn is_current(&self, game: &Game) -> bool {
        game.id() == self.game
            && game.turn() == self.turn
            && game.is_bot_turn()
            && game.current_player().id == self.bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameBuilder, Player};

    fn bot_first() -> Game {
        GameBuilder::new(vec![Player::bot("Bot"), Player::human("A")])
            .expect("builder")
            .with_seed(1)
            .build()
            .expect("game")
    }

    #[test]
    fn default_config() {
        let config = TimerConfig::default();
        assert_eq!(config.think, Duration::from_millis(1300));
        assert_eq!(config.uno_grace, Duration::from_millis(1300));
    }

    #[test]
    fn grace_only_applies_to_open_obligations() {
        let config = TimerConfig::new(Duration::from_millis(200), Duration::from_millis(900));
        assert_eq!(config.bot_delay(false), Duration::from_millis(200));
        assert_eq!(config.bot_delay(true), Duration::from_millis(900));
        let slow = TimerConfig::new(Duration::from_secs(2), Duration::from_millis(900));
        assert_eq!(slow.bot_delay(true), Duration::from_secs(2));
    }

    #[test]
    fn arms_only_for_bot_seats() {
        let game = bot_first();
        let ticket = BotTicket::arm(&game, false, &TimerConfig::default()).expect("bot on turn");
        assert_eq!(ticket.bot, game.players()[0].id);
        assert!(ticket.is_current(&game));

        let human_first = GameBuilder::new(vec![Player::human("A"), Player::bot("Bot")])
            .expect("builder")
            .build()
            .expect("game");
        assert!(BotTicket::arm(&human_first, false, &TimerConfig::default()).is_none());
    }

    #[test]
    fn ticket_goes_stale_after_the_turn_moves() {
        let game = bot_first();
        let ticket = BotTicket::arm(&game, false, &TimerConfig::default()).expect("bot on turn");
        let next = crate::bot::step(&game).expect("bot acts");
        assert!(!ticket.is_current(&next));
        let other_game = bot_first();
        assert!(!ticket.is_current(&other_game));
    }
}
