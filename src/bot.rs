use crate::action::Action;
use crate::bots::GreedyBot;
use crate::card::Card;
use crate::error::GameError;
use crate::game::Game;
use crate::state::GameView;

/// Interface for defining computer-controlled players.
pub trait Bot {
    /// Picks the next action given the bot's own view and the legal cards in its hand.
    fn select_action(&mut self, state: &GameView, legal_moves: &[Card]) -> Action;
}

/// Plays the current seat with the room policy if it is computer-controlled.
pub fn step(game: &Game) -> Result<Game, GameError> {
    step_with(game, &mut GreedyBot)
}

/// Like [`step`] with a caller-supplied policy. Human turns are returned untouched.
pub fn step_with<B: Bot + ?Sized>(game: &Game, bot: &mut B) -> Result<Game, GameError> {
    if !game.is_bot_turn() {
        return Ok(game.clone());
    }
    let seat = game.current_player().id;
    let view = game.publicize(Some(seat));
    let legal = game.legal_moves(seat);
    let action = bot.select_action(&view, &legal);
    log::debug!("[game {}] bot {} chose {:?}", game.id(), seat, action);
    game.apply(seat, action)
}
