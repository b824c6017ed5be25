//! Rule queries and pile mechanics shared by the state machine and the bots.
//!
//! Everything here reads a [`Game`] snapshot; the two mutating helpers
//! ([`ensure_draw_cards`] and [`reshuffle`]) only move cards between piles and
//! hands, so the 108-card supply is conserved.

use crate::action::PlayerId;
use crate::card::{Card, shuffle};
use crate::error::GameError;
use crate::game::Game;

pub fn top_discard(game: &Game) -> Option<&Card> {
    game.discard_pile.last()
}

/// Whether `card` may be played onto the current discard pile.
pub fn is_legal_move(game: &Game, card: &Card) -> bool {
    let Some(top) = top_discard(game) else {
        return true;
    };
    // Armed only by a wild first flip; a wild cannot follow until a color is named.
    if game.must_choose_color && card.is_wild() {
        return false;
    }
    if game.pending_draw > 0 {
        return card.rank.is_draw();
    }
    if card.is_wild() {
        return true;
    }
    card.color == game.active_color || card.rank == top.rank
}

/// Legal cards in the player's hand, in hand order.
pub fn legal_moves(game: &Game, player: PlayerId) -> Vec<Card> {
    game.player(player)
        .map(|player| {
            player
                .hand
                .iter()
                .filter(|card| is_legal_move(game, card))
                .copied()
                .collect()
        })
        .unwrap_or_default()
}

/// Seat after `from` along the current direction, wrapping both ways.
pub fn next_index(game: &Game, from: usize) -> usize {
    let seats = game.players.len() as isize;
    (from as isize + game.direction.offset()).rem_euclid(seats) as usize
}

/// Moves `count` cards from the draw pile into the hand at `seat`,
/// reshuffling whenever the draw pile runs dry.
pub fn ensure_draw_cards(game: &mut Game, count: u32, seat: usize) -> Result<(), GameError> {
    for _ in 0..count {
        if game.draw_pile.is_empty() {
            reshuffle(game);
        }
        let card = game.draw_pile.pop().ok_or(GameError::SupplyExhausted)?;
        game.players[seat].hand.push(card);
    }
    Ok(())
}

/// Recycles every discard except the top card into the draw pile.
pub fn reshuffle(game: &mut Game) {
    let Some(top) = game.discard_pile.pop() else {
        return;
    };
    let recycled = std::mem::take(&mut game.discard_pile);
    let recycled = shuffle(recycled, &mut game.rng);
    game.draw_pile.extend(recycled);
    game.discard_pile.push(top);
    log::trace!(
        "[game {}] reshuffled {} cards into the draw pile",
        game.id,
        game.draw_pile.len()
    );
}
