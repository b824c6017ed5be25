use pretty_assertions::assert_eq;

use unoroom::card::{CardId, DECK_SIZE, HAND_SIZE};
use unoroom::{Action, Card, Color, Direction, Game, GameBuilder, GameError, GameStatus, Player, Rank};

/// Stacks a deck so that seat `s` is dealt `hands[s]`, `flip` starts the discard pile
/// and `draws` come off the draw pile in order. Card ids follow the listed order.
fn stacked(hands: &[Vec<(Color, Rank)>], flip: (Color, Rank), draws: &[(Color, Rank)]) -> Vec<Card> {
    let mut sequence = Vec::new();
    for round in 0..HAND_SIZE {
        for hand in hands {
            sequence.push(hand[round]);
        }
    }
    sequence.push(flip);
    sequence.extend_from_slice(draws);
    let mut deck: Vec<Card> = sequence
        .into_iter()
        .enumerate()
        .map(|(id, (color, rank))| Card::new(id as CardId, color, rank))
        .collect();
    deck.reverse();
    deck
}

fn greens(count: usize) -> Vec<(Color, Rank)> {
    (0..count)
        .map(|value| (Color::Green, Rank::Number(value as u8 % 10)))
        .collect()
}

fn hand(first: (Color, Rank)) -> Vec<(Color, Rank)> {
    let mut cards = vec![first];
    cards.extend(greens(HAND_SIZE - 1));
    cards
}

fn two_seats(deck: Vec<Card>) -> Result<Game, GameError> {
    let players = vec![Player::human("Ada"), Player::human("Bob")];
    GameBuilder::new(players)?.with_deck(deck).build()
}

fn held(game: &Game, seat: usize, rank: Rank) -> Card {
    game.players()[seat]
        .hand
        .iter()
        .copied()
        .find(|card| card.rank == rank)
        .expect("card in hand")
}

#[test]
fn deal_hands_out_seven_each_and_flips_one() -> Result<(), GameError> {
    let players = vec![Player::human("A"), Player::human("B"), Player::human("C")];
    let game = GameBuilder::new(players)?.with_seed(3).build()?;
    for player in game.players() {
        assert_eq!(player.hand.len(), HAND_SIZE);
    }
    assert_eq!(game.discard_pile().len(), 1);
    assert_eq!(game.draw_pile().len(), DECK_SIZE - 3 * HAND_SIZE - 1);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.current_index(), 0);
    assert_eq!(game.direction(), Direction::Forward);
    Ok(())
}

#[test]
fn wild_draw_four_then_draw() -> Result<(), GameError> {
    let red_ones = vec![(Color::Red, Rank::Number(1)); HAND_SIZE];
    let deck = stacked(
        &[hand((Color::Wild, Rank::WildDraw4)), red_ones],
        (Color::Red, Rank::Number(5)),
        &[(Color::Yellow, Rank::Number(2)); 6],
    );
    let game = two_seats(deck)?;
    let (ada, bob) = (game.players()[0].id, game.players()[1].id);
    let wild = held(&game, 0, Rank::WildDraw4);

    let game = game.apply_play(ada, wild.id, Some(Color::Blue))?;
    assert_eq!(game.pending_draw(), 4);
    assert_eq!(game.active_color(), Color::Blue);
    assert_eq!(game.current_player().id, bob);
    assert!(game.legal_moves(bob).is_empty());
    assert_eq!(game.apply_pass(bob).err(), Some(GameError::IllegalMove));

    let game = game.apply_draw(bob)?;
    assert_eq!(game.players()[1].hand.len(), HAND_SIZE + 4);
    assert_eq!(game.pending_draw(), 0);
    assert_eq!(game.current_player().id, ada);
    assert_eq!(game.card_count(), 2 * HAND_SIZE + 1 + 6);
    Ok(())
}

#[test]
fn draw_two_stacks_onto_draw_two() -> Result<(), GameError> {
    let deck = stacked(
        &[
            hand((Color::Red, Rank::Draw2)),
            hand((Color::Yellow, Rank::Draw2)),
        ],
        (Color::Red, Rank::Number(5)),
        &[(Color::Blue, Rank::Number(8)); 5],
    );
    let game = two_seats(deck)?;
    let (ada, bob) = (game.players()[0].id, game.players()[1].id);

    let game = game.apply_play(ada, held(&game, 0, Rank::Draw2).id, None)?;
    let game = game.apply_play(bob, held(&game, 1, Rank::Draw2).id, None)?;
    assert_eq!(game.pending_draw(), 4);
    assert_eq!(game.active_color(), Color::Yellow);

    let game = game.apply_draw(ada)?;
    assert_eq!(game.players()[0].hand.len(), HAND_SIZE - 1 + 4);
    assert_eq!(game.pending_draw(), 0);
    assert_eq!(game.current_player().id, bob);
    Ok(())
}

#[test]
fn skip_in_a_two_seat_game_returns_the_turn() -> Result<(), GameError> {
    let deck = stacked(
        &[hand((Color::Red, Rank::Skip)), hand((Color::Blue, Rank::Number(9)))],
        (Color::Red, Rank::Number(5)),
        &[(Color::Blue, Rank::Number(8)); 3],
    );
    let game = two_seats(deck)?;
    let ada = game.players()[0].id;
    let game = game.apply_play(ada, held(&game, 0, Rank::Skip).id, None)?;
    assert_eq!(game.current_player().id, ada);
    assert_eq!(game.turn(), 1);
    Ok(())
}

#[test]
fn turn_violation_leaves_state_unchanged() -> Result<(), GameError> {
    let game = two_seats(stacked(
        &[hand((Color::Red, Rank::Number(3))), hand((Color::Red, Rank::Number(4)))],
        (Color::Red, Rank::Number(5)),
        &[(Color::Blue, Rank::Number(8)); 3],
    ))?;
    let bob = game.players()[1].id;
    let before = game.reveal();
    let card = held(&game, 1, Rank::Number(4));
    assert_eq!(
        game.apply_play(bob, card.id, None).err(),
        Some(GameError::TurnViolation)
    );
    assert_eq!(game.apply_draw(bob).err(), Some(GameError::TurnViolation));
    assert_eq!(game.reveal(), before);
    Ok(())
}

#[test]
fn exhausted_supply_rejects_the_draw() -> Result<(), GameError> {
    let game = two_seats(stacked(
        &[hand((Color::Red, Rank::Number(3))), hand((Color::Blue, Rank::Number(4)))],
        (Color::Red, Rank::Number(5)),
        &[],
    ))?;
    let (ada, bob) = (game.players()[0].id, game.players()[1].id);
    assert!(game.draw_pile().is_empty());
    assert_eq!(game.apply_draw(ada).err(), Some(GameError::SupplyExhausted));

    let game = game.apply_play(ada, held(&game, 0, Rank::Number(3)).id, None)?;
    let top = game.top_card().copied();
    let game = game.apply_draw(bob)?;
    assert_eq!(game.top_card().copied(), top);
    assert_eq!(game.discard_pile().len(), 1);
    assert!(
        game.players()[1]
            .hand
            .iter()
            .any(|card| card.color == Color::Red && card.rank == Rank::Number(5))
    );
    assert_eq!(game.card_count(), 2 * HAND_SIZE + 1);
    Ok(())
}

#[test]
fn supply_is_conserved_through_bot_games() -> Result<(), GameError> {
    for seed in 0..8 {
        let players = (0..4).map(|seat| Player::bot(format!("Bot {seat}"))).collect();
        let mut game = GameBuilder::new(players)?.with_seed(seed).build()?;
        for _ in 0..3000 {
            if game.is_finished() {
                break;
            }
            game = match unoroom::step(&game) {
                Ok(next) => next,
                Err(GameError::SupplyExhausted) => break,
                Err(err) => return Err(err),
            };
            assert_eq!(game.card_count(), DECK_SIZE);
            assert!(game.current_index() < game.players().len());
            assert!(game.uno_pending().is_none(), "bots declare on their own");
        }
        if let Some(winner) = game.winner() {
            let seat = game.seat_of(winner).expect("winner is seated");
            assert!(game.players()[seat].hand.is_empty());
            assert_eq!(game.status(), GameStatus::Completed);
            assert_eq!(
                game.apply(game.current_player().id, Action::Draw).err(),
                Some(GameError::InvalidState)
            );
        }
    }
    Ok(())
}
