use std::fmt::Write;

use crate::action::Action;
use crate::card::{Card, Color, Rank};
use crate::state::{CardView, Direction, GameStatus, GameView};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    /// How many discards below the top card to list.
    pub discard_history: usize,
    pub show_hidden_hands: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            discard_history: 3,
            show_hidden_hands: true,
        }
    }
}

pub fn render_view(view: &GameView) -> String {
    render_view_with_options(view, VisualOptions::default())
}

pub fn render_view_with_options(view: &GameView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match view.status {
        GameStatus::Lobby => String::from("Lobby"),
        GameStatus::InProgress => String::from("In progress"),
        GameStatus::Completed => {
            let winner = view
                .winner
                .and_then(|id| view.player(id))
                .map_or_else(|| String::from("?"), |player| player.name.clone());
            format!("Completed (winner: {winner})")
        }
    };
    let _ = writeln!(out, "Game status: {status}  |  turn {}", view.turn);
    let arrow = match view.direction {
        Direction::Forward => "->",
        Direction::Backward => "<-",
    };
    let _ = writeln!(
        out,
        "Top: {}  |  Color: {}  |  Direction: {arrow}",
        view.top_card.map_or_else(|| String::from("--"), format_card),
        format_color(view.active_color)
    );
    let _ = writeln!(
        out,
        "Draw pile: {}  |  Discard pile: {}",
        view.draw_pile_count,
        view.discard_pile.len()
    );
    if options.discard_history > 0 && view.discard_pile.len() > 1 {
        let below = view
            .discard_pile
            .iter()
            .rev()
            .skip(1)
            .take(options.discard_history)
            .map(|card| format_card(*card))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "  Below top: {below}");
    }
    if view.pending_draw > 0 {
        let _ = writeln!(out, "Pending draw: {}", view.pending_draw);
    }
    if view.must_choose_color {
        let _ = writeln!(out, "Opening wild: color must be chosen");
    }
    let _ = writeln!(out, "Players:");
    for player in &view.players {
        let you = if Some(player.id) == view.viewer {
            " (You)"
        } else {
            ""
        };
        let bot = if player.is_bot { " [bot]" } else { "" };
        let uno = if player.has_called_uno { " UNO!" } else { "" };
        let current = if player.is_current { " <- current" } else { "" };
        let _ = writeln!(
            out,
            "  {}{you}{bot} - {} cards{uno}{current}",
            player.name, player.hand_size
        );
        let visible: Vec<String> = player
            .hand
            .iter()
            .filter_map(CardView::card)
            .map(format_card)
            .collect();
        if !visible.is_empty() {
            let _ = writeln!(out, "    Hand: {}", visible.join("  "));
        } else if options.show_hidden_hands && player.hand_size > 0 {
            let _ = writeln!(out, "    Hand: {}", vec!["##"; player.hand_size].join(" "));
        }
    }
    out
}

pub fn describe_action(view: &GameView, action: &Action) -> String {
    let actor = view
        .current_player
        .and_then(|id| view.player(id))
        .map_or_else(|| String::from("?"), |player| player.name.clone());
    match action {
        Action::Play { card, color } => {
            let played = view
                .hand
                .iter()
                .find(|held| held.id == *card)
                .map_or_else(|| format!("card #{card}"), |held| format_card(*held));
            match color {
                Some(color) if color.is_suit() => {
                    format!("{actor} plays {played} and calls {}", format_color(*color))
                }
                _ => format!("{actor} plays {played}"),
            }
        }
        Action::Draw => match view.pending_draw {
            0 => format!("{actor} draws a card"),
            count => format!("{actor} draws {count} cards"),
        },
        Action::Pass => format!("{actor} passes"),
        Action::Declare => format!("{actor} declares UNO"),
    }
}

pub fn format_card(card: Card) -> String {
    let rank = match card.rank {
        Rank::Number(value) => value.to_string(),
        Rank::Skip => String::from("S"),
        Rank::Reverse => String::from("R"),
        Rank::Draw2 => String::from("+2"),
        Rank::Wild => return String::from("W"),
        Rank::WildDraw4 => return String::from("W+4"),
    };
    format!("{}{rank}", format_color(card.color))
}

fn format_color(color: Color) -> &'static str {
    match color {
        Color::Red => "R",
        Color::Yellow => "Y",
        Color::Green => "G",
        Color::Blue => "B",
        Color::Wild => "W",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameBuilder, Player};

    #[test]
    fn formats_cards_compactly() {
        assert_eq!(format_card(Card::new(0, Color::Red, Rank::Number(7))), "R7");
        assert_eq!(format_card(Card::new(1, Color::Blue, Rank::Draw2)), "B+2");
        assert_eq!(format_card(Card::new(2, Color::Wild, Rank::WildDraw4)), "W+4");
    }

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let players = vec![Player::human("Ada"), Player::bot("Bot")];
        let game = GameBuilder::new(players)
            .expect("builder")
            .with_seed(5)
            .build()
            .expect("game");
        let ada = game.players()[0].id;
        let view = game.publicize(Some(ada));
        let text = render_view(&view);
        assert!(text.contains("Ada (You) - 7 cards <- current"));
        assert!(text.contains("Bot [bot] - 7 cards"));
        assert!(text.contains("##"));

        assert_eq!(describe_action(&view, &Action::Draw), "Ada draws a card");
        let card = view.hand[0];
        let desc = describe_action(
            &view,
            &Action::Play {
                card: card.id,
                color: None,
            },
        );
        assert_eq!(desc, format!("Ada plays {}", format_card(card)));
    }
}
