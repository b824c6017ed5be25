use std::error::Error;
use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use unoroom::{Bot, Game, GameBuilder, GameError, Player};
use unoroom::{create_bot_from_spec, describe_action, label_for_spec, render_view};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play bot-only UNO games through the game reducer.")]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 1)]
    games: usize,

    /// Base RNG seed (deck and bot RNGs are derived from it)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on turns per game; games exceeding it are not counted as a win
    #[arg(long = "max-turns", default_value_t = 2000)]
    max_turns: usize,

    /// Print the table and each chosen action
    #[arg(long = "visualize")]
    visualize: bool,

    /// Rotate seats between games
    #[arg(long = "shuffle-seats")]
    shuffle_seats: bool,

    /// Player bot specs: greedy, random[:seed] (2-10 total)
    bots: Vec<String>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let specs = if args.bots.is_empty() {
        vec![String::from("greedy"), String::from("greedy")]
    } else {
        args.bots.clone()
    };
    let labels: Vec<String> = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| format!("{}#{index}", label_for_spec(spec)))
        .collect();

    let mut seat_rng = StdRng::seed_from_u64(args.seed);
    let mut wins = vec![0usize; specs.len()];
    let mut aborted = 0usize;
    let mut total_turns = 0u64;

    for round in 0..args.games {
        let seed = args.seed.wrapping_add(round as u64);
        let mut order: Vec<usize> = (0..specs.len()).collect();
        if args.shuffle_seats {
            order.shuffle(&mut seat_rng);
        }
        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(specs.len());
        let mut players = Vec::with_capacity(specs.len());
        for &entry in &order {
            bots.push(create_bot_from_spec(&specs[entry], entry, seed)?);
            players.push(Player::bot(labels[entry].clone()));
        }
        let game = GameBuilder::new(players)?.with_seed(seed).build()?;
        match play_out(game, &mut bots, args.max_turns, args.visualize)? {
            Some((seat, turns)) => {
                wins[order[seat]] += 1;
                total_turns += turns;
            }
            None => aborted += 1,
        }
    }

    println!("Games: {}  |  aborted: {aborted}", args.games);
    let finished = args.games - aborted;
    if finished > 0 {
        println!("Average turns: {:.1}", total_turns as f64 / finished as f64);
    }
    for (label, count) in labels.iter().zip(&wins) {
        let rate = if finished > 0 {
            100.0 * *count as f64 / finished as f64
        } else {
            0.0
        };
        println!("  {label:<12} {count:>6} wins  ({rate:.1}%)");
    }
    Ok(())
}

/// Drives `game` to completion and returns the winning seat and the turn count.
fn play_out(
    mut game: Game,
    bots: &mut [Box<dyn Bot>],
    max_turns: usize,
    visualize: bool,
) -> Result<Option<(usize, u64)>, Box<dyn Error>> {
    while !game.is_finished() {
        if game.turn() as usize >= max_turns {
            log::warn!("[game {}] stopped at the {max_turns} turn limit", game.id());
            return Ok(None);
        }
        let seat = game.current_index();
        let player = game.current_player().id;
        let view = game.publicize(Some(player));
        let legal = game.legal_moves(player);
        let action = bots[seat].select_action(&view, &legal);
        if visualize {
            println!("{}", render_view(&view));
            println!("Chosen action: {}\n", describe_action(&view, &action));
        }
        game = match game.apply(player, action) {
            Ok(next) => next,
            Err(GameError::SupplyExhausted) => {
                log::warn!("[game {}] ran out of cards", game.id());
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
    }
    let winner = game
        .winner()
        .and_then(|id| game.seat_of(id))
        .ok_or("completed game without a winner")?;
    if visualize {
        println!("{}", render_view(&game.reveal()));
    }
    Ok(Some((winner, game.turn())))
}
