use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bot::Bot;
use crate::bots::{GreedyBot, RandomBot};

/// Returns a normalized label for a bot spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs:
/// - greedy
/// - random[:seed]
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, Box<dyn Error>> {
    match label_for_spec(spec).as_str() {
        "greedy" => Ok(Box::new(GreedyBot::new())),
        "random" => {
            let custom_seed = spec
                .split_once(':')
                .and_then(|(_, value)| value.trim().parse::<u64>().ok())
                .unwrap_or(seed ^ ((index as u64 + 1) * 0x9E37_79B9));
            Ok(Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed))))
        }
        _ => Err(format!("unrecognized bot spec: {spec}").into()),
    }
}
