use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::card::MAX_PLAYERS;
use crate::timer::{DEFAULT_THINK_MS, DEFAULT_UNO_GRACE_MS, TimerConfig};

pub const DEFAULT_BOT_NAME: &str = "Bot";
pub const MAX_NAME_LEN: usize = 30;

/// Settings shared by every room of a hub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub think_ms: u64,
    pub uno_grace_ms: u64,
    pub bot_name: String,
    pub max_players: usize,
    /// Base seed for every deal; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            think_ms: DEFAULT_THINK_MS,
            uno_grace_ms: DEFAULT_UNO_GRACE_MS,
            bot_name: DEFAULT_BOT_NAME.to_string(),
            max_players: MAX_PLAYERS,
            seed: None,
        }
    }
}

impl HubConfig {
    /// Defaults overridden by `UNO_THINK_MS`, `UNO_GRACE_MS`, `UNO_BOT_NAME` and `UNO_SEED`.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = parse_var("UNO_THINK_MS") {
            config.think_ms = value;
        }
        if let Some(value) = parse_var("UNO_GRACE_MS") {
            config.uno_grace_ms = value;
        }
        if let Ok(name) = env::var("UNO_BOT_NAME") {
            if !name.trim().is_empty() {
                config.bot_name = name;
            }
        }
        config.seed = parse_var("UNO_SEED").or(config.seed);
        config
    }

    pub fn with_timers(mut self, think: Duration, uno_grace: Duration) -> Self {
        self.think_ms = think.as_millis() as u64;
        self.uno_grace_ms = uno_grace.as_millis() as u64;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn timers(&self) -> TimerConfig {
        TimerConfig::new(
            Duration::from_millis(self.think_ms),
            Duration::from_millis(self.uno_grace_ms),
        )
    }

    pub fn max_players(&self) -> usize {
        self.max_players.min(MAX_PLAYERS)
    }
}

fn parse_var(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {key}={raw}: not an unsigned integer");
            None
        }
    }
}
