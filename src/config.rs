use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub word_list_path: String,
    /// Minimum participants required to start a game
    pub min_players: usize,
    /// Clue rounds used when the host does not pick a count
    pub default_clue_rounds: i32,
    /// Upper bound on configurable clue rounds
    pub max_clue_rounds: i32,
    /// Clue text is truncated to this many characters after trimming
    pub max_clue_len: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_list_path: "./data/impostor_wordlist.txt".to_string(),
            min_players: 3,
            default_clue_rounds: 2,
            max_clue_rounds: 5,
            max_clue_len: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let defaults = GameConfig::default();
        let game = GameConfig {
            word_list_path: env::var("WORD_LIST_PATH")
                .unwrap_or(defaults.word_list_path),
            min_players: env::var("MIN_PLAYERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_players),
            default_clue_rounds: env::var("DEFAULT_CLUE_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_clue_rounds),
            max_clue_rounds: env::var("MAX_CLUE_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_clue_rounds)
                .max(1),
            max_clue_len: env::var("MAX_CLUE_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_clue_len),
        };

        Ok(Config { database, game })
    }

    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}
