pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod locks;
pub mod models;
pub mod notify;
pub mod wordlist;

pub use config::{Config, GameConfig};
pub use db::{GameStore, MemoryStore, PgGameStore};
pub use engine::{GameEngine, GameOutcome, GameStart, RoundAdvance, VoteCast, Winner};
pub use error::{GameError, GameResult};
pub use models::{Clue, Game, GameContext, GameStatus, Participant, Vote};
pub use notify::{DeliveryReport, Notifier};
pub use wordlist::WordList;

/// Initialize tracing for hosts that do not bring their own subscriber
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impostor_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
