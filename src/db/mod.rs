use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Result};
use uuid::Uuid;

use crate::models::{Clue, Game, GameContext, Participant, Vote};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgGameStore;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Storage contract the engine depends on. Implementations must enforce the
/// uniqueness constraints: one participant per (game, user), one clue per
/// (game, participant, round), one vote per (game, voter). `upsert_vote`
/// overwrites the target when a vote for the voter already exists.
///
/// Collections are returned in insertion order (oldest first).
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<Game>;
    async fn find_game(&self, game_id: Uuid) -> Result<Option<Game>>;
    async fn update_game(&self, game: &Game) -> Result<Game>;

    async fn add_participant(&self, participant: &Participant) -> Result<Participant>;
    /// Mark one participant as the impostor and clear the flag on every
    /// other participant of the game, as a single atomic change
    async fn set_impostor(&self, game_id: Uuid, participant_id: Uuid) -> Result<()>;
    async fn remove_participant(&self, id: Uuid) -> Result<()>;
    async fn participants(&self, game_id: Uuid) -> Result<Vec<Participant>>;

    async fn add_clue(&self, clue: &Clue) -> Result<Clue>;
    async fn clues(&self, game_id: Uuid) -> Result<Vec<Clue>>;

    async fn upsert_vote(&self, vote: &Vote) -> Result<Vote>;
    async fn votes(&self, game_id: Uuid) -> Result<Vec<Vote>>;

    /// Game plus everything it owns, or None if the game does not exist
    async fn fetch_context(&self, game_id: Uuid) -> Result<Option<GameContext>> {
        let game = match self.find_game(game_id).await? {
            Some(game) => game,
            None => return Ok(None),
        };
        let participants = self.participants(game_id).await?;
        let clues = self.clues(game_id).await?;
        let votes = self.votes(game_id).await?;
        Ok(Some(GameContext {
            game,
            participants,
            clues,
            votes,
        }))
    }
}
