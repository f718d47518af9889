use async_trait::async_trait;
use sqlx::{PgPool, Result};
use uuid::Uuid;

use super::GameStore;
use crate::models::{Clue, Game, Participant, Vote};

/// Postgres-backed game store. The schema (see schema.sql) carries the
/// uniqueness constraints: participants (game_id, user_id), clues
/// (game_id, participant_id, round_number), votes (game_id, voter_id).
/// Participant, clue and vote rows cascade when a game row is deleted by
/// the host's retention job; the engine itself never deletes games.
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn create_game(&self, game: &Game) -> Result<Game> {
        sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (
                game_id, guild_id, channel_id, host_id, status,
                current_round, clue_rounds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(game.game_id)
        .bind(game.guild_id)
        .bind(game.channel_id)
        .bind(game.host_id)
        .bind(game.status)
        .bind(game.current_round)
        .bind(game.clue_rounds)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_game(&self, game_id: Uuid) -> Result<Option<Game>> {
        sqlx::query_as::<_, Game>("SELECT * FROM games WHERE game_id = $1")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_game(&self, game: &Game) -> Result<Game> {
        sqlx::query_as::<_, Game>(
            r#"
            UPDATE games
            SET status = $2,
                control_message_id = $3,
                secret_word = $4,
                impostor_user_id = $5,
                current_round = $6,
                updated_at = NOW()
            WHERE game_id = $1
            RETURNING *
            "#,
        )
        .bind(game.game_id)
        .bind(game.status)
        .bind(game.control_message_id)
        .bind(game.secret_word.as_deref())
        .bind(game.impostor_user_id)
        .bind(game.current_round)
        .fetch_one(&self.pool)
        .await
    }

    async fn add_participant(&self, participant: &Participant) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (id, game_id, user_id, is_host, is_impostor)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(participant.id)
        .bind(participant.game_id)
        .bind(participant.user_id)
        .bind(participant.is_host)
        .bind(participant.is_impostor)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_impostor(&self, game_id: Uuid, participant_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE participants
            SET is_impostor = (id = $2)
            WHERE game_id = $1
            "#,
        )
        .bind(game_id)
        .bind(participant_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_participant(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn participants(&self, game_id: Uuid) -> Result<Vec<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE game_id = $1 ORDER BY created_at ASC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn add_clue(&self, clue: &Clue) -> Result<Clue> {
        sqlx::query_as::<_, Clue>(
            r#"
            INSERT INTO clues (id, game_id, participant_id, round_number, text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(clue.id)
        .bind(clue.game_id)
        .bind(clue.participant_id)
        .bind(clue.round_number)
        .bind(&clue.text)
        .fetch_one(&self.pool)
        .await
    }

    async fn clues(&self, game_id: Uuid) -> Result<Vec<Clue>> {
        sqlx::query_as::<_, Clue>(
            "SELECT * FROM clues WHERE game_id = $1 ORDER BY created_at ASC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<Vote> {
        sqlx::query_as::<_, Vote>(
            r#"
            INSERT INTO votes (id, game_id, voter_id, target_user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (game_id, voter_id)
            DO UPDATE SET target_user_id = EXCLUDED.target_user_id
            RETURNING *
            "#,
        )
        .bind(vote.id)
        .bind(vote.game_id)
        .bind(vote.voter_id)
        .bind(vote.target_user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn votes(&self, game_id: Uuid) -> Result<Vec<Vote>> {
        sqlx::query_as::<_, Vote>(
            "SELECT * FROM votes WHERE game_id = $1 ORDER BY created_at ASC",
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
    }
}
