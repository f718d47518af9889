use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::Result;
use uuid::Uuid;

use super::GameStore;
use crate::models::{Clue, Game, Participant, Vote};

fn duplicate(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("unique constraint violated: {}", what))
}

/// In-memory game store. Used by tests and by hosts that do not want a
/// database; enforces the same uniqueness constraints as the Postgres
/// schema. Callers get insertion-ordered collections, matching the
/// `created_at ASC` ordering of the Postgres adapter.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<Uuid, Game>,
    participants: DashMap<Uuid, Participant>,
    clues: DashMap<Uuid, Clue>,
    votes: DashMap<Uuid, Vote>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create_game(&self, game: &Game) -> Result<Game> {
        if self.games.contains_key(&game.game_id) {
            return Err(duplicate("games.game_id"));
        }
        self.games.insert(game.game_id, game.clone());
        Ok(game.clone())
    }

    async fn find_game(&self, game_id: Uuid) -> Result<Option<Game>> {
        Ok(self.games.get(&game_id).map(|g| g.value().clone()))
    }

    async fn update_game(&self, game: &Game) -> Result<Game> {
        if !self.games.contains_key(&game.game_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        let mut updated = game.clone();
        updated.updated_at = chrono::Utc::now();
        self.games.insert(game.game_id, updated.clone());
        Ok(updated)
    }

    async fn add_participant(&self, participant: &Participant) -> Result<Participant> {
        let exists = self.participants.iter().any(|p| {
            p.game_id == participant.game_id && p.user_id == participant.user_id
        });
        if exists {
            return Err(duplicate("participants (game_id, user_id)"));
        }
        self.participants.insert(participant.id, participant.clone());
        Ok(participant.clone())
    }

    async fn set_impostor(&self, game_id: Uuid, participant_id: Uuid) -> Result<()> {
        for mut p in self.participants.iter_mut() {
            if p.game_id == game_id {
                p.is_impostor = p.id == participant_id;
            }
        }
        Ok(())
    }

    async fn remove_participant(&self, id: Uuid) -> Result<()> {
        self.participants.remove(&id);
        Ok(())
    }

    async fn participants(&self, game_id: Uuid) -> Result<Vec<Participant>> {
        let mut rows: Vec<Participant> = self
            .participants
            .iter()
            .filter(|p| p.game_id == game_id)
            .map(|p| p.value().clone())
            .collect();
        rows.sort_by_key(|p| p.created_at);
        Ok(rows)
    }

    async fn add_clue(&self, clue: &Clue) -> Result<Clue> {
        let exists = self.clues.iter().any(|c| {
            c.game_id == clue.game_id
                && c.participant_id == clue.participant_id
                && c.round_number == clue.round_number
        });
        if exists {
            return Err(duplicate("clues (game_id, participant_id, round_number)"));
        }
        self.clues.insert(clue.id, clue.clone());
        Ok(clue.clone())
    }

    async fn clues(&self, game_id: Uuid) -> Result<Vec<Clue>> {
        let mut rows: Vec<Clue> = self
            .clues
            .iter()
            .filter(|c| c.game_id == game_id)
            .map(|c| c.value().clone())
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<Vote> {
        let existing = self
            .votes
            .iter()
            .find(|v| v.game_id == vote.game_id && v.voter_id == vote.voter_id)
            .map(|v| v.value().clone());
        match existing {
            Some(mut row) => {
                row.target_user_id = vote.target_user_id;
                self.votes.insert(row.id, row.clone());
                Ok(row)
            }
            None => {
                self.votes.insert(vote.id, vote.clone());
                Ok(vote.clone())
            }
        }
    }

    async fn votes(&self, game_id: Uuid) -> Result<Vec<Vote>> {
        let mut rows: Vec<Vote> = self
            .votes
            .iter()
            .filter(|v| v.game_id == game_id)
            .map(|v| v.value().clone())
            .collect();
        rows.sort_by_key(|v| v.created_at);
        Ok(rows)
    }
}
