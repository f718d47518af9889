use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle phase of a game. Linear progression, no back-transitions;
/// `Finished` is terminal. `Clues` self-loops across rounds 1..clue_rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Lobby,
    Clues,
    Discussion,
    Voting,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Game {
    pub game_id: Uuid,
    pub guild_id: i64,
    pub channel_id: i64,
    pub host_id: i64,
    pub status: GameStatus,
    /// Public status message posted by the chat collaborator; unset until first posted
    pub control_message_id: Option<i64>,
    /// Set together with `impostor_user_id` when the game starts
    pub secret_word: Option<String>,
    pub impostor_user_id: Option<i64>,
    pub current_round: i32,
    pub clue_rounds: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn new(guild_id: i64, channel_id: i64, host_id: i64, clue_rounds: i32) -> Self {
        let now = Utc::now();
        Self {
            game_id: Uuid::new_v4(),
            guild_id,
            channel_id,
            host_id,
            status: GameStatus::Lobby,
            control_message_id: None,
            secret_word: None,
            impostor_user_id: None,
            current_round: 1,
            clue_rounds,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_host(&self, user_id: i64) -> bool {
        self.host_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: i64,
    pub is_host: bool,
    pub is_impostor: bool,
    pub created_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(game_id: Uuid, user_id: i64, is_host: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            user_id,
            is_host,
            is_impostor: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Clue {
    pub id: Uuid,
    pub game_id: Uuid,
    pub participant_id: Uuid,
    pub round_number: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Clue {
    pub fn new(game_id: Uuid, participant_id: Uuid, round_number: i32, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            participant_id,
            round_number,
            text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub game_id: Uuid,
    pub voter_id: i64,
    pub target_user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(game_id: Uuid, voter_id: i64, target_user_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            voter_id,
            target_user_id,
            created_at: Utc::now(),
        }
    }
}

/// Read snapshot of a game and everything it owns. This is what the host
/// collaborator renders into the public status view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub game: Game,
    pub participants: Vec<Participant>,
    pub clues: Vec<Clue>,
    pub votes: Vec<Vote>,
}

impl GameContext {
    pub fn participant_for(&self, user_id: i64) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn is_participant(&self, user_id: i64) -> bool {
        self.participant_for(user_id).is_some()
    }

    /// Clues submitted for a specific round, in submission order
    pub fn round_clues(&self, round_number: i32) -> Vec<&Clue> {
        self.clues
            .iter()
            .filter(|c| c.round_number == round_number)
            .collect()
    }
}
