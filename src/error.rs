use thiserror::Error;

use crate::models::GameStatus;

/// Everything a game command can fail with. All variants except `Storage`
/// are expected, user-facing outcomes: the command was rejected, the game
/// state is unchanged, and the caller is told which precondition failed.
/// `Storage` is the one infrastructure-fatal category and is surfaced
/// unchanged from the repository layer.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("game not found")]
    GameNotFound,
    #[error("that action is not allowed while the game is in the {0:?} phase")]
    WrongPhase(GameStatus),
    #[error("only the host can do that")]
    NotHost,
    #[error("the host cannot leave the lobby")]
    IsHost,
    #[error("you are not part of this game")]
    NotAParticipant,
    #[error("you have already joined this game")]
    AlreadyJoined,
    #[error("you already submitted a clue this round")]
    DuplicateClue,
    #[error("still waiting on clues from {missing} player(s)")]
    RoundIncomplete { missing: usize },
    #[error("at least {needed} players are required to start, only {have} joined")]
    InsufficientPlayers { needed: usize, have: usize },
    #[error("vote target is not part of this game")]
    InvalidTarget,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type GameResult<T> = Result<T, GameError>;
