use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::db::GameStore;
use crate::error::{GameError, GameResult};
use crate::locks::GameLocks;
use crate::models::{Clue, Game, GameContext, GameStatus, Participant, Vote};
use crate::notify::{self, DeliveryReport, Notifier};
use crate::wordlist::WordList;

pub mod rounds;
pub mod tally;

pub use tally::{VoteOutcome, Winner};

/// What the host learns when a game starts
#[derive(Debug, Clone, Serialize)]
pub struct GameStart {
    pub impostor_user_id: i64,
    pub secret_word: String,
    /// Which role DMs made it out
    pub delivery: DeliveryReport,
}

/// Where AdvanceRound landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundAdvance {
    NextRound(i32),
    Discussion,
}

/// A recorded vote, plus the outcome if this vote completed the set
#[derive(Debug, Clone, Serialize)]
pub struct VoteCast {
    pub vote: Vote,
    pub finished: Option<GameOutcome>,
}

/// Final result of a game
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub winner: Winner,
    pub secret_word: String,
    pub impostor_user_id: i64,
    pub tally: HashMap<i64, u32>,
    pub tie: bool,
    /// The host revealed before every participant had voted
    pub ended_early: bool,
}

/// The game state machine and its command surface. One instance serves all
/// games; per-game mutual exclusion comes from the internal lock table, so
/// commands for the same game are serialized and commands for different
/// games run in parallel. Notifications always go out after the exclusive
/// section is released, from committed state.
pub struct GameEngine {
    store: Arc<dyn GameStore>,
    notifier: Arc<dyn Notifier>,
    words: Arc<WordList>,
    locks: GameLocks,
    config: GameConfig,
}

impl GameEngine {
    pub fn new(
        store: Arc<dyn GameStore>,
        notifier: Arc<dyn Notifier>,
        words: Arc<WordList>,
        config: GameConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            words,
            locks: GameLocks::new(),
            config,
        }
    }

    /// Create a game in the lobby phase with the creator auto-joined as host.
    /// `clue_rounds` defaults from config and is clamped to 1..=max.
    pub async fn create_game(
        &self,
        host_user_id: i64,
        guild_id: i64,
        channel_id: i64,
        clue_rounds: Option<i32>,
    ) -> GameResult<Game> {
        // max(1) keeps the clamp bounds ordered even if the configured
        // maximum was set to zero
        let rounds = clue_rounds
            .unwrap_or(self.config.default_clue_rounds)
            .clamp(1, self.config.max_clue_rounds.max(1));

        let game = self
            .store
            .create_game(&Game::new(guild_id, channel_id, host_user_id, rounds))
            .await?;
        self.store
            .add_participant(&Participant::new(game.game_id, host_user_id, true))
            .await?;

        tracing::info!(
            "Game {} created by {} with {} clue round(s)",
            game.game_id,
            host_user_id,
            rounds
        );
        Ok(game)
    }

    /// Record the public status message once the host collaborator has
    /// posted it, then refresh it with the current state
    pub async fn set_control_message(&self, game_id: Uuid, message_id: i64) -> GameResult<()> {
        {
            let _guard = self.locks.acquire(game_id).await;
            let mut game = self
                .store
                .find_game(game_id)
                .await?
                .ok_or(GameError::GameNotFound)?;
            game.control_message_id = Some(message_id);
            self.store.update_game(&game).await?;
        }
        self.refresh_view(game_id).await;
        Ok(())
    }

    pub async fn join(&self, game_id: Uuid, user_id: i64) -> GameResult<Participant> {
        let participant = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if context.game.status != GameStatus::Lobby {
                return Err(GameError::WrongPhase(context.game.status));
            }
            if context.is_participant(user_id) {
                return Err(GameError::AlreadyJoined);
            }
            self.store
                .add_participant(&Participant::new(game_id, user_id, false))
                .await?
        };

        tracing::info!("Player {} joined game {}", user_id, game_id);
        self.refresh_view(game_id).await;
        Ok(participant)
    }

    pub async fn leave(&self, game_id: Uuid, user_id: i64) -> GameResult<()> {
        {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if context.game.status != GameStatus::Lobby {
                return Err(GameError::WrongPhase(context.game.status));
            }
            let participant = context
                .participant_for(user_id)
                .ok_or(GameError::NotAParticipant)?;
            if participant.is_host {
                return Err(GameError::IsHost);
            }
            self.store.remove_participant(participant.id).await?;
        }

        tracing::info!("Player {} left game {}", user_id, game_id);
        self.refresh_view(game_id).await;
        Ok(())
    }

    /// Start the game: draw the impostor and the secret word uniformly at
    /// random, move to the first clue round, and DM every participant their
    /// role. DM failures are collected in the delivery report, never raised.
    pub async fn start_game(&self, game_id: Uuid, caller_id: i64) -> GameResult<GameStart> {
        let (impostor_user_id, secret_word, messages) = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if !context.game.is_host(caller_id) {
                return Err(GameError::NotHost);
            }
            if context.game.status != GameStatus::Lobby {
                return Err(GameError::WrongPhase(context.game.status));
            }
            if context.participants.len() < self.config.min_players {
                return Err(GameError::InsufficientPlayers {
                    needed: self.config.min_players,
                    have: context.participants.len(),
                });
            }

            let impostor = {
                use rand::Rng;
                let idx = rand::rng().random_range(0..context.participants.len());
                context.participants[idx].clone()
            };
            self.store.set_impostor(game_id, impostor.id).await?;

            let secret_word = self.words.pick().to_string();
            let mut game = context.game.clone();
            game.status = GameStatus::Clues;
            game.current_round = 1;
            game.secret_word = Some(secret_word.clone());
            game.impostor_user_id = Some(impostor.user_id);
            self.store.update_game(&game).await?;

            let messages: Vec<(i64, String)> = context
                .participants
                .iter()
                .map(|p| {
                    let body = if p.user_id == impostor.user_id {
                        "You are the IMPOSTOR. Blend in without knowing the word.".to_string()
                    } else {
                        format!("Secret word: **{}**. Do not reveal it directly.", secret_word)
                    };
                    (p.user_id, format!("Game {} update:\n{}", game_id, body))
                })
                .collect();

            (impostor.user_id, secret_word, messages)
        };

        tracing::info!("Game {} started, roles assigned", game_id);
        let delivery = notify::send_all(self.notifier.as_ref(), &messages).await;
        self.refresh_view(game_id).await;
        Ok(GameStart {
            impostor_user_id,
            secret_word,
            delivery,
        })
    }

    /// Record one clue for the caller in the current round. Text is trimmed
    /// and truncated to the configured bound; the host UI owns minimum
    /// length enforcement.
    pub async fn submit_clue(
        &self,
        game_id: Uuid,
        user_id: i64,
        text: &str,
    ) -> GameResult<Clue> {
        let clue = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if context.game.status != GameStatus::Clues {
                return Err(GameError::WrongPhase(context.game.status));
            }
            let participant = context
                .participant_for(user_id)
                .ok_or(GameError::NotAParticipant)?;
            let round = context.game.current_round;
            let already = context
                .clues
                .iter()
                .any(|c| c.participant_id == participant.id && c.round_number == round);
            if already {
                return Err(GameError::DuplicateClue);
            }

            let text: String = text.trim().chars().take(self.config.max_clue_len).collect();
            self.store
                .add_clue(&Clue::new(game_id, participant.id, round, text))
                .await?
        };

        self.refresh_view(game_id).await;
        Ok(clue)
    }

    /// Move to the next clue round, or to discussion after the last one.
    /// Gated on every participant having submitted a clue for the current
    /// round; never advances on its own.
    pub async fn advance_round(&self, game_id: Uuid, caller_id: i64) -> GameResult<RoundAdvance> {
        let advance = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if !context.game.is_host(caller_id) {
                return Err(GameError::NotHost);
            }
            if context.game.status != GameStatus::Clues {
                return Err(GameError::WrongPhase(context.game.status));
            }
            let missing = rounds::missing_clues(
                &context.participants,
                &context.clues,
                context.game.current_round,
            );
            if !missing.is_empty() {
                return Err(GameError::RoundIncomplete {
                    missing: missing.len(),
                });
            }

            let mut game = context.game;
            let advance = if game.current_round < game.clue_rounds {
                game.current_round += 1;
                RoundAdvance::NextRound(game.current_round)
            } else {
                game.status = GameStatus::Discussion;
                RoundAdvance::Discussion
            };
            self.store.update_game(&game).await?;
            advance
        };

        tracing::info!("Game {} advanced: {:?}", game_id, advance);
        self.refresh_view(game_id).await;
        Ok(advance)
    }

    /// Open the voting phase. Allowed from discussion, or straight from the
    /// clue phase once the current round is complete.
    pub async fn open_voting(&self, game_id: Uuid, caller_id: i64) -> GameResult<()> {
        {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if !context.game.is_host(caller_id) {
                return Err(GameError::NotHost);
            }
            match context.game.status {
                GameStatus::Clues => {
                    let missing = rounds::missing_clues(
                        &context.participants,
                        &context.clues,
                        context.game.current_round,
                    );
                    if !missing.is_empty() {
                        return Err(GameError::RoundIncomplete {
                            missing: missing.len(),
                        });
                    }
                }
                GameStatus::Discussion => {}
                status => return Err(GameError::WrongPhase(status)),
            }

            let mut game = context.game;
            game.status = GameStatus::Voting;
            self.store.update_game(&game).await?;
        }

        tracing::info!("Game {} is now voting", game_id);
        self.refresh_view(game_id).await;
        Ok(())
    }

    /// Record or change the caller's vote. When this vote completes the set
    /// (one vote per participant), the game finishes in the same exclusive
    /// section that wrote the vote, so exactly one of two racing final
    /// votes triggers the finish.
    pub async fn cast_vote(
        &self,
        game_id: Uuid,
        voter_id: i64,
        target_user_id: i64,
    ) -> GameResult<VoteCast> {
        let (vote, finished) = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if context.game.status != GameStatus::Voting {
                return Err(GameError::WrongPhase(context.game.status));
            }
            if !context.is_participant(voter_id) {
                return Err(GameError::NotAParticipant);
            }
            if !context.is_participant(target_user_id) {
                return Err(GameError::InvalidTarget);
            }

            let vote = self
                .store
                .upsert_vote(&Vote::new(game_id, voter_id, target_user_id))
                .await?;

            let votes = self.store.votes(game_id).await?;
            let finished = if votes.len() >= context.participants.len() {
                Some(self.finish(context.game, &votes, false).await?)
            } else {
                None
            };
            (vote, finished)
        };

        self.refresh_view(game_id).await;
        Ok(VoteCast { vote, finished })
    }

    /// Host-triggered reveal. Uses whatever votes exist at this moment;
    /// the outcome is tagged when votes were still outstanding.
    pub async fn reveal(&self, game_id: Uuid, caller_id: i64) -> GameResult<GameOutcome> {
        let outcome = {
            let _guard = self.locks.acquire(game_id).await;
            let context = self.context(game_id).await?;
            if !context.game.is_host(caller_id) {
                return Err(GameError::NotHost);
            }
            if context.game.status != GameStatus::Voting {
                return Err(GameError::WrongPhase(context.game.status));
            }
            let ended_early = context.votes.len() < context.participants.len();
            self.finish(context.game, &context.votes, ended_early)
                .await?
        };

        self.refresh_view(game_id).await;
        Ok(outcome)
    }

    /// Read-only snapshot for rendering the public view. Takes no lock and
    /// may trail an in-flight mutation slightly.
    pub async fn game_view(&self, game_id: Uuid) -> GameResult<GameContext> {
        self.context(game_id).await
    }

    /// Compute the outcome and move the game to `finished`. Caller holds
    /// the game's exclusive section.
    async fn finish(
        &self,
        mut game: Game,
        votes: &[Vote],
        ended_early: bool,
    ) -> GameResult<GameOutcome> {
        let impostor_user_id = game.impostor_user_id.ok_or_else(|| {
            GameError::Storage(sqlx::Error::Protocol(
                "voting game has no impostor assigned".into(),
            ))
        })?;
        let secret_word = game.secret_word.clone().ok_or_else(|| {
            GameError::Storage(sqlx::Error::Protocol(
                "voting game has no secret word".into(),
            ))
        })?;

        let VoteOutcome { winner, tally, tie } = tally::decide(votes, impostor_user_id);
        game.status = GameStatus::Finished;
        self.store.update_game(&game).await?;

        tracing::info!(
            "Game {} finished: {:?} wins ({} vote(s), tie: {}, early: {})",
            game.game_id,
            winner,
            votes.len(),
            tie,
            ended_early
        );
        Ok(GameOutcome {
            winner,
            secret_word,
            impostor_user_id,
            tally,
            tie,
            ended_early,
        })
    }

    async fn context(&self, game_id: Uuid) -> GameResult<GameContext> {
        self.store
            .fetch_context(game_id)
            .await?
            .ok_or(GameError::GameNotFound)
    }

    /// Push the committed state to the public status view, best-effort
    async fn refresh_view(&self, game_id: Uuid) {
        match self.store.fetch_context(game_id).await {
            Ok(Some(context)) => {
                self.notifier.refresh_public_view(game_id, &context).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Failed to load game {} for view refresh: {}", game_id, e);
            }
        }
    }
}
