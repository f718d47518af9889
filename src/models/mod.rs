pub mod game;

pub use game::{Clue, Game, GameContext, GameStatus, Participant, Vote};
