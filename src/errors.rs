// src/errors.rs
use thiserror::Error;

/// Failures of the pool lifecycle operations (create/join/read).
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Pool not found")]
    PoolNotFound,
    #[error("User already joined this pool")]
    AlreadyJoined,
    #[error("Could not generate a unique pool code")]
    CodeGenerationExhausted,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failures of guess submission.
#[derive(Debug, Error)]
pub enum GuessError {
    #[error("Game not found")]
    GameNotFound,
    #[error("You are not a participant of this pool")]
    NotAParticipant,
    #[error("This game has already started")]
    GuessWindowClosed,
    #[error("You already submitted a guess for this game")]
    AlreadyGuessed,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
