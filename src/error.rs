// src/error.rs

use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Winner {0} not found")]
    WinnerNotFound(Uuid),

    #[error("Prize {0} not found")]
    PrizeNotFound(Uuid),

    #[error("Prize {0} has already been claimed")]
    AlreadyClaimed(Uuid),

    #[error("Winner {0} has no unclaimed prizes")]
    NoUnclaimedPrizes(Uuid),

    #[error("Malformed import data: {0}")]
    MalformedImport(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
