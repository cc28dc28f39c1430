//! Error types shared by the session, the store and deck transfer.

use crate::models::{CardId, DeckId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("email and password must both be non-empty")]
    InvalidCredentials,

    #[error("log in before changing decks or cards")]
    Unauthenticated,

    #[error("Deck not found: {0}")]
    DeckNotFound(DeckId),

    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Deck {deck} still has {cards} card(s)")]
    DeckNotEmpty { deck: DeckId, cards: usize },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from exporting or importing a deck file.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Deck '{0}' already exists")]
    DeckExists(String),
}
