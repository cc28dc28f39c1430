//! JSON import/export for a single deck and its cards.
//!
//! Import replays the file through the store's own operations, so the new
//! deck's card count is built up one card at a time like any other deck.

use crate::error::{StoreError, TransferError};
use crate::models::{Deck, DeckId, Difficulty, NewDeck, NewFlashcard};
use crate::store::CollectionStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk shape of an exported deck. Ids and dates are not carried over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub cards: Vec<CardEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl DeckFile {
    pub fn from_store(store: &CollectionStore, deck_id: &DeckId) -> Result<Self, StoreError> {
        let deck = store
            .deck(deck_id)
            .ok_or_else(|| StoreError::DeckNotFound(deck_id.clone()))?;
        Ok(Self {
            name: deck.name.clone(),
            description: deck.description.clone(),
            color: deck.color.clone(),
            cards: store
                .cards_in_deck(deck_id)
                .into_iter()
                .map(|c| CardEntry {
                    question: c.question.clone(),
                    answer: c.answer.clone(),
                    difficulty: c.difficulty,
                })
                .collect(),
        })
    }
}

/// Writes a deck to a pretty-printed JSON file at `path`.
pub fn export_deck(
    store: &CollectionStore,
    deck_id: &DeckId,
    path: impl AsRef<Path>,
) -> Result<(), TransferError> {
    let file = DeckFile::from_store(store, deck_id)?;
    fs::write(path.as_ref(), serde_json::to_string_pretty(&file)?)?;
    tracing::info!(
        deck = %deck_id,
        cards = file.cards.len(),
        path = %path.as_ref().display(),
        "deck exported"
    );
    Ok(())
}

/// Reads a deck file and adds it to the store as a new deck.
/// Fails if a deck with the same name is already present.
pub fn import_deck(
    store: &mut CollectionStore,
    path: impl AsRef<Path>,
) -> Result<Deck, TransferError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let file: DeckFile = serde_json::from_str(&contents)?;

    if store.deck_by_name(&file.name).is_some() {
        return Err(TransferError::DeckExists(file.name));
    }

    let deck = store.add_deck(NewDeck {
        name: file.name,
        description: file.description,
        color: file.color,
    });
    for entry in file.cards {
        store.add_flashcard(NewFlashcard {
            deck_id: deck.id.clone(),
            question: entry.question,
            answer: entry.answer,
            difficulty: entry.difficulty,
        })?;
    }

    let deck = store
        .deck(&deck.id)
        .cloned()
        .ok_or(StoreError::DeckNotFound(deck.id))?;
    tracing::info!(
        deck = %deck.id,
        cards = deck.card_count(),
        path = %path.as_ref().display(),
        "deck imported"
    );
    Ok(deck)
}
