//! Deck is a named, colored collection of flashcards
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(String);

impl DeckId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deck as held by the store.
///
/// `card_count` is a cache of how many cards reference this deck. Only the
/// store writes it, which is why the field is not public.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub description: String,
    pub(crate) card_count: usize,
    pub created_at: NaiveDate,
    /// Presentation tag, never interpreted by the store.
    pub color: String,
}

impl Deck {
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Case-insensitive substring match over name and description.
    pub fn matches_search(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Fields supplied by the caller when creating a deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeck {
    pub name: String,
    pub description: String,
    pub color: String,
}

/// Partial deck update; `None` leaves the field as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl DeckPatch {
    pub(crate) fn apply(self, deck: &mut Deck) {
        if let Some(name) = self.name {
            deck.name = name;
        }
        if let Some(description) = self.description {
            deck.description = description;
        }
        if let Some(color) = self.color {
            deck.color = color;
        }
    }
}

/// What to do with member cards when a deck is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeckDeletion {
    /// Refuse while any card still references the deck.
    #[default]
    Restrict,
    /// Delete the member cards together with the deck.
    Cascade,
}
