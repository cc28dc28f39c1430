//! Read-only views over the store. Nothing here mutates.

use super::CollectionStore;
use crate::models::{CardId, Deck, DeckId, Difficulty, Flashcard};
use serde::Serialize;

/// Owned copy of the whole store at one revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub revision: u64,
    pub decks: Vec<Deck>,
    pub cards: Vec<Flashcard>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub decks: usize,
    pub cards: usize,
}

/// How many cards of each difficulty a deck holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyBreakdown {
    pub fn count(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

impl CollectionStore {
    /// All decks in insertion order.
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, id: &DeckId) -> Option<&Deck> {
        self.decks.iter().find(|d| &d.id == id)
    }

    /// First deck with exactly this name.
    pub fn deck_by_name(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.name == name)
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn flashcard(&self, id: &CardId) -> Option<&Flashcard> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn cards_in_deck(&self, deck_id: &DeckId) -> Vec<&Flashcard> {
        self.cards_in_deck_with_difficulty(deck_id, None)
    }

    pub fn cards_with_difficulty(&self, difficulty: Difficulty) -> Vec<&Flashcard> {
        self.cards
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    /// Cards of one deck, optionally narrowed to a single difficulty
    /// (`None` means every difficulty).
    pub fn cards_in_deck_with_difficulty(
        &self,
        deck_id: &DeckId,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Flashcard> {
        self.cards
            .iter()
            .filter(|c| &c.deck_id == deck_id)
            .filter(|c| difficulty.is_none_or(|d| c.difficulty == d))
            .collect()
    }

    /// Decks whose name or description contains `text`, ignoring case.
    /// An empty query returns every deck.
    pub fn search_decks(&self, text: &str) -> Vec<&Deck> {
        self.decks
            .iter()
            .filter(|d| d.matches_search(text))
            .collect()
    }

    /// Card count computed from the card set rather than the deck's cache.
    pub fn live_card_count(&self, deck_id: &DeckId) -> usize {
        self.cards.iter().filter(|c| &c.deck_id == deck_id).count()
    }

    /// The first `n` decks, as shown on the dashboard.
    pub fn recent_decks(&self, n: usize) -> &[Deck] {
        &self.decks[..n.min(self.decks.len())]
    }

    pub fn difficulty_breakdown(&self, deck_id: &DeckId) -> DifficultyBreakdown {
        let mut breakdown = DifficultyBreakdown::default();
        for card in self.cards.iter().filter(|c| &c.deck_id == deck_id) {
            match card.difficulty {
                Difficulty::Easy => breakdown.easy += 1,
                Difficulty::Medium => breakdown.medium += 1,
                Difficulty::Hard => breakdown.hard += 1,
            }
        }
        breakdown
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            decks: self.decks.len(),
            cards: self.cards.len(),
        }
    }

    /// True when every deck's cached count matches its live count.
    pub fn is_consistent(&self) -> bool {
        self.decks
            .iter()
            .all(|d| d.card_count == self.live_card_count(&d.id))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            decks: self.decks.clone(),
            cards: self.cards.clone(),
        }
    }
}
