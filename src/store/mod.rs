//! In-memory owner of every deck and card.
//!
//! Each deck caches how many cards point at it. Every mutation that touches a
//! card's deck membership updates that cache in the same call, so once a method
//! returns, `deck.card_count()` equals the number of cards with that `deck_id`.

pub mod clock;
pub mod events;
mod seed;
mod views;

pub use clock::{Clock, FixedClock, SystemClock};
pub use events::StoreEvent;
pub use views::{DifficultyBreakdown, Snapshot, StoreStats};

use crate::error::{Result, StoreError};
use crate::models::{
    CardId, Deck, DeckDeletion, DeckId, DeckPatch, Flashcard, FlashcardPatch, NewDeck,
    NewFlashcard,
};
use events::Subscribers;
use std::sync::mpsc::Receiver;

#[derive(Debug)]
pub struct CollectionStore {
    decks: Vec<Deck>,
    cards: Vec<Flashcard>,
    clock: Box<dyn Clock>,
    revision: u64,
    subscribers: Subscribers,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl CollectionStore {
    /// Creates an empty store.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            decks: Vec::new(),
            cards: Vec::new(),
            clock: Box::new(clock),
            revision: 0,
            subscribers: Subscribers::default(),
        }
    }

    /// Number of successful mutations so far. Views can compare it against the
    /// value they last rendered to know whether anything changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a listener that receives one event per successful mutation.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.subscribers.subscribe()
    }

    fn commit(&mut self, event: StoreEvent) {
        self.revision += 1;
        self.subscribers.publish(&event);
        debug_assert!(self.is_consistent(), "card counts drifted after {event:?}");
    }

    fn deck_index(&self, id: &DeckId) -> Option<usize> {
        self.decks.iter().position(|d| &d.id == id)
    }

    fn card_index(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == id)
    }

    fn increment(&mut self, deck_id: &DeckId) {
        if let Some(i) = self.deck_index(deck_id) {
            self.decks[i].card_count += 1;
        }
    }

    fn decrement(&mut self, deck_id: &DeckId) {
        if let Some(i) = self.deck_index(deck_id) {
            let deck = &mut self.decks[i];
            if deck.card_count == 0 {
                tracing::warn!(deck = %deck.id, "card count already zero, not decrementing");
            }
            deck.card_count = deck.card_count.saturating_sub(1);
        }
    }

    // ==================== Deck Operations ====================

    /// Creates a deck stamped with today's date and no cards.
    pub fn add_deck(&mut self, new: NewDeck) -> Deck {
        let deck = Deck {
            id: DeckId::generate(),
            name: new.name,
            description: new.description,
            card_count: 0,
            created_at: self.clock.today(),
            color: new.color,
        };
        tracing::debug!(deck = %deck.id, name = %deck.name, "deck added");
        self.decks.push(deck.clone());
        self.commit(StoreEvent::DeckAdded(deck.id.clone()));
        deck
    }

    pub fn update_deck(&mut self, id: &DeckId, patch: DeckPatch) -> Result<Deck> {
        let i = self
            .deck_index(id)
            .ok_or_else(|| StoreError::DeckNotFound(id.clone()))?;
        patch.apply(&mut self.decks[i]);
        let deck = self.decks[i].clone();
        self.commit(StoreEvent::DeckUpdated(id.clone()));
        Ok(deck)
    }

    /// Removes a deck. With [`DeckDeletion::Restrict`] this fails while cards
    /// still reference it; with [`DeckDeletion::Cascade`] those cards go too.
    pub fn delete_deck(&mut self, id: &DeckId, mode: DeckDeletion) -> Result<Deck> {
        let i = self
            .deck_index(id)
            .ok_or_else(|| StoreError::DeckNotFound(id.clone()))?;
        let live = self.live_card_count(id);

        if live > 0 && mode == DeckDeletion::Restrict {
            tracing::warn!(deck = %id, cards = live, "refusing to delete non-empty deck");
            return Err(StoreError::DeckNotEmpty {
                deck: id.clone(),
                cards: live,
            });
        }

        self.cards.retain(|c| &c.deck_id != id);
        let deck = self.decks.remove(i);
        tracing::debug!(deck = %id, removed_cards = live, "deck deleted");
        self.commit(StoreEvent::DeckDeleted {
            deck: id.clone(),
            removed_cards: live,
        });
        Ok(deck)
    }

    // ==================== Card Operations ====================

    /// Adds a card and bumps its deck's count. The deck must exist.
    pub fn add_flashcard(&mut self, new: NewFlashcard) -> Result<Flashcard> {
        if self.deck_index(&new.deck_id).is_none() {
            tracing::warn!(deck = %new.deck_id, "rejecting card for unknown deck");
            return Err(StoreError::DeckNotFound(new.deck_id));
        }

        let card = Flashcard {
            id: CardId::generate(),
            deck_id: new.deck_id,
            question: new.question,
            answer: new.answer,
            difficulty: new.difficulty,
            last_reviewed: None,
            next_review: None,
        };
        self.cards.push(card.clone());
        self.increment(&card.deck_id);

        tracing::debug!(card = %card.id, deck = %card.deck_id, "card added");
        self.commit(StoreEvent::CardAdded {
            card: card.id.clone(),
            deck: card.deck_id.clone(),
        });
        Ok(card)
    }

    /// Shallow-merges `patch` into the card. Counts are untouched since the
    /// patch cannot change deck membership.
    pub fn update_flashcard(&mut self, id: &CardId, patch: FlashcardPatch) -> Result<Flashcard> {
        let i = self
            .card_index(id)
            .ok_or_else(|| StoreError::CardNotFound(id.clone()))?;
        patch.apply(&mut self.cards[i]);
        let card = self.cards[i].clone();
        self.commit(StoreEvent::CardUpdated(id.clone()));
        Ok(card)
    }

    /// Reassigns a card to another deck, moving one unit of count with it.
    pub fn move_flashcard(&mut self, id: &CardId, to: &DeckId) -> Result<Flashcard> {
        let i = self
            .card_index(id)
            .ok_or_else(|| StoreError::CardNotFound(id.clone()))?;
        if self.deck_index(to).is_none() {
            return Err(StoreError::DeckNotFound(to.clone()));
        }
        let from = self.cards[i].deck_id.clone();
        if &from == to {
            return Ok(self.cards[i].clone());
        }

        self.cards[i].deck_id = to.clone();
        self.decrement(&from);
        self.increment(to);
        let card = self.cards[i].clone();

        tracing::debug!(card = %id, %from, %to, "card moved");
        self.commit(StoreEvent::CardMoved {
            card: id.clone(),
            from,
            to: to.clone(),
        });
        Ok(card)
    }

    /// Removes a card and decrements its deck's count, never below zero.
    pub fn delete_flashcard(&mut self, id: &CardId) -> Result<Flashcard> {
        let Some(i) = self.card_index(id) else {
            tracing::debug!(card = %id, "delete of unknown card ignored");
            return Err(StoreError::CardNotFound(id.clone()));
        };
        let card = self.cards.remove(i);
        self.decrement(&card.deck_id);

        tracing::debug!(card = %card.id, deck = %card.deck_id, "card deleted");
        self.commit(StoreEvent::CardDeleted {
            card: card.id.clone(),
            deck: card.deck_id.clone(),
        });
        Ok(card)
    }

    /// Rewrites cached counts from the card set. Returns how many decks were off.
    pub fn reconcile_card_counts(&mut self) -> usize {
        let fixed = self.recount();
        if fixed > 0 {
            tracing::warn!(decks = fixed, "corrected drifted card counts");
            self.commit(StoreEvent::CountsReconciled { decks: fixed });
        }
        fixed
    }

    fn recount(&mut self) -> usize {
        let mut fixed = 0;
        for i in 0..self.decks.len() {
            let live = self.live_card_count(&self.decks[i].id);
            if self.decks[i].card_count != live {
                self.decks[i].card_count = live;
                fixed += 1;
            }
        }
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    fn store() -> CollectionStore {
        CollectionStore::new(FixedClock(day()))
    }

    fn new_deck(name: &str) -> NewDeck {
        NewDeck {
            name: name.to_string(),
            description: format!("{name} description"),
            color: "blue".to_string(),
        }
    }

    fn new_card(deck: &DeckId, question: &str) -> NewFlashcard {
        NewFlashcard {
            deck_id: deck.clone(),
            question: question.to_string(),
            answer: format!("answer to {question}"),
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_add_deck_defaults() {
        let mut store = store();
        let deck = store.add_deck(NewDeck {
            name: "X".to_string(),
            description: "Y".to_string(),
            color: "Z".to_string(),
        });
        assert_eq!(deck.card_count(), 0);
        assert_eq!(deck.created_at, day());
        assert_eq!(deck.name, "X");
        assert_eq!(deck.description, "Y");
        assert_eq!(deck.color, "Z");
        assert_eq!(store.decks(), &[deck]);
    }

    #[test]
    fn test_add_deck_uses_system_clock_by_default() {
        let mut store = CollectionStore::default();
        let before = chrono::Local::now().date_naive();
        let deck = store.add_deck(new_deck("Today"));
        let after = chrono::Local::now().date_naive();
        assert!(deck.created_at == before || deck.created_at == after);
    }

    #[test]
    fn test_decks_keep_insertion_order() {
        let mut store = store();
        for name in ["c", "a", "b"] {
            store.add_deck(new_deck(name));
        }
        let names: Vec<_> = store.decks().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_add_flashcard_increments_count() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio"));
        let card = store.add_flashcard(new_card(&deck.id, "Q")).unwrap();
        assert_eq!(card.deck_id, deck.id);
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 1);
        assert_eq!(store.flashcards().len(), 1);
    }

    #[test]
    fn test_add_flashcard_rejects_unknown_deck() {
        let mut store = store();
        store.add_deck(new_deck("Bio"));
        let missing = DeckId::new("missing");
        let err = store.add_flashcard(new_card(&missing, "Q")).unwrap_err();
        assert_eq!(err, StoreError::DeckNotFound(missing));
        assert!(store.flashcards().is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_update_is_partial_merge() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio"));
        let card = store.add_flashcard(new_card(&deck.id, "Q")).unwrap();

        let updated = store
            .update_flashcard(&card.id, FlashcardPatch::difficulty(Difficulty::Hard))
            .unwrap();
        assert_eq!(updated.id, card.id);
        assert_eq!(updated.question, card.question);
        assert_eq!(updated.answer, card.answer);
        assert_eq!(updated.difficulty, Difficulty::Hard);
        assert_eq!(store.flashcard(&card.id), Some(&updated));
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 1);
    }

    #[test]
    fn test_update_unknown_card_changes_nothing() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio"));
        store.add_flashcard(new_card(&deck.id, "Q")).unwrap();
        let before = store.snapshot();

        let err = store
            .update_flashcard(&CardId::new("nope"), FlashcardPatch::difficulty(Difficulty::Hard))
            .unwrap_err();
        assert_eq!(err, StoreError::CardNotFound(CardId::new("nope")));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_delete_decrements_once_and_floors_at_zero() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio"));
        let card = store.add_flashcard(new_card(&deck.id, "Q")).unwrap();
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 1);

        store.delete_flashcard(&card.id).unwrap();
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 0);

        assert!(store.delete_flashcard(&card.id).is_err());
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 0);
    }

    #[test]
    fn test_delete_floors_drifted_count() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio"));
        let card = store.add_flashcard(new_card(&deck.id, "Q")).unwrap();
        store.decks[0].card_count = 0;

        store.delete_flashcard(&card.id).unwrap();
        assert_eq!(store.deck(&deck.id).unwrap().card_count(), 0);
    }

    #[test]
    fn test_invariant_holds_across_mixed_sequence() {
        let mut store = store();
        let decks: Vec<DeckId> = (0..4).map(|i| store.add_deck(new_deck(&format!("d{i}"))).id).collect();
        let mut live: Vec<CardId> = Vec::new();

        // Deterministic pseudo-random walk over add/delete/move.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for step in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let deck = &decks[(seed % decks.len() as u64) as usize];

            match seed % 5 {
                0 | 1 | 2 => {
                    let card = store.add_flashcard(new_card(deck, &format!("q{step}"))).unwrap();
                    live.push(card.id);
                }
                3 if !live.is_empty() => {
                    let id = live.remove((seed as usize / 7) % live.len());
                    store.delete_flashcard(&id).unwrap();
                }
                4 if !live.is_empty() => {
                    let id = &live[(seed as usize / 11) % live.len()];
                    store.move_flashcard(id, deck).unwrap();
                }
                _ => {
                    let _ = store.delete_flashcard(&CardId::new(format!("ghost{step}")));
                }
            }

            for d in store.decks() {
                assert_eq!(d.card_count(), store.live_card_count(&d.id), "step {step}");
            }
        }
        assert_eq!(store.flashcards().len(), live.len());
    }

    #[test]
    fn test_move_shifts_count_between_decks() {
        let mut store = store();
        let a = store.add_deck(new_deck("a")).id;
        let b = store.add_deck(new_deck("b")).id;
        let card = store.add_flashcard(new_card(&a, "Q")).unwrap();

        let moved = store.move_flashcard(&card.id, &b).unwrap();
        assert_eq!(moved.deck_id, b);
        assert_eq!(store.deck(&a).unwrap().card_count(), 0);
        assert_eq!(store.deck(&b).unwrap().card_count(), 1);
    }

    #[test]
    fn test_move_to_same_deck_is_noop() {
        let mut store = store();
        let a = store.add_deck(new_deck("a")).id;
        let card = store.add_flashcard(new_card(&a, "Q")).unwrap();
        let revision = store.revision();

        store.move_flashcard(&card.id, &a).unwrap();
        assert_eq!(store.revision(), revision);
        assert_eq!(store.deck(&a).unwrap().card_count(), 1);
    }

    #[test]
    fn test_move_to_unknown_deck_fails() {
        let mut store = store();
        let a = store.add_deck(new_deck("a")).id;
        let card = store.add_flashcard(new_card(&a, "Q")).unwrap();
        let missing = DeckId::new("missing");

        assert_eq!(
            store.move_flashcard(&card.id, &missing).unwrap_err(),
            StoreError::DeckNotFound(missing)
        );
        assert_eq!(store.flashcard(&card.id).unwrap().deck_id, a);
    }

    #[test]
    fn test_update_deck() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Old"));
        let updated = store
            .update_deck(
                &deck.id,
                DeckPatch {
                    description: Some("fresh".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Old");
        assert_eq!(updated.description, "fresh");
        assert_eq!(updated.created_at, deck.created_at);
        assert!(store.update_deck(&DeckId::new("x"), DeckPatch::default()).is_err());
    }

    #[test]
    fn test_delete_deck_restrict_blocks_non_empty() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio")).id;
        store.add_flashcard(new_card(&deck, "Q")).unwrap();

        let err = store.delete_deck(&deck, DeckDeletion::Restrict).unwrap_err();
        assert_eq!(err, StoreError::DeckNotEmpty { deck: deck.clone(), cards: 1 });
        assert!(store.deck(&deck).is_some());
    }

    #[test]
    fn test_delete_deck_restrict_allows_empty() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio")).id;
        store.delete_deck(&deck, DeckDeletion::Restrict).unwrap();
        assert!(store.decks().is_empty());
    }

    #[test]
    fn test_delete_deck_cascade_removes_cards() {
        let mut store = store();
        let keep = store.add_deck(new_deck("keep")).id;
        let gone = store.add_deck(new_deck("gone")).id;
        store.add_flashcard(new_card(&keep, "k")).unwrap();
        store.add_flashcard(new_card(&gone, "g1")).unwrap();
        store.add_flashcard(new_card(&gone, "g2")).unwrap();

        store.delete_deck(&gone, DeckDeletion::Cascade).unwrap();
        assert_eq!(store.flashcards().len(), 1);
        assert_eq!(store.flashcards()[0].deck_id, keep);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_reconcile_repairs_drift() {
        let mut store = store();
        let deck = store.add_deck(new_deck("Bio")).id;
        store.add_flashcard(new_card(&deck, "Q")).unwrap();
        store.decks[0].card_count = 7;
        assert!(!store.is_consistent());

        assert_eq!(store.reconcile_card_counts(), 1);
        assert_eq!(store.deck(&deck).unwrap().card_count(), 1);
        assert_eq!(store.reconcile_card_counts(), 0);
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let mut store = store();
        let events = store.subscribe();
        let deck = store.add_deck(new_deck("Bio")).id;
        let card = store.add_flashcard(new_card(&deck, "Q")).unwrap().id;
        store.delete_flashcard(&card).unwrap();
        let _ = store.delete_flashcard(&card);

        let seen: Vec<_> = events.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                StoreEvent::DeckAdded(deck.clone()),
                StoreEvent::CardAdded { card: card.clone(), deck: deck.clone() },
                StoreEvent::CardDeleted { card, deck },
            ]
        );
        assert_eq!(store.revision(), 3);
    }
}
