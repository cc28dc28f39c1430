//! The app's state container: the session plus the store, passed to whoever
//! needs them instead of living in a global.

use crate::error::{Result, StoreError};
use crate::session::SessionManager;
use crate::store::{CollectionStore, StoreEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

#[derive(Debug)]
pub struct AppState {
    pub session: SessionManager,
    store: CollectionStore,
}

/// Handle for callers on several threads. One lock covers both collections.
pub type SharedState = Arc<Mutex<AppState>>;

impl AppState {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            session: SessionManager::new(),
            store,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    /// Watching for changes is a read, so it needs no session.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Reads are open to everyone.
    pub fn collections(&self) -> &CollectionStore {
        &self.store
    }

    /// Mutations need a logged in user.
    pub fn collections_mut(&mut self) -> Result<&mut CollectionStore> {
        if !self.session.is_authenticated() {
            tracing::warn!("store mutation attempted without a session");
            return Err(StoreError::Unauthenticated);
        }
        Ok(&mut self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewDeck, NewFlashcard};
    use crate::store::FixedClock;
    use chrono::NaiveDate;
    use std::thread;

    fn state() -> AppState {
        AppState::new(CollectionStore::new(FixedClock(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )))
    }

    #[test]
    fn test_mutations_need_login() {
        let mut state = state();
        assert_eq!(
            state.collections_mut().unwrap_err(),
            StoreError::Unauthenticated
        );

        state.session.login("a@b.com", "pw");
        state.collections_mut().unwrap().add_deck(NewDeck::default());
        assert_eq!(state.collections().decks().len(), 1);

        state.session.logout();
        assert!(state.collections_mut().is_err());
        assert!(state.subscribe().try_recv().is_err());
        assert_eq!(state.collections().decks().len(), 1);
    }

    #[test]
    fn test_shared_state_keeps_counts_under_threads() {
        let mut state = state();
        state.session.login("a@b.com", "pw");
        let deck = state.collections_mut().unwrap().add_deck(NewDeck::default()).id;
        let shared = state.into_shared();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let deck = deck.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        let mut guard = shared.lock();
                        let store = guard.collections_mut().unwrap();
                        let card = store
                            .add_flashcard(NewFlashcard {
                                deck_id: deck.clone(),
                                question: format!("q{i}"),
                                answer: "a".to_string(),
                                difficulty: Default::default(),
                            })
                            .unwrap();
                        if i % 2 == 0 {
                            store.delete_flashcard(&card.id).unwrap();
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let guard = shared.lock();
        let store = guard.collections();
        assert_eq!(store.flashcards().len(), 100);
        assert_eq!(store.deck(&deck).unwrap().card_count(), 100);
        assert!(store.is_consistent());
    }
}
