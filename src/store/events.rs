//! Change notifications for views that re-render when the store changes.

use crate::models::{CardId, DeckId};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    DeckAdded(DeckId),
    DeckUpdated(DeckId),
    DeckDeleted { deck: DeckId, removed_cards: usize },
    CardAdded { card: CardId, deck: DeckId },
    CardUpdated(CardId),
    CardMoved { card: CardId, from: DeckId, to: DeckId },
    CardDeleted { card: CardId, deck: DeckId },
    CountsReconciled { decks: usize },
}

#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<StoreEvent>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Sends to every live subscriber and forgets the ones whose receiver is gone.
    pub(crate) fn publish(&mut self, event: &StoreEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}
