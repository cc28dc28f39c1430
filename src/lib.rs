pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod session;
pub mod state;
pub mod store;

pub use error::{Result, StoreError, TransferError};
pub use models::{
    CardId, Deck, DeckDeletion, DeckId, DeckPatch, Difficulty, Flashcard, FlashcardPatch,
    NewDeck, NewFlashcard, User,
};
pub use session::SessionManager;
pub use state::{AppState, SharedState};
pub use store::{CollectionStore, StoreEvent};
