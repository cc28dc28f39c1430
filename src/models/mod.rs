pub mod deck;
pub mod flashcard;
pub mod user;

pub use deck::{Deck, DeckDeletion, DeckId, DeckPatch, NewDeck};
pub use flashcard::{CardId, Difficulty, Flashcard, FlashcardPatch, NewFlashcard, ParseDifficultyError};
pub use user::User;
