//! Demo decks and cards shown on first launch.

use super::{Clock, CollectionStore};
use crate::models::{CardId, Deck, DeckId, Difficulty, Flashcard};
use chrono::NaiveDate;

const DEMO_DECKS: [(&str, &str, &str, (i32, u32, u32), &str); 3] = [
    (
        "1",
        "Biology Basics",
        "Essential biology concepts and terms",
        (2024, 1, 15),
        "green",
    ),
    (
        "2",
        "JavaScript Fundamentals",
        "Core JavaScript concepts for beginners",
        (2024, 1, 10),
        "yellow",
    ),
    (
        "3",
        "World History",
        "Important historical events and dates",
        (2024, 1, 5),
        "purple",
    ),
];

const DEMO_CARDS: [(&str, &str, &str, &str, Difficulty); 3] = [
    (
        "1",
        "1",
        "What is photosynthesis?",
        "The process by which plants convert light energy into chemical energy",
        Difficulty::Medium,
    ),
    (
        "2",
        "1",
        "What is DNA?",
        "Deoxyribonucleic acid - the hereditary material in humans and almost all other organisms",
        Difficulty::Easy,
    ),
    (
        "3",
        "2",
        "What is a closure in JavaScript?",
        "A closure is a function that has access to variables in its outer (enclosing) scope even after the outer function has finished executing",
        Difficulty::Hard,
    ),
];

impl CollectionStore {
    /// A store pre-filled with three demo decks and three cards. Card counts
    /// are derived from the seeded cards.
    pub fn with_demo_data(clock: impl Clock + 'static) -> Self {
        let mut store = Self::new(clock);

        for (id, name, description, (y, m, d), color) in DEMO_DECKS {
            store.decks.push(Deck {
                id: DeckId::new(id),
                name: name.to_string(),
                description: description.to_string(),
                card_count: 0,
                created_at: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                color: color.to_string(),
            });
        }

        for (id, deck_id, question, answer, difficulty) in DEMO_CARDS {
            store.cards.push(Flashcard {
                id: CardId::new(id),
                deck_id: DeckId::new(deck_id),
                question: question.to_string(),
                answer: answer.to_string(),
                difficulty,
                last_reviewed: None,
                next_review: None,
            });
        }

        store.recount();
        tracing::debug!(
            decks = store.decks.len(),
            cards = store.cards.len(),
            "seeded demo data"
        );
        store
    }
}
