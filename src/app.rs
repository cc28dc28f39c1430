//! egui front end.
//! Renders the login screen, dashboard, deck list, deck view and add-card form.
//! The views only read the store; every change is queued as an `Action` and
//! applied through `AppState` after the frame is laid out.

use eframe::egui;
use egui::Color32;
use std::sync::mpsc::Receiver;
use study_cards::export::{export_deck, import_deck};
use study_cards::store::DifficultyBreakdown;
use study_cards::{
    AppState, CardId, CollectionStore, DeckDeletion, DeckId, Difficulty, FlashcardPatch, NewDeck,
    NewFlashcard, StoreError, StoreEvent, TransferError,
};

const DECK_COLORS: [&str; 5] = ["green", "yellow", "purple", "blue", "red"];
const RECENT_DECKS: usize = 3;

#[derive(Clone, Debug, Default, PartialEq)]
enum Screen {
    #[default]
    Dashboard,
    Decks,
    Deck(DeckId),
    AddCard,
}

/// Things the user asked for during this frame
enum Action {
    Login,
    Logout,
    Navigate(Screen),
    CreateDeck,
    DeleteDeck(DeckId, DeckDeletion),
    AddCard,
    StartEdit(CardId),
    SaveEdit,
    CancelEdit,
    DeleteCard(CardId),
    MoveCard(CardId, DeckId),
    Export(DeckId),
    Import,
}

#[derive(Default)]
struct LoginForm {
    email: String,
    password: String,
    error: Option<String>,
}

#[derive(Default)]
struct DeckForm {
    name: String,
    description: String,
    color: String,
}

#[derive(Default)]
struct CardForm {
    deck: Option<DeckId>,
    question: String,
    answer: String,
    difficulty: Difficulty,
}

struct CardEdit {
    id: CardId,
    question: String,
    answer: String,
    difficulty: Difficulty,
}

pub struct StudyCardsApp {
    state: AppState,
    events: Receiver<StoreEvent>,
    screen: Screen,
    login: LoginForm,
    search: String,
    deck_form: DeckForm,
    card_form: CardForm,
    difficulty_filter: Option<Difficulty>,
    editing: Option<CardEdit>,
    last_change: Option<String>,
    message: Option<String>,
}

fn deck_color(tag: &str) -> Color32 {
    match tag {
        "green" => Color32::from_rgb(52, 168, 83),
        "yellow" => Color32::from_rgb(245, 166, 35),
        "purple" => Color32::from_rgb(156, 39, 176),
        "blue" => Color32::from_rgb(33, 150, 243),
        "red" => Color32::from_rgb(229, 57, 53),
        _ => Color32::GRAY,
    }
}

fn difficulty_color(difficulty: Difficulty) -> Color32 {
    match difficulty {
        Difficulty::Easy => Color32::from_rgb(52, 168, 83),
        Difficulty::Medium => Color32::from_rgb(245, 166, 35),
        Difficulty::Hard => Color32::from_rgb(229, 57, 53),
    }
}

fn describe(event: &StoreEvent) -> String {
    match event {
        StoreEvent::DeckAdded(_) => "deck created".to_string(),
        StoreEvent::DeckUpdated(_) => "deck updated".to_string(),
        StoreEvent::DeckDeleted { removed_cards, .. } => {
            format!("deck deleted ({removed_cards} cards removed)")
        }
        StoreEvent::CardAdded { .. } => "card added".to_string(),
        StoreEvent::CardUpdated(_) => "card updated".to_string(),
        StoreEvent::CardMoved { .. } => "card moved".to_string(),
        StoreEvent::CardDeleted { .. } => "card deleted".to_string(),
        StoreEvent::CountsReconciled { decks } => format!("{decks} deck counts corrected"),
    }
}

fn difficulty_picker(ui: &mut egui::Ui, label: &str, value: &mut Difficulty) {
    egui::ComboBox::from_label(label)
        .selected_text(value.to_string())
        .show_ui(ui, |ui| {
            for d in Difficulty::ALL {
                ui.selectable_value(value, d, d.as_str());
            }
        });
}

impl eframe::App for StudyCardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.events.try_recv() {
            self.last_change = Some(describe(&event));
        }

        let mut actions = Vec::new();

        if self.state.session.is_authenticated() {
            self.render_sidebar(ctx, &mut actions);
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.screen.clone() {
                    Screen::Dashboard => self.render_dashboard(ui, &mut actions),
                    Screen::Decks => self.render_decks(ui, &mut actions),
                    Screen::Deck(id) => self.render_deck(ui, &id, &mut actions),
                    Screen::AddCard => self.render_add_card(ui, &mut actions),
                });
            });
        } else {
            self.render_login(ctx, &mut actions);
        }

        for action in actions {
            self.apply(action);
        }

        if let Some(message) = self.message.clone() {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.message = None;
                    }
                });
        }
    }
}

impl StudyCardsApp {
    pub fn new(mut state: AppState) -> Self {
        let events = state.subscribe();
        Self {
            state,
            events,
            screen: Screen::Dashboard,
            login: LoginForm::default(),
            search: String::new(),
            deck_form: DeckForm {
                color: DECK_COLORS[0].to_string(),
                ..Default::default()
            },
            card_form: CardForm::default(),
            difficulty_filter: None,
            editing: None,
            last_change: None,
            message: None,
        }
    }

    /// Runs a store mutation and turns a refusal into a notice.
    fn with_store<T>(
        &mut self,
        f: impl FnOnce(&mut CollectionStore) -> Result<T, StoreError>,
    ) -> Option<T> {
        match self.state.collections_mut().and_then(f) {
            Ok(value) => Some(value),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Login => {
                match self
                    .state
                    .session
                    .try_login(&self.login.email, &self.login.password)
                {
                    Ok(_) => {
                        self.login = LoginForm::default();
                        self.screen = Screen::Dashboard;
                    }
                    Err(e) => self.login.error = Some(e.to_string()),
                }
            }
            Action::Logout => {
                self.state.session.logout();
                self.screen = Screen::Dashboard;
                self.editing = None;
            }
            Action::Navigate(screen) => {
                if let Screen::Deck(_) = screen {
                    self.difficulty_filter = None;
                }
                self.editing = None;
                self.screen = screen;
            }
            Action::CreateDeck => {
                if self.deck_form.name.trim().is_empty() {
                    self.message = Some("Give the deck a name first.".to_string());
                    return;
                }
                let new = NewDeck {
                    name: self.deck_form.name.trim().to_string(),
                    description: self.deck_form.description.trim().to_string(),
                    color: self.deck_form.color.clone(),
                };
                if self.with_store(|store| Ok(store.add_deck(new))).is_some() {
                    self.deck_form.name.clear();
                    self.deck_form.description.clear();
                }
            }
            Action::DeleteDeck(id, mode) => {
                if self.with_store(|store| store.delete_deck(&id, mode)).is_some()
                    && self.screen == Screen::Deck(id)
                {
                    self.screen = Screen::Decks;
                }
            }
            Action::AddCard => {
                let Some(deck) = self.card_form.deck.clone() else {
                    self.message = Some("Pick a deck for the card.".to_string());
                    return;
                };
                if self.card_form.question.is_empty() || self.card_form.answer.is_empty() {
                    self.message = Some("Both question and answer are required.".to_string());
                    return;
                }
                let new = NewFlashcard {
                    deck_id: deck.clone(),
                    question: std::mem::take(&mut self.card_form.question),
                    answer: std::mem::take(&mut self.card_form.answer),
                    difficulty: self.card_form.difficulty,
                };
                if self.with_store(|store| store.add_flashcard(new)).is_some() {
                    self.card_form.difficulty = Difficulty::default();
                    self.screen = Screen::Deck(deck);
                }
            }
            Action::StartEdit(id) => {
                self.editing = self.state.collections().flashcard(&id).map(|card| CardEdit {
                    id: card.id.clone(),
                    question: card.question.clone(),
                    answer: card.answer.clone(),
                    difficulty: card.difficulty,
                });
            }
            Action::SaveEdit => {
                if let Some(edit) = self.editing.take() {
                    let patch = FlashcardPatch {
                        question: Some(edit.question),
                        answer: Some(edit.answer),
                        difficulty: Some(edit.difficulty),
                        ..Default::default()
                    };
                    self.with_store(|store| store.update_flashcard(&edit.id, patch));
                }
            }
            Action::CancelEdit => self.editing = None,
            Action::DeleteCard(id) => {
                self.with_store(|store| store.delete_flashcard(&id));
            }
            Action::MoveCard(id, to) => {
                self.with_store(|store| store.move_flashcard(&id, &to));
            }
            Action::Export(id) => self.handle_export(&id),
            Action::Import => self.handle_import(),
        }
    }

    fn render_login(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Study Cards");
                ui.label("Organize what you learn into decks of question and answer cards.");
                ui.add_space(30.0);

                ui.label("Email");
                ui.text_edit_singleline(&mut self.login.email);
                ui.label("Password");
                let password =
                    ui.add(egui::TextEdit::singleline(&mut self.login.password).password(true));

                if let Some(error) = &self.login.error {
                    ui.colored_label(Color32::RED, error);
                }

                let submitted =
                    password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Sign in").clicked() || submitted {
                    actions.push(Action::Login);
                }
            });
        });
    }

    fn render_sidebar(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::SidePanel::left("navigation")
            .resizable(false)
            .show(ctx, |ui| {
                if let Some(user) = self.state.session.current_user() {
                    ui.heading(&user.name);
                    ui.label(&user.email);
                }
                ui.separator();

                for (label, screen) in [
                    ("Dashboard", Screen::Dashboard),
                    ("Decks", Screen::Decks),
                    ("Add Card", Screen::AddCard),
                ] {
                    let selected = self.screen == screen;
                    if ui.selectable_label(selected, label).clicked() {
                        actions.push(Action::Navigate(screen));
                    }
                }

                ui.separator();
                if ui.button("Import Deck").clicked() {
                    actions.push(Action::Import);
                }
                if ui.button("Log out").clicked() {
                    actions.push(Action::Logout);
                }

                if let Some(change) = &self.last_change {
                    ui.add_space(20.0);
                    ui.small(format!("Last change: {change}"));
                }
            });
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let store = self.state.collections();
        let stats = store.stats();

        if let Some(user) = self.state.session.current_user() {
            ui.heading(format!("Welcome back, {}", user.name));
        }
        ui.horizontal(|ui| {
            ui.group(|ui| ui.label(format!("Total cards: {}", stats.cards)));
            ui.group(|ui| ui.label(format!("Decks: {}", stats.decks)));
        });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.heading("Recent Decks");
            if ui.button("View All").clicked() {
                actions.push(Action::Navigate(Screen::Decks));
            }
        });

        for deck in store.recent_decks(RECENT_DECKS) {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(deck_color(&deck.color), "■");
                    if ui.link(&deck.name).clicked() {
                        actions.push(Action::Navigate(Screen::Deck(deck.id.clone())));
                    }
                    ui.label(format!("{} cards", deck.card_count()));
                });
                ui.label(&deck.description);
            });
        }
    }

    fn render_decks(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Create New Deck");
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut self.deck_form.name);
        });
        ui.horizontal(|ui| {
            ui.label("Description:");
            ui.text_edit_singleline(&mut self.deck_form.description);
        });
        ui.horizontal(|ui| {
            ui.label("Color:");
            for tag in DECK_COLORS {
                let selected = self.deck_form.color == tag;
                let text = egui::RichText::new(tag).color(deck_color(tag));
                if ui.selectable_label(selected, text).clicked() {
                    self.deck_form.color = tag.to_string();
                }
            }
        });
        if ui.button("Create Deck").clicked() {
            actions.push(Action::CreateDeck);
        }

        ui.separator();

        let store = self.state.collections();
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
        });
        let decks = store.search_decks(&self.search);
        ui.heading(format!("Decks ({})", decks.len()));

        if decks.is_empty() {
            ui.label("No decks match your search.");
        }

        for deck in decks {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(deck_color(&deck.color), "■");
                    ui.strong(&deck.name);
                    ui.label(format!(
                        "{} cards · created {}",
                        store.live_card_count(&deck.id),
                        deck.created_at.format("%Y-%m-%d")
                    ));
                });
                ui.label(&deck.description);
                ui.horizontal(|ui| {
                    if ui.button("Open").clicked() {
                        actions.push(Action::Navigate(Screen::Deck(deck.id.clone())));
                    }
                    if ui.button("Export").clicked() {
                        actions.push(Action::Export(deck.id.clone()));
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(Action::DeleteDeck(deck.id.clone(), DeckDeletion::Restrict));
                    }
                    if deck.card_count() > 0 && ui.button("Delete with cards").clicked() {
                        actions.push(Action::DeleteDeck(deck.id.clone(), DeckDeletion::Cascade));
                    }
                });
            });
        }
    }

    fn render_deck(&mut self, ui: &mut egui::Ui, id: &DeckId, actions: &mut Vec<Action>) {
        let store = self.state.collections();
        let Some(deck) = store.deck(id) else {
            ui.heading("Deck not found");
            if ui.button("Back to Decks").clicked() {
                actions.push(Action::Navigate(Screen::Decks));
            }
            return;
        };

        ui.horizontal(|ui| {
            if ui.button("← Decks").clicked() {
                actions.push(Action::Navigate(Screen::Decks));
            }
            ui.colored_label(deck_color(&deck.color), "■");
            ui.heading(&deck.name);
        });
        ui.label(&deck.description);

        let breakdown: DifficultyBreakdown = store.difficulty_breakdown(id);
        ui.horizontal(|ui| {
            ui.label(format!("Total: {}", breakdown.total()));
            for d in Difficulty::ALL {
                ui.colored_label(difficulty_color(d), format!("{d}: {}", breakdown.count(d)));
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Add Card").clicked() {
                self.card_form.deck = Some(id.clone());
                actions.push(Action::Navigate(Screen::AddCard));
            }
            let filter = &mut self.difficulty_filter;
            egui::ComboBox::from_label("Show")
                .selected_text(filter.map_or("all", Difficulty::as_str))
                .show_ui(ui, |ui| {
                    ui.selectable_value(filter, None, "all");
                    for d in Difficulty::ALL {
                        ui.selectable_value(filter, Some(d), d.as_str());
                    }
                });
        });
        ui.separator();

        let cards = store.cards_in_deck_with_difficulty(id, self.difficulty_filter);
        if cards.is_empty() {
            match self.difficulty_filter {
                None => ui.label("No cards yet. Add the first one."),
                Some(d) => ui.label(format!("No {d} cards. Try a different difficulty.")),
            };
        }

        for card in cards {
            ui.group(|ui| match &mut self.editing {
                Some(edit) if edit.id == card.id => {
                    ui.horizontal(|ui| {
                        ui.label("Question:");
                        ui.text_edit_singleline(&mut edit.question);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Answer:");
                        ui.text_edit_multiline(&mut edit.answer);
                    });
                    difficulty_picker(ui, "Difficulty", &mut edit.difficulty);
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            actions.push(Action::SaveEdit);
                        }
                        if ui.button("Cancel").clicked() {
                            actions.push(Action::CancelEdit);
                        }
                    });
                }
                _ => {
                    ui.horizontal(|ui| {
                        ui.strong(&card.question);
                        ui.colored_label(difficulty_color(card.difficulty), card.difficulty.as_str());
                    });
                    ui.label(&card.answer);
                    ui.horizontal(|ui| {
                        if ui.button("Edit").clicked() {
                            actions.push(Action::StartEdit(card.id.clone()));
                        }
                        if ui.button("Delete").clicked() {
                            actions.push(Action::DeleteCard(card.id.clone()));
                        }
                        ui.menu_button("Move to", |ui| {
                            for other in store.decks().iter().filter(|d| &d.id != id) {
                                if ui.button(&other.name).clicked() {
                                    actions.push(Action::MoveCard(card.id.clone(), other.id.clone()));
                                    ui.close_menu();
                                }
                            }
                        });
                    });
                }
            });
        }
    }

    fn render_add_card(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let store = self.state.collections();
        ui.heading("Add Card");

        if store.decks().is_empty() {
            ui.label("Create a deck before adding cards.");
            if ui.button("Go to Decks").clicked() {
                actions.push(Action::Navigate(Screen::Decks));
            }
            return;
        }

        let form = &mut self.card_form;
        let selected = form
            .deck
            .as_ref()
            .and_then(|id| store.deck(id))
            .map_or("Select a deck", |d| d.name.as_str());
        egui::ComboBox::from_label("Deck")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for deck in store.decks() {
                    ui.selectable_value(&mut form.deck, Some(deck.id.clone()), &deck.name);
                }
            });

        ui.label("Question:");
        ui.text_edit_singleline(&mut form.question);
        ui.label("Answer:");
        ui.text_edit_multiline(&mut form.answer);
        difficulty_picker(ui, "Difficulty", &mut form.difficulty);

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Add Card").clicked() {
                actions.push(Action::AddCard);
            }
            if ui.button("Cancel").clicked() {
                let back = form.deck.clone().map_or(Screen::Dashboard, Screen::Deck);
                actions.push(Action::Navigate(back));
            }
        });
    }

    /// Asks for a target file and writes the deck there.
    fn handle_export(&mut self, id: &DeckId) {
        let store = self.state.collections();
        let Some(deck) = store.deck(id) else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("{}.json", deck.name))
            .add_filter("JSON files", &["json"])
            .save_file()
        {
            self.message = Some(match export_deck(store, id, &path) {
                Ok(()) => format!("Deck '{}' exported successfully!", deck.name),
                Err(e) => format!("Export failed: {e}"),
            });
        }
    }

    /// Asks for a deck file and adds it as a new deck.
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };
        let result = self
            .state
            .collections_mut()
            .map_err(TransferError::from)
            .and_then(|store| import_deck(store, &path));
        self.message = Some(match result {
            Ok(deck) => format!(
                "Deck '{}' imported successfully with {} cards!",
                deck.name,
                deck.card_count()
            ),
            Err(e) => format!("Import failed: {e}"),
        });
    }
}
